/// Rate limiting middleware for API endpoints
///
/// This module implements token bucket rate limiting keyed by client IP
/// address. State lives in process memory; a multi-instance deployment
/// would need a shared store in front of this.
///
/// # Algorithm
///
/// Uses token bucket algorithm:
/// - Tokens refill at constant rate
/// - Each request consumes 1 token
/// - Request blocked if bucket empty
///
/// The default configuration allows 100 requests per 15 minute window
/// per client.
///
/// # Headers
///
/// Response includes rate limit headers:
/// - `X-RateLimit-Limit`: Total requests allowed per window
/// - `X-RateLimit-Remaining`: Tokens remaining
/// - `X-RateLimit-Reset`: Unix timestamp when tokens fully replenish
/// - `Retry-After`: Seconds to wait (429 responses only)
///
/// # Example
///
/// ```no_run
/// use motolog_api::middleware::rate_limit::RateLimiter;
///
/// let limiter = RateLimiter::new(100, 900);
/// let result = limiter.check("203.0.113.7".parse().unwrap());
/// assert!(result.ok);
/// ```

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Buckets tracked before idle entries are pruned
const MAX_TRACKED_CLIENTS: usize = 1024;

/// Token bucket state for a single client
#[derive(Debug, Clone)]
struct TokenBucket {
    /// Current number of tokens
    tokens: f64,

    /// Last refill timestamp (Unix seconds)
    last_refill: u64,
}

impl TokenBucket {
    /// Creates a new full bucket
    fn new(capacity: u32) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        TokenBucket {
            tokens: capacity as f64,
            last_refill: now,
        }
    }

    /// Refills tokens based on elapsed time
    fn refill(&mut self, rate: f64, capacity: u32) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        let elapsed_secs = now.saturating_sub(self.last_refill) as f64;
        let new_tokens = elapsed_secs * rate;

        self.tokens = (self.tokens + new_tokens).min(capacity as f64);
        self.last_refill = now;
    }

    /// Attempts to consume N tokens
    fn try_consume(&mut self, count: f64) -> bool {
        if self.tokens >= count {
            self.tokens -= count;
            true
        } else {
            false
        }
    }

    /// Calculates seconds until N tokens available
    fn seconds_until_available(&self, count: f64, rate: f64) -> u64 {
        let deficit = count - self.tokens;
        if deficit <= 0.0 {
            0
        } else {
            (deficit / rate).ceil() as u64
        }
    }
}

/// Result of rate limit check
#[derive(Debug)]
pub struct RateLimitResult {
    /// Whether request is allowed
    pub ok: bool,

    /// Tokens remaining
    pub remaining: u32,

    /// Seconds until rate limit resets
    pub reset_after: u64,
}

/// In-memory token bucket limiter shared across request handlers.
///
/// One bucket per client IP. Buckets idle for two full windows are
/// pruned once the map grows past [`MAX_TRACKED_CLIENTS`].
#[derive(Debug)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<IpAddr, TokenBucket>>,
    capacity: u32,
    refill_rate: f64,
    window_secs: u64,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_requests` per `window_secs` window.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        let window = window_secs.max(1);
        RateLimiter {
            buckets: Mutex::new(HashMap::new()),
            capacity: max_requests,
            refill_rate: max_requests as f64 / window as f64,
            window_secs: window,
        }
    }

    /// Total requests allowed per window.
    pub fn limit(&self) -> u32 {
        self.capacity
    }

    /// Consumes one token for the client, refilling first.
    pub fn check(&self, client: IpAddr) -> RateLimitResult {
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if buckets.len() > MAX_TRACKED_CLIENTS {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs();
            let cutoff = now.saturating_sub(self.window_secs * 2);
            buckets.retain(|_, bucket| bucket.last_refill >= cutoff);
        }

        let bucket = buckets
            .entry(client)
            .or_insert_with(|| TokenBucket::new(self.capacity));

        bucket.refill(self.refill_rate, self.capacity);

        if bucket.try_consume(1.0) {
            RateLimitResult {
                ok: true,
                remaining: bucket.tokens.floor() as u32,
                reset_after: self.window_secs,
            }
        } else {
            RateLimitResult {
                ok: false,
                remaining: 0,
                reset_after: bucket.seconds_until_available(1.0, self.refill_rate),
            }
        }
    }
}

/// Rate limiting middleware layer
///
/// Checks the client's bucket before processing the request. Returns 429
/// with a `Retry-After` header if the limit is exceeded, and attaches
/// `X-RateLimit-*` headers to successful responses.
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Integration tests call the router without a socket; treat those
    // requests as loopback traffic.
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    let result = state.rate_limiter.check(client);

    if !result.ok {
        tracing::warn!(client = %client, retry_after = result.reset_after, "Rate limit exceeded");
        return Err(ApiError::RateLimitExceeded {
            retry_after: result.reset_after,
            message: "Too many requests from this IP, please try again later.".to_string(),
        });
    }

    let limit = state.rate_limiter.limit();
    let mut response = next.run(request).await;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    response.headers_mut().insert(
        "X-RateLimit-Limit",
        HeaderValue::from_str(&limit.to_string()).unwrap(),
    );
    response.headers_mut().insert(
        "X-RateLimit-Remaining",
        HeaderValue::from_str(&result.remaining.to_string()).unwrap(),
    );
    response.headers_mut().insert(
        "X-RateLimit-Reset",
        HeaderValue::from_str(&(now + result.reset_after).to_string()).unwrap(),
    );

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bucket_new() {
        let bucket = TokenBucket::new(100);
        assert_eq!(bucket.tokens, 100.0);
        assert!(bucket.last_refill > 0);
    }

    #[test]
    fn test_token_bucket_consume() {
        let mut bucket = TokenBucket::new(10);
        assert!(bucket.try_consume(1.0));
        assert_eq!(bucket.tokens, 9.0);
        assert!(bucket.try_consume(5.0));
        assert_eq!(bucket.tokens, 4.0);
        assert!(!bucket.try_consume(10.0));
        assert_eq!(bucket.tokens, 4.0); // Unchanged after failed attempt
    }

    #[test]
    fn test_token_bucket_refill() {
        let mut bucket = TokenBucket {
            tokens: 5.0,
            last_refill: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs()
                - 10, // 10 seconds ago
        };

        // Refill at 1 token/sec for 10 seconds = 10 tokens
        bucket.refill(1.0, 100);
        assert!((bucket.tokens - 15.0).abs() < 0.1);
    }

    #[test]
    fn test_token_bucket_refill_capped() {
        let mut bucket = TokenBucket {
            tokens: 95.0,
            last_refill: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs()
                - 10, // 10 seconds ago
        };

        // Refill at 1 token/sec for 10 seconds, but capped at capacity
        bucket.refill(1.0, 100);
        assert_eq!(bucket.tokens, 100.0); // Capped at capacity
    }

    #[test]
    fn test_token_bucket_seconds_until_available() {
        let bucket = TokenBucket {
            tokens: 2.0,
            last_refill: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs(),
        };

        // Need 5 tokens, have 2, rate is 1/sec -> need 3 seconds
        assert_eq!(bucket.seconds_until_available(5.0, 1.0), 3);

        // Already have enough
        assert_eq!(bucket.seconds_until_available(1.0, 1.0), 0);
    }

    #[test]
    fn test_rate_limiter_blocks_after_capacity() {
        let limiter = RateLimiter::new(3, 900);
        let client: IpAddr = "203.0.113.7".parse().unwrap();

        for _ in 0..3 {
            assert!(limiter.check(client).ok);
        }

        let blocked = limiter.check(client);
        assert!(!blocked.ok);
        assert_eq!(blocked.remaining, 0);
        assert!(blocked.reset_after > 0);
    }

    #[test]
    fn test_rate_limiter_tracks_clients_separately() {
        let limiter = RateLimiter::new(1, 900);
        let first: IpAddr = "203.0.113.7".parse().unwrap();
        let second: IpAddr = "203.0.113.8".parse().unwrap();

        assert!(limiter.check(first).ok);
        assert!(!limiter.check(first).ok);

        // A different client still has a full bucket
        assert!(limiter.check(second).ok);
    }

    #[test]
    fn test_rate_limiter_reports_remaining() {
        let limiter = RateLimiter::new(10, 900);
        let client: IpAddr = "198.51.100.1".parse().unwrap();

        let first = limiter.check(client);
        assert!(first.ok);
        assert_eq!(first.remaining, 9);
        assert_eq!(first.reset_after, 900);
    }
}
