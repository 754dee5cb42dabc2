/// Health check endpoint
///
/// Provides a simple health check endpoint that verifies:
/// - The server is running
/// - Database connectivity
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "database": "up",
///   "version": "0.1.0",
///   "timestamp": "2025-06-15T08:00:00Z"
/// }
/// ```
///
/// Responds 503 with `database: "down"` when the pool ping fails.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Database status ("up" or "down")
    pub database: String,

    /// Application version
    pub version: String,

    /// Current server time (RFC 3339)
    pub timestamp: String,
}

/// Health check handler
///
/// Returns service health status including database connectivity.
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    // Check database connectivity
    let database_up = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();

    let response = HealthResponse {
        status: if database_up {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        database: if database_up { "up" } else { "down" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
