//! Configuration management for the MotoLog reminder worker.
//!
//! Loads configuration from environment variables with sensible defaults
//! for local development. A `.env` file is honored when present.

use anyhow::{Context, Result};

/// Worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub database_max_connections: u32,

    /// Six-field cron expression for the reminder job
    pub cron_schedule: String,

    /// How many days before an expiry a reminder is raised
    pub days_before: i32,

    /// Run one reminder cycle immediately on startup
    pub run_on_startup: bool,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (ignore errors if not found)
        dotenvy::dotenv().ok();

        Ok(WorkerConfig {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a number")?,
            cron_schedule: std::env::var("CRON_SCHEDULE")
                .unwrap_or_else(|_| "0 0 8 * * *".to_string()),
            days_before: std::env::var("NOTIFICATION_DAYS_BEFORE")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("NOTIFICATION_DAYS_BEFORE must be a number")?,
            run_on_startup: std::env::var("RUN_ON_STARTUP")
                .map(|v| is_truthy(&v))
                .unwrap_or(false),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("true"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }
}
