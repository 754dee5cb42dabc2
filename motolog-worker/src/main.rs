//! # MotoLog Reminder Worker
//!
//! Daily cron worker for the MotoLog vehicle maintenance tracker. Each
//! cycle scans for expiring insurance policies, expiring PUC certificates,
//! and vehicles due for service, and writes a notification for each hit.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p motolog-worker
//! ```

use anyhow::Context;
use motolog_shared::db::pool::{create_pool, DatabaseConfig};
use motolog_worker::{config::WorkerConfig, reminders, scheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "motolog_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("MotoLog Worker v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = WorkerConfig::from_env().context("Failed to load configuration")?;

    let pool = create_pool(DatabaseConfig {
        url: config.database_url.clone(),
        max_connections: config.database_max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to create database pool")?;

    if config.run_on_startup {
        tracing::info!("Running reminder cycle on startup");
        reminders::run_cycle(&pool, config.days_before).await;
    }

    let mut scheduler = scheduler::start(pool, &config.cron_schedule, config.days_before)
        .await
        .context("Failed to start scheduler")?;

    tracing::info!("Worker ready, waiting for scheduled runs");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping scheduler");

    scheduler.shutdown().await?;
    tracing::info!("Shutdown complete");

    Ok(())
}
