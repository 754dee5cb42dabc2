/// Cron scheduling for the reminder job
///
/// Wraps tokio-cron-scheduler: one async job on the configured schedule
/// sharing the database pool. The caller owns the returned scheduler and
/// shuts it down on exit.

use crate::reminders;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Builds and starts the scheduler with the reminder job attached
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `schedule` - Six-field cron expression (seconds first)
/// * `days_before` - Expiry window for the insurance and PUC scans
///
/// # Errors
///
/// Returns an error if the cron expression is invalid or the scheduler
/// fails to start.
pub async fn start(
    pool: PgPool,
    schedule: &str,
    days_before: i32,
) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job_pool = pool.clone();
    let job = Job::new_async(schedule, move |_uuid, _lock| {
        let pool = job_pool.clone();
        Box::pin(async move {
            reminders::run_cycle(&pool, days_before).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "Reminder job scheduled");

    Ok(scheduler)
}
