use anyhow::{ensure, Result};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Six-field cron expression firing at `hour:minute` UTC on `day` of every
/// month. Days past the 28th would skip short months, so they are refused.
pub fn monthly_cron(day: u32, hour: u32, minute: u32) -> Result<String> {
    ensure!((1..=28).contains(&day), "day must be within 1..=28, got {}", day);
    ensure!(hour < 24, "hour must be below 24, got {}", hour);
    ensure!(minute < 60, "minute must be below 60, got {}", minute);
    Ok(format!("0 {} {} {} * *", minute, hour, day))
}

pub struct MonthlyScheduler {
    scheduler: JobScheduler,
}

impl MonthlyScheduler {
    pub async fn new() -> Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self { scheduler })
    }

    pub async fn add_monthly_job<F, Fut>(
        &mut self,
        day: u32,
        hour: u32,
        minute: u32,
        job_fn: F,
    ) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        let cron_expression = monthly_cron(day, hour, minute)?;
        info!("Scheduling monthly job with cron: {}", cron_expression);

        let job_fn = Arc::new(job_fn);
        let job = Job::new_async(cron_expression.as_str(), move |_uuid, _l| {
            let job_fn = job_fn.clone();
            Box::pin(async move {
                info!("Executing scheduled job at {}", OffsetDateTime::now_utc());
                match job_fn().await {
                    Ok(()) => info!("Scheduled job completed successfully"),
                    Err(e) => error!("Scheduled job failed: {}", e),
                }
            })
        })?;

        self.scheduler.add(job).await?;
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        info!("Starting scheduler...");
        self.scheduler.start().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down scheduler...");
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
