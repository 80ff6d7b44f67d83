use anyhow::Result;
use common::Config;
use publisher::{previous_month, SnapshotPublisher};
use scheduler::MonthlyScheduler;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

async fn publish_previous_month(config: Arc<Config>) -> Result<()> {
    let month = previous_month(&config, OffsetDateTime::now_utc())?;
    info!("Publishing leaderboard for {}", month);

    let publisher = SnapshotPublisher::from_config(&config);
    match publisher.publish(&month).await? {
        Some(path) => info!("Leaderboard for {} stored at {}", month, path),
        None => info!("No leaderboard published for {}", month),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    config.require_service_role_key()?;
    let config = Arc::new(config);

    let mut scheduler = MonthlyScheduler::new().await?;

    // By 00:10 UTC on the 2nd the previous month has ended in every offset.
    scheduler
        .add_monthly_job(2, 0, 10, move || publish_previous_month(config.clone()))
        .await?;

    scheduler.start().await?;
    info!("Scheduler configured to publish monthly leaderboards on day 2 at 00:10 UTC");
    info!("Press Ctrl+C to stop the scheduler");

    tokio::signal::ctrl_c().await?;
    info!("Received interrupt signal, shutting down...");
    scheduler.shutdown().await?;

    Ok(())
}
