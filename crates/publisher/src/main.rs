use anyhow::Result;
use clap::Parser;
use common::{CalendarMonth, Config};
use publisher::{previous_month, SnapshotPublisher};
use time::OffsetDateTime;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Publish a month's idea leaderboard to Supabase storage.
#[derive(Parser, Debug)]
#[command(name = "publisher", version)]
struct Args {
    /// Month to publish as YYYY-MM; defaults to the month that just ended.
    #[arg(long)]
    month: Option<CalendarMonth>,

    /// Print the markdown instead of uploading it.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::from_env()?;
    let month = match args.month {
        Some(month) => month,
        None => previous_month(&config, OffsetDateTime::now_utc())?,
    };

    let publisher = SnapshotPublisher::from_config(&config);
    if args.dry_run {
        match publisher.render(&month).await? {
            Some(markdown) => println!("{}", markdown),
            None => info!("Nothing to publish for {}", month),
        }
        return Ok(());
    }

    config.require_service_role_key()?;
    match publisher.publish(&month).await? {
        Some(path) => info!("Leaderboard for {} stored at {}", month, path),
        None => info!("Nothing to publish for {}", month),
    }
    Ok(())
}
