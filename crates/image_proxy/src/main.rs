use std::sync::Arc;

use anyhow::{Context, Result};
use common::Config;
use image_proxy::{start_server, OpenAiImageClient, ProxyState};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;
    config.require_image_api_key()?;
    let generator = OpenAiImageClient::from_config(&config.image)
        .context("failed to configure image generator")?;

    info!("Image proxy using model {}", config.image.model);
    let state = Arc::new(ProxyState {
        generator: Box::new(generator),
    });
    start_server(state, config.image.bind_addr).await
}
