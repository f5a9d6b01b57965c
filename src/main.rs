use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Whale Spotting profile frontend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the sightings REST API (overrides API_BASE_URL)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Port to listen on (overrides HTTP_PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Directory with species images and trophies (overrides ASSETS_PATH)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// REST API request timeout in seconds (overrides API_TIMEOUT_SECS)
    #[arg(long)]
    api_timeout: Option<u64>,
}

mod api;
mod config;
mod error;
mod models;
mod views;
mod web;

use api::{HttpApiClient, HttpConnector};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(assets) = args.assets {
        config.assets_path = assets;
    }
    if let Some(secs) = args.api_timeout.filter(|s| *s > 0) {
        config.api_timeout = Duration::from_secs(secs);
    }

    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_max_level(config.log_level)
        .init();

    info!("Using sightings API at {}", config.api_base_url);
    let client = HttpApiClient::new(&config.api_base_url, config.api_timeout)?;
    let connector = Arc::new(HttpConnector::new(client));

    web::start_web_server(&config, connector).await
}
