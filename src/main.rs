//! GNews Proxy - search news articles through a caching HTTP endpoint
//!
//! Serves `GET /api/articles`, backed by the GNews search API.

use clap::Parser;
use log::{info, warn};
use tokio::net::TcpListener;

use gnews_proxy::api::{self, AppState};
use gnews_proxy::cli::{Cli, ServerConfig};
use gnews_proxy::news::GNewsClient;

/// Initializes env_logger, defaulting to `info` when RUST_LOG is not set
fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment may already be set
    dotenv::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = ServerConfig::from_cli(&cli)?;

    if config.api_key.is_none() {
        warn!("GNEWS_API_KEY is not set; every request will fail until it is configured");
    }
    info!(
        "Using GNews API at {} with a {}s cache TTL",
        config.api_url,
        config.cache_ttl.num_seconds()
    );

    let client = GNewsClient::new().with_base_url(config.api_url.as_str());
    let state = AppState::new(client, config.api_key).with_cache_ttl(config.cache_ttl);

    let listener = TcpListener::bind(config.bind).await?;
    api::serve(listener, state).await?;

    Ok(())
}
