//! Command-line interface parsing for the GNews proxy
//!
//! This module handles parsing of CLI arguments using clap. Every flag can also
//! be supplied through the environment (or a `.env` file), which is how the
//! GNews API key is normally provided.

use chrono::Duration;
use clap::Parser;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::news::client::GNEWS_BASE_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The GNews base URL could not be parsed
    #[error("Invalid GNews API URL '{0}': {1}")]
    InvalidApiUrl(String, url::ParseError),

    /// The GNews base URL is not http(s)
    #[error("Unsupported GNews API URL scheme '{0}'. Use http or https")]
    UnsupportedScheme(String),

    /// The cache TTL does not fit a duration
    #[error("Cache TTL of {0} seconds is out of range")]
    TtlOutOfRange(u64),
}

/// GNews proxy - search news articles with an in-memory response cache
#[derive(Parser, Debug)]
#[command(name = "gnews-proxy")]
#[command(about = "HTTP proxy for GNews article search with response caching")]
#[command(version)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// GNews API key. Requests fail with a configuration error when unset
    #[arg(long, env = "GNEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Root of the GNews API
    #[arg(long, env = "GNEWS_API_URL", default_value = GNEWS_BASE_URL)]
    pub api_url: String,

    /// How long search responses are cached, in seconds
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 600)]
    pub cache_ttl_secs: u64,
}

/// Server settings derived from CLI arguments
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// `None` when the key is missing or empty
    pub api_key: Option<String>,
    /// API root without a trailing slash
    pub api_url: String,
    pub cache_ttl: Duration,
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with normalized settings
    /// * `Err(CliError)` if the API URL or TTL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let url = Url::parse(&cli.api_url)
            .map_err(|e| CliError::InvalidApiUrl(cli.api_url.clone(), e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CliError::UnsupportedScheme(url.scheme().to_string()));
        }

        let ttl_secs = i64::try_from(cli.cache_ttl_secs)
            .map_err(|_| CliError::TtlOutOfRange(cli.cache_ttl_secs))?;
        let cache_ttl =
            Duration::try_seconds(ttl_secs).ok_or(CliError::TtlOutOfRange(cli.cache_ttl_secs))?;

        Ok(ServerConfig {
            bind: cli.bind,
            api_key: cli.api_key.clone().filter(|key| !key.is_empty()),
            api_url: cli.api_url.trim_end_matches('/').to_string(),
            cache_ttl,
        })
    }
}
