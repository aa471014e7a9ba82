//! HTTP surface of the service
//!
//! Exposes `GET /api/articles` through an axum router. The shared state holds
//! the GNews client, the response cache, and the server-held API key.

mod articles;
mod error;

pub use articles::{list_articles, ArticlesResponse, CacheStatus, ResponseMeta};
pub use error::ApiError;

use axum::{routing::get, Router};
use chrono::Duration;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::cache::TtlCache;
use crate::news::{GNewsClient, SearchResponse};

/// How long a GNews response is served from the cache (10 minutes)
pub const DEFAULT_CACHE_TTL_MS: i64 = 600_000;

/// State shared by every request task
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: GNewsClient,
    pub cache: Arc<TtlCache<SearchResponse>>,
    pub api_key: Option<String>,
    pub cache_ttl: Duration,
}

impl AppState {
    /// Create state with an empty cache and the default TTL
    ///
    /// An empty `api_key` is treated the same as a missing one.
    pub fn new(client: GNewsClient, api_key: Option<String>) -> Self {
        Self {
            client,
            cache: Arc::new(TtlCache::new()),
            api_key: api_key.filter(|key| !key.is_empty()),
            cache_ttl: Duration::milliseconds(DEFAULT_CACHE_TTL_MS),
        }
    }

    /// Override how long upstream responses stay cached
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    /// Share an existing cache instead of the one created by `new`
    pub fn with_cache(mut self, cache: Arc<TtlCache<SearchResponse>>) -> Self {
        self.cache = cache;
        self
    }
}

/// Build the router with all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/articles", get(list_articles))
        .with_state(state)
}

/// Serve the API on an already bound listener until the process exits
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let app = router(state);

    if let Ok(addr) = listener.local_addr() {
        info!("Serving articles at http://{}/api/articles", addr);
    }

    axum::serve(listener, app).await
}
