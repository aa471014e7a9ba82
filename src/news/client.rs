//! GNews search API client
//!
//! This module builds the upstream query string for an `ArticleQuery` and
//! fetches search results from the GNews `/search` endpoint.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::form_urlencoded;

use super::{ArticleQuery, SearchResponse};

/// Base URL for the GNews API
pub const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";

/// Language every search is restricted to
const SEARCH_LANGUAGE: &str = "en";

/// Namespace prefix for cached search responses
const CACHE_KEY_PREFIX: &str = "gnews_func:";

/// Errors that can occur when searching GNews
#[derive(Debug, Error)]
pub enum NewsError {
    /// GNews answered with a non-success status
    #[error("GNews API error: {0}")]
    Api(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for NewsError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key, keep it out of messages and logs
        NewsError::RequestFailed(err.without_url())
    }
}

/// Error body returned by GNews on failure
#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Option<Vec<String>>,
}

/// Client for the GNews search endpoint
#[derive(Debug, Clone)]
pub struct GNewsClient {
    client: Client,
    base_url: String,
}

impl Default for GNewsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GNewsClient {
    /// Create a new GNewsClient pointing at the public GNews API
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: GNEWS_BASE_URL.to_string(),
        }
    }

    /// Create a new GNewsClient with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: GNEWS_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root, e.g. a local mock
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Serialize the upstream query string for a validated request
    ///
    /// The parameter order is fixed so equal requests produce equal strings.
    /// `author` is left out because GNews cannot filter by it.
    pub fn search_params(&self, query: &ArticleQuery, api_key: &str) -> String {
        let max = query.max.to_string();
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("q", &query.q)
            .append_pair("max", &max)
            .append_pair("lang", SEARCH_LANGUAGE)
            .append_pair("apikey", api_key);

        if let Some(category) = query.category {
            serializer.append_pair("category", category.as_str());
        }
        if let Some(from) = &query.from {
            serializer.append_pair("from", from);
        }
        if let Some(to) = &query.to {
            serializer.append_pair("to", to);
        }

        serializer.finish()
    }

    /// Fetch search results for a query string built by `search_params`
    ///
    /// # Returns
    /// * `Ok(SearchResponse)` - Parsed search results
    /// * `Err(NewsError)` - If the request fails, GNews reports an error, or the body is not valid JSON
    pub async fn search(&self, params: &str) -> Result<SearchResponse, NewsError> {
        let url = format!("{}/search?{}", self.base_url, params);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(NewsError::Api(upstream_error_message(&text)));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Cache key for an upstream query string
pub fn cache_key(params: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, params)
}

/// Join the messages of a GNews error body, or fall back to "Unknown error"
fn upstream_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            errors: Some(errors),
        }) => errors.join(", "),
        _ => "Unknown error".to_string(),
    }
}
