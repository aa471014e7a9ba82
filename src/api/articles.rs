//! `GET /api/articles` request handler

use axum::{
    extract::{RawQuery, State},
    Json,
};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use url::form_urlencoded;

use super::{ApiError, AppState};
use crate::news::{cache_key, filter_by_source, Article, ArticleQuery};

/// Whether the upstream data came from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub cache_status: CacheStatus,
    /// The validated request with defaults applied
    pub request_params: ArticleQuery,
}

/// Successful response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlesResponse {
    pub meta: ResponseMeta,
    /// Number of articles after the source filter
    pub total_results: usize,
    pub articles: Vec<Article>,
}

/// Decode a raw query string into a map; a repeated key keeps its last value
fn query_map(raw: Option<&str>) -> HashMap<String, String> {
    raw.map(|raw| form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Search GNews, serving repeated searches from the cache
///
/// Fails without doing any work when no API key is configured, and without
/// calling upstream when the query string is invalid.
pub async fn list_articles(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<ArticlesResponse>, ApiError> {
    let api_key = state.api_key.as_deref().ok_or(ApiError::NotConfigured)?;

    let query = ArticleQuery::from_params(&query_map(raw_query.as_deref()))
        .map_err(ApiError::InvalidQuery)?;

    let params = state.client.search_params(&query, api_key);
    let key = cache_key(&params);

    let (data, cache_status) = match state.cache.get(&key) {
        Some(cached) => (cached, CacheStatus::Hit),
        None => {
            let fresh = state.client.search(&params).await?;
            state.cache.set(key, fresh.clone(), state.cache_ttl);
            (fresh, CacheStatus::Miss)
        }
    };
    debug!("Cache {:?} for q={:?} max={}", cache_status, query.q, query.max);

    let articles = match query.author.as_deref() {
        Some(author) => filter_by_source(data.articles, author),
        None => data.articles,
    };

    Ok(Json(ArticlesResponse {
        meta: ResponseMeta {
            cache_status,
            request_params: query,
        },
        total_results: articles.len(),
        articles,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::{GNewsClient, SearchResponse};
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state_with_cached(api_key: &str, query: &ArticleQuery, data: SearchResponse) -> AppState {
        let state = AppState::new(
            // Nothing listens here; any upstream call in these tests would fail
            GNewsClient::new().with_base_url("http://127.0.0.1:9"),
            Some(api_key.to_string()),
        );
        let params = state.client.search_params(query, api_key);
        state.cache.set(cache_key(&params), data, Duration::minutes(10));
        state
    }

    fn sample_data() -> SearchResponse {
        serde_json::from_value(json!({
            "totalArticles": 2,
            "articles": [
                { "title": "a", "source": { "name": "BBC News", "url": "https://bbc.co.uk" } },
                { "title": "b", "source": { "name": "CNN", "url": "https://cnn.com" } }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_query_map_last_value_wins() {
        let map = query_map(Some("q=one&max=5&q=two%20words"));

        assert_eq!(map.get("q").map(String::as_str), Some("two words"));
        assert_eq!(map.get("max").map(String::as_str), Some("5"));
        assert!(query_map(None).is_empty());
    }

    #[test]
    fn test_cache_status_serializes_uppercase() {
        assert_eq!(serde_json::to_value(CacheStatus::Hit).unwrap(), json!("HIT"));
        assert_eq!(serde_json::to_value(CacheStatus::Miss).unwrap(), json!("MISS"));
    }

    #[tokio::test]
    async fn test_missing_api_key_short_circuits() {
        let state = AppState::new(GNewsClient::new(), None);

        let result = list_articles(State(state), RawQuery(Some("max=abc".to_string()))).await;

        assert!(matches!(result, Err(ApiError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_empty_api_key_is_not_configured() {
        let state = AppState::new(GNewsClient::new(), Some(String::new()));

        let result = list_articles(State(state), RawQuery(None)).await;

        assert!(matches!(result, Err(ApiError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_invalid_query_rejected() {
        let state = AppState::new(GNewsClient::new(), Some("k".to_string()));

        let result = list_articles(State(state), RawQuery(Some("max=101".to_string()))).await;

        match result {
            Err(ApiError::InvalidQuery(errors)) => {
                assert_eq!(errors.field("max"), ["Number must be less than or equal to 100"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cached_response_is_hit_and_filtered() {
        let state = state_with_cached("k", &ArticleQuery::default(), sample_data());

        let Json(response) = list_articles(State(state), RawQuery(Some("author=bbc".to_string())))
            .await
            .unwrap();

        assert_eq!(response.meta.cache_status, CacheStatus::Hit);
        assert_eq!(response.total_results, 1);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "meta": {
                    "cacheStatus": "HIT",
                    "requestParams": { "q": "technology", "max": 10, "author": "bbc" }
                },
                "totalResults": 1,
                "articles": [
                    { "title": "a", "source": { "name": "BBC News", "url": "https://bbc.co.uk" } }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_total_results_counts_unfiltered_articles() {
        let state = state_with_cached("k", &ArticleQuery::default(), sample_data());

        let Json(response) = list_articles(State(state), RawQuery(None)).await.unwrap();

        assert_eq!(response.total_results, 2);
        assert_eq!(response.articles.len(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_request_error() {
        let state = AppState::new(
            GNewsClient::new().with_base_url("http://127.0.0.1:9"),
            Some("secret-key".to_string()),
        );

        let result = list_articles(State(state.clone()), RawQuery(None)).await;

        match result {
            Err(err @ ApiError::News(_)) => {
                assert!(!err.to_string().contains("secret-key"));
            }
            other => panic!("expected upstream failure, got {:?}", other),
        }
        assert!(state.cache.is_empty(), "Failures must not be cached");
    }
}
