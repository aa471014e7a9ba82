//! Core data models for GNews search results
//!
//! This module contains the article types returned by the upstream API, the
//! validated request query, and the client that talks to GNews.

pub mod client;
pub mod query;

pub use client::{cache_key, GNewsClient, NewsError};
pub use query::{ArticleQuery, Category, ValidationErrors};

use serde::{Deserialize, Serialize};

/// Publisher of an article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single news article as returned by GNews
///
/// Fields are passed through to clients unchanged; missing fields stay missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ArticleSource>,
}

impl Article {
    /// Name of the publishing source, if upstream provided one
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref()?.name.as_deref()
    }
}

/// Successful response body of the GNews `/search` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Keeps only the articles whose source name contains `author`, ignoring case
///
/// Articles without a source name never match. An empty `author` keeps everything.
pub fn filter_by_source(articles: Vec<Article>, author: &str) -> Vec<Article> {
    if author.is_empty() {
        return articles;
    }

    let needle = author.to_lowercase();
    articles
        .into_iter()
        .filter(|article| {
            article
                .source_name()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}
