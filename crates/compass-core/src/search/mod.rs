//! Web search.

mod duckduckgo;

pub use duckduckgo::DuckDuckGo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("search returned HTTP {0}")]
    Status(u16),

    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(String),
}

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A text search engine.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Returns at most `max_results` hits for `query`, best first.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

#[async_trait]
impl<T: WebSearch + ?Sized> WebSearch for Box<T> {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        (**self).search(query, max_results).await
    }
}

#[async_trait]
impl<T: WebSearch + ?Sized> WebSearch for std::sync::Arc<T> {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        (**self).search(query, max_results).await
    }
}
