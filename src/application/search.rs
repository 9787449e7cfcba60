//! Search index port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::SearchDocument;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search transport error: {0}")]
    Transport(String),
    #[error("search index rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected search response: {0}")]
    Decode(String),
}

impl SearchError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FullTextHits {
    pub documents: Vec<SearchDocument>,
    pub total: u64,
    /// Milliseconds reported by the index.
    pub took_ms: u64,
}

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create the index with its mapping when it does not exist yet.
    async fn ensure_index(&self) -> Result<(), SearchError>;

    async fn upsert(&self, document: &SearchDocument) -> Result<(), SearchError>;

    /// Remove a document; a missing document is not an error.
    async fn remove(&self, id: i64) -> Result<(), SearchError>;

    async fn full_text(&self, query: &str, limit: usize) -> Result<FullTextHits, SearchError>;

    /// Ids of documents sharing at least one tag, best match first, excluding `exclude_id`.
    async fn related_ids(
        &self,
        tags: &[&str],
        exclude_id: i64,
        limit: usize,
    ) -> Result<Vec<i64>, SearchError>;

    async fn ping(&self) -> Result<(), SearchError>;
}
