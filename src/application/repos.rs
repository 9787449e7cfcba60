//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::PageRequest;
use crate::domain::entities::{ActivityLogRecord, PostRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;

    /// Fetch the given ids; order of the result is unspecified and missing ids are skipped.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<PostRecord>, RepoError>;

    async fn count_posts(&self) -> Result<u64, RepoError>;

    /// Newest first: `created_at DESC, id DESC`.
    async fn list_posts(&self, page: PageRequest) -> Result<Vec<PostRecord>, RepoError>;

    /// Every post whose tag list contains `tag`, newest first.
    async fn find_by_tag(&self, tag: &str) -> Result<Vec<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Insert the post and its `new_post` activity entry atomically.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Replace title, content and tags, refreshing `updated_at`.
    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    /// Remove the post together with the activity entries referencing it and record a
    /// terminal `delete_post` entry, all in one transaction. Returns the removed post.
    async fn delete_post(&self, id: i64) -> Result<PostRecord, RepoError>;
}

#[async_trait]
pub trait ActivityLogsRepo: Send + Sync {
    async fn count_logs(&self) -> Result<u64, RepoError>;

    /// Newest first: `logged_at DESC, id DESC`.
    async fn list_logs(&self, page: PageRequest) -> Result<Vec<ActivityLogRecord>, RepoError>;
}
