use scriven_api_types::TagsPatch;
use thiserror::Error;

use crate::application::repos::RepoError;
use crate::application::search::SearchError;
use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("post `{id}` not found")]
    NotFound { id: i64 },
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl PostServiceError {
    /// Lift a repository failure for `id`, turning a missing row into `NotFound`.
    pub(crate) fn for_post(id: i64, err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound { id },
            other => Self::Repo(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: TagsPatch,
}

#[derive(Debug, Clone)]
pub struct TagSearchResult {
    pub posts: Vec<PostRecord>,
    pub count: u64,
}
