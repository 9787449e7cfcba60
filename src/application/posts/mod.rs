mod commands;
mod queries;
mod related;
mod service;
pub mod types;

pub use service::*;
pub use types::{CreatePostCommand, PostServiceError, TagSearchResult, UpdatePostCommand};
