//! API handlers organized by resource type.
//!
//! Error conversions shared by the resource modules live here.

mod activity_logs;
mod health;
mod posts;

pub use activity_logs::*;
pub use health::*;
pub use posts::*;

use axum::http::StatusCode;

use crate::application::posts::PostServiceError;
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found("Resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence error",
            Some(msg),
        ),
    }
}

pub(crate) fn post_to_api(err: PostServiceError) -> ApiError {
    match err {
        PostServiceError::Domain(DomainError::Validation { message }) => {
            ApiError::validation(message)
        }
        PostServiceError::NotFound { id } => ApiError::not_found(format!("Post {id} not found")),
        PostServiceError::Repo(repo) => repo_to_api(repo),
        PostServiceError::Search(search) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::SEARCH,
            "Search index request failed",
            Some(search.to_string()),
        ),
    }
}

/// Post ids are positive store-assigned integers.
pub(crate) fn parse_post_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::bad_request(
            "Invalid post id",
            Some(format!("`{raw}` is not a positive integer")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::search::SearchError;

    #[test]
    fn post_ids_must_be_positive_integers() {
        assert_eq!(parse_post_id("42").expect("numeric id"), 42);
        for raw in ["abc", "0", "-3", "1.5", ""] {
            let err = parse_post_id(raw).unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let cases = [
            (
                PostServiceError::Domain(DomainError::validation("title is required")),
                StatusCode::BAD_REQUEST,
            ),
            (PostServiceError::NotFound { id: 9 }, StatusCode::NOT_FOUND),
            (
                PostServiceError::Repo(RepoError::from_persistence("tx aborted")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PostServiceError::Search(SearchError::transport("refused")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(post_to_api(err).status(), status);
        }
    }
}
