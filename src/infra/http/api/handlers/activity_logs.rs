use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use scriven_api_types::{ActivityLogsResponse, PageQuery};

use crate::application::pagination::{DEFAULT_ACTIVITY_PAGE_SIZE, PageRequest};

use super::repo_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_activity_logs(
    State(state): State<ApiState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::new(query.page, query.limit, DEFAULT_ACTIVITY_PAGE_SIZE);

    let page = state.activity.list(request).await.map_err(repo_to_api)?;

    Ok(Json(ActivityLogsResponse {
        logs: page.items,
        pagination: page.pagination,
    }))
}
