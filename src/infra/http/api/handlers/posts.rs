//! Posts handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use scriven_api_types::{
    DeleteResponse, PageQuery, PostCreateRequest, PostUpdateRequest, PostWithRelated,
    PostsResponse, SearchQuery, SearchResponse, TagQuery, TagSearchResponse,
};

use crate::application::pagination::{DEFAULT_POSTS_PAGE_SIZE, PageRequest};
use crate::application::posts::{CreatePostCommand, UpdatePostCommand};

use super::{parse_post_id, post_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_posts(
    State(state): State<ApiState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::new(query.page, query.limit, DEFAULT_POSTS_PAGE_SIZE);

    let page = state.posts.list_posts(request).await.map_err(post_to_api)?;

    Ok(Json(PostsResponse {
        posts: page.items,
        pagination: page.pagination,
    }))
}

pub async fn get_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;
    let post = state.posts.get_post(id).await.map_err(post_to_api)?;
    Ok(Json(post))
}

pub async fn get_post_with_related(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;
    let (post, related_posts) = state
        .posts
        .get_post_with_related(id)
        .await
        .map_err(post_to_api)?;

    Ok(Json(PostWithRelated {
        post,
        related_posts,
    }))
}

pub async fn create_post(
    State(state): State<ApiState>,
    payload: Result<Json<PostCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let post = state
        .posts
        .create_post(CreatePostCommand {
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
        })
        .await
        .map_err(post_to_api)?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<PostUpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;
    let Json(payload) = payload?;

    let post = state
        .posts
        .update_post(UpdatePostCommand {
            id,
            title: payload.title,
            content: payload.content,
            tags: payload.tags,
        })
        .await
        .map_err(post_to_api)?;

    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<ApiState>,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_post_id(&raw_id)?;
    let deleted = state.posts.delete_post(id).await.map_err(post_to_api)?;

    Ok(Json(DeleteResponse {
        message: "Post deleted successfully".to_string(),
        id: deleted.id,
    }))
}

pub async fn search_posts_by_tag(
    State(state): State<ApiState>,
    query: Result<Query<TagQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let tag = query.tag.unwrap_or_default();

    let result = state
        .posts
        .search_by_tag(&tag)
        .await
        .map_err(post_to_api)?;

    Ok(Json(TagSearchResponse {
        posts: result.posts,
        count: result.count,
    }))
}

pub async fn search_posts(
    State(state): State<ApiState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let q = query.q.unwrap_or_default();

    let hits = state
        .posts
        .full_text_search(&q)
        .await
        .map_err(post_to_api)?;

    Ok(Json(SearchResponse {
        posts: hits.documents,
        total: hits.total,
        took: hits.took_ms,
    }))
}
