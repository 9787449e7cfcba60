pub mod error;
pub mod handlers;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/v1/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/api/v1/posts/search", get(handlers::search_posts))
        .route(
            "/api/v1/posts/search-by-tag",
            get(handlers::search_posts_by_tag),
        )
        .route(
            "/api/v1/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route(
            "/api/v1/posts/{id}/related",
            get(handlers::get_post_with_related),
        )
        .route("/api/v1/activity-logs", get(handlers::list_activity_logs))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
