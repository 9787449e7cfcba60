use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scriven_api_types::HealthResponse;
use tokio::time::timeout;

use crate::application::error::ErrorReport;
use crate::infra::http::api::state::ApiState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// 200 while PostgreSQL answers; cache and index outages only degrade the status.
pub async fn health(State(state): State<ApiState>) -> Response {
    let (database, cache, search) = tokio::join!(
        timeout(PROBE_TIMEOUT, state.db.health_check()),
        timeout(PROBE_TIMEOUT, state.cache.ping()),
        timeout(PROBE_TIMEOUT, state.search.ping()),
    );

    let database_up = matches!(database, Ok(Ok(())));
    let cache_up = matches!(cache, Ok(Ok(())));
    let search_up = matches!(search, Ok(Ok(())));

    let overall = match (database_up, cache_up && search_up) {
        (false, _) => "unavailable",
        (true, false) => "degraded",
        (true, true) => "ok",
    };

    let body = HealthResponse {
        status: overall.to_string(),
        database: probe_label(database_up),
        cache: probe_label(cache_up),
        search: probe_label(search_up),
    };

    if database_up {
        return (StatusCode::OK, Json(body)).into_response();
    }

    let mut response = (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    let detail = match database {
        Ok(Err(err)) => err.to_string(),
        _ => "database health check timed out".to_string(),
    };
    ErrorReport::from_message(
        "infra::http::api::health",
        StatusCode::SERVICE_UNAVAILABLE,
        detail,
    )
    .attach(&mut response);
    response
}

fn probe_label(up: bool) -> String {
    if up { "up" } else { "down" }.to_string()
}
