use axum::{Router, http::StatusCode, routing::get};

use crate::{error::ApiError, relay, state::ApiState, v1};

/// Application routes: the JSON API under `/api`, the relay socket and a
/// liveness probe. `/metrics` is mounted by the binary, which owns the
/// Prometheus handle.
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(relay::ws_handler))
        .nest("/api", v1::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> ApiError {
    ApiError::NotFound("Resource")
}
