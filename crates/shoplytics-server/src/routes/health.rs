use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// `GET /health` - liveness check.
///
/// Returns `503 Service Unavailable` with `"status": "degraded"` when the
/// configured data directory does not exist.
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cached = state.cached_sources().await;
    if state.data_dir().is_dir() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
                "cached_sources": cached
            })),
        )
            .into_response()
    } else {
        tracing::error!(data_dir = %state.config.data_dir, "Health check: data directory missing");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "version": env!("CARGO_PKG_VERSION"),
                "cached_sources": cached
            })),
        )
            .into_response()
    }
}
