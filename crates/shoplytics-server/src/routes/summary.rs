use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// `GET /api/summary` - dataset-wide statistics, ignoring every filter.
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let dataset = state.dataset().await?;
    Ok(Json(json!({ "data": dataset.summary() })))
}
