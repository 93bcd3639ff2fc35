use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shoplytics_pipeline::dashboard::build_dashboard;

use crate::{error::AppError, routes::filters::SalesQuery, state::AppState};

/// `GET /api/dashboard` - the dashboard payload for a year/month/status
/// selection. Without `year` the configured default year is used when it has
/// data, otherwise the latest year. `compare_year` is ignored; the dashboard
/// always compares against the previous year.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let request = query.dashboard_request(&state.config)?;
    let dataset = state.dataset().await?;
    let (default_year, top_categories) = (state.config.default_year, state.config.top_categories);
    let view = tokio::task::spawn_blocking(move || {
        build_dashboard(&dataset, &request, default_year, top_categories)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Json(json!({ "data": view })))
}
