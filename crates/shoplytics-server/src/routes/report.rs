use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shoplytics_pipeline::MetricsCalculator;

use crate::{
    error::AppError,
    routes::{filters::SalesQuery, metrics::with_selection},
    state::AppState,
};

/// `GET /api/report` - every analysis for one selection.
///
/// Sections whose column is missing are rendered inline as
/// `{ "error": ... }` instead of failing the request.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = with_selection(&state, &query, |s| {
        MetricsCalculator::new(&s.current).comprehensive_report(s.comparison.as_ref())
    })
    .await?;
    Ok(Json(json!({ "data": report })))
}
