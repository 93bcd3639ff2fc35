use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use shoplytics_core::sales::SalesView;
use shoplytics_pipeline::MetricsCalculator;

use crate::{error::AppError, routes::filters::SalesQuery, state::AppState};

/// The filtered sales view for a request, plus the `compare_year` view when
/// one was asked for.
pub(crate) struct Selection {
    pub current: SalesView,
    pub comparison: Option<SalesView>,
}

/// Build the selection for `query` and run `compute` over it on the blocking
/// pool. Joins and aggregation are CPU bound and scale with the export.
pub(crate) async fn with_selection<T, F>(
    state: &AppState,
    query: &SalesQuery,
    compute: F,
) -> Result<T, AppError>
where
    F: FnOnce(&Selection) -> T + Send + 'static,
    T: Send + 'static,
{
    let filter = query.filter(&state.config)?;
    let compare_year = query.compare_year()?;
    let dataset = state.dataset().await?;

    tokio::task::spawn_blocking(move || {
        let selection = Selection {
            current: dataset.sales(&filter),
            comparison: compare_year.map(|year| dataset.sales(&filter.with_year(year))),
        };
        tracing::debug!(
            year = ?filter.year,
            month = ?filter.month,
            status = ?filter.status,
            compare_year = ?compare_year,
            rows = selection.current.len(),
            "Sales selection built"
        );
        compute(&selection)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))
}

/// `GET /api/metrics/revenue` - revenue metrics, with growth when
/// `compare_year` is given.
pub async fn get_revenue(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let metrics = with_selection(&state, &query, |s| {
        MetricsCalculator::new(&s.current).revenue_metrics(s.comparison.as_ref())
    })
    .await?;
    Ok(Json(json!({ "data": metrics })))
}

/// `GET /api/metrics/monthly` - month-by-month revenue and order trends.
pub async fn get_monthly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let trends = with_selection(&state, &query, |s| {
        MetricsCalculator::new(&s.current).monthly_trends()
    })
    .await??;
    Ok(Json(json!({ "data": trends })))
}

/// `GET /api/metrics/categories` - revenue by product category.
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = with_selection(&state, &query, |s| {
        MetricsCalculator::new(&s.current).product_performance()
    })
    .await??;
    Ok(Json(json!({ "data": rows })))
}

/// `GET /api/metrics/states` - revenue by customer state.
pub async fn get_states(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = with_selection(&state, &query, |s| {
        MetricsCalculator::new(&s.current).geographic_performance()
    })
    .await??;
    Ok(Json(json!({ "data": rows })))
}

/// `GET /api/metrics/satisfaction` - review score statistics.
///
/// A selection without scores still answers `200` with an inline
/// `{ "error": ... }` payload.
pub async fn get_satisfaction(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let analysis = with_selection(&state, &query, |s| {
        MetricsCalculator::new(&s.current).customer_satisfaction()
    })
    .await?;
    Ok(Json(json!({ "data": analysis })))
}

/// `GET /api/metrics/delivery` - delivery speed and its effect on reviews.
pub async fn get_delivery(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let analysis = with_selection(&state, &query, |s| {
        MetricsCalculator::new(&s.current).delivery_performance()
    })
    .await?;
    Ok(Json(json!({ "data": analysis })))
}
