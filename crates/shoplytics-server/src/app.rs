use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// `TraceLayer` logs every request through `tracing`. CORS is open to any
/// origin unless `SHOPLYTICS_CORS_ORIGINS` lists specific ones.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors_origins);
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/summary", get(routes::summary::get_summary))
        .route("/api/metrics/revenue", get(routes::metrics::get_revenue))
        .route("/api/metrics/monthly", get(routes::metrics::get_monthly))
        .route(
            "/api/metrics/categories",
            get(routes::metrics::get_categories),
        )
        .route("/api/metrics/states", get(routes::metrics::get_states))
        .route(
            "/api/metrics/satisfaction",
            get(routes::metrics::get_satisfaction),
        )
        .route("/api/metrics/delivery", get(routes::metrics::get_delivery))
        .route("/api/report", get(routes::report::get_report))
        .route("/api/dashboard", get(routes::dashboard::get_dashboard))
        .fallback(routes::not_found::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
