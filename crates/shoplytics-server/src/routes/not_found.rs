use axum::http::{Method, Uri};

use crate::error::AppError;

/// Fallback for paths no route matches; answers with the JSON error envelope.
pub async fn not_found(method: Method, uri: Uri) -> AppError {
    tracing::debug!(%method, %uri, "No route matched");
    AppError::NotFound(format!("No route for {method} {}", uri.path()))
}
