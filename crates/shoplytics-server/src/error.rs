use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use shoplytics_core::error::PipelineError;

/// Application-level errors that map directly to HTTP responses.
///
/// Handlers return `Result<impl IntoResponse, AppError>`; pipeline failures
/// convert through `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid {field}: {message}")]
    InvalidParam {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParam {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field = None;
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::InvalidParam {
                field: name,
                message,
            } => {
                field = Some(*name);
                (
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    message.clone(),
                )
            }
            AppError::Pipeline(err @ PipelineError::MissingSource { .. }) => {
                tracing::error!(error = %err, "Dataset source missing");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "missing_source",
                    err.to_string(),
                )
            }
            AppError::Pipeline(err @ PipelineError::MissingDimension(_)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_dimension",
                err.to_string(),
            ),
            AppError::Pipeline(err) => {
                tracing::error!(error = %err, "Dataset could not be loaded");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "invalid_dataset",
                    err.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": message,
                    "field": field
                }
            })),
        )
            .into_response()
    }
}
