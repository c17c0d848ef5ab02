use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::ExportError;

/// Shown for any failure after an export has started.
pub const EXPORT_FAILED_MESSAGE: &str = "An error occurred while generating the PDF. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resume preview not found")]
    PreviewNotFound,

    #[error("An export is already in progress")]
    ExportInProgress,

    #[error("Export failed: {0}")]
    ExportStage(String),

    #[error("Remote request failed: {0}")]
    RemoteRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::PreviewNotFound => AppError::PreviewNotFound,
            ExportError::InProgress => AppError::ExportInProgress,
            other => AppError::ExportStage(other.to_string()),
        }
    }
}

/// Malformed or mistyped request bodies get the same error envelope as everything else.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PreviewNotFound => (
                StatusCode::NOT_FOUND,
                "PREVIEW_NOT_FOUND",
                "Resume preview not found".to_string(),
            ),
            AppError::ExportInProgress => (
                StatusCode::CONFLICT,
                "EXPORT_IN_PROGRESS",
                "An export is already in progress".to_string(),
            ),
            AppError::ExportStage(detail) => {
                tracing::error!("Export error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    EXPORT_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::RemoteRequest(msg) => (
                StatusCode::BAD_GATEWAY,
                "REMOTE_REQUEST_FAILED",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
