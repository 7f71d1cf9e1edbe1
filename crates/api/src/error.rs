use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use dermalens_openai::ChatApiError;
use dermalens_storage::StorageError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the service's uniform failure
/// envelope: `{"status": false, "msg": ..., "error": ...?}`. The `error`
/// field carries the underlying collaborator message when there is one.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request failed the auth gate.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The object-storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The language-model collaborator failed.
    #[error("Model error: {0}")]
    Model(#[from] ChatApiError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg, detail) = match &self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),

            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                    Some(err.to_string()),
                )
            }

            AppError::Storage(err) => {
                tracing::error!(error = %err, "Image upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image upload failed".to_string(),
                    Some(err.to_string()),
                )
            }

            AppError::Model(err) => {
                tracing::error!(error = %err, "Detection failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Detection failed".to_string(),
                    Some(err.to_string()),
                )
            }

            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let mut body = json!({
            "status": false,
            "msg": msg,
        });
        if let Some(detail) = detail {
            body["error"] = json!(detail);
        }

        (status, axum::Json(body)).into_response()
    }
}
