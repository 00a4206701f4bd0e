use std::collections::BTreeMap;

use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

/// Field name -> first failing message for that field.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Errors surfaced by the screen endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ApiError> for (StatusCode, String) {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(fields) => {
                let body = serde_json::to_string(&fields)
                    .unwrap_or_else(|_| "validation failed".to_string());
                (StatusCode::UNPROCESSABLE_ENTITY, body)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Internal(e) => internal(e),
        }
    }
}

/// Logs the cause and hides it behind a generic message.
pub fn internal(e: impl std::fmt::Display) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Something went wrong".to_string(),
    )
}
