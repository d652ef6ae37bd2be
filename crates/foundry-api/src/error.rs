//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use foundry_persistence::PersistenceError;
use foundry_review::ReviewError;
use foundry_timeline::{TimelineError, ValidationError};

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error type for consistent error responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - malformed input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Well-formed input that failed validation.
    #[error("validation failed: {0}")]
    Unprocessable(String),

    /// The caller may not perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(json!({
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
}

impl From<TimelineError> for ApiError {
    fn from(err: TimelineError) -> Self {
        match err {
            TimelineError::Validation(e) => e.into(),
            TimelineError::PermissionDenied(reason) => ApiError::Forbidden(reason),
            TimelineError::NotFound { kind, id } => ApiError::NotFound(format!("{} {}", kind, id)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound { kind, id } => ApiError::NotFound(format!("{} {}", kind, id)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { kind, id } => ApiError::NotFound(format!("{} {}", kind, id)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
