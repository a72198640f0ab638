//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::DatabaseError;
use orchestrator::OrchestratorError;
use thiserror::Error;

/// Errors returned by handlers. Rendered as `{"message": …}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// No authenticated user, or a bad admin key.
    #[error("Unauthorized")]
    Unauthorized,

    /// The resource does not exist or is not the caller's.
    #[error("{0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(DatabaseError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, .. } => {
                ApiError::NotFound(format!("{entity} not found"))
            }
            DatabaseError::Validation(e) => ApiError::BadRequest(e.to_string()),
            err @ DatabaseError::AlreadyExists { .. } => ApiError::BadRequest(err.to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Database(err) => tracing::error!("Database error: {}", err),
            ApiError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => tracing::debug!(%status, "Request rejected: {}", self),
        }

        let body = serde_json::json!({
            "message": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
