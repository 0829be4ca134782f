//! Custom error types for the marketplace service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use common::error::DatabaseError;

/// Custom error type for the marketplace service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input shape
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid session
    #[error("Not authenticated")]
    Unauthenticated,

    /// Login rejected; deliberately silent about which field was wrong
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated but not authorized for the target resource
    #[error("Forbidden")]
    Forbidden,

    /// Target entity absent
    #[error("Not found")]
    NotFound,

    /// Name or email already registered
    #[error("Name or email already registered")]
    DuplicateIdentity,

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Underlying storage failure
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Not authenticated".to_string())
            }
            ApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not own this listing".to_string(),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            ApiError::DuplicateIdentity => (
                StatusCode::CONFLICT,
                "Name or email already registered".to_string(),
            ),
            ApiError::Hashing(msg) => {
                tracing::error!("Password hashing error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Database(err) => {
                // The cause is logged; clients only see a generic message.
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for handler results
pub type ApiResult<T> = Result<T, ApiError>;
