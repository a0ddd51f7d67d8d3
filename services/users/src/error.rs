//! Error types for the user service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::DatabaseError;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;
use crate::validation::ValidationError;

/// Failure of a user service operation
#[derive(Error, Debug)]
pub enum UserServiceError {
    /// Payload rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No user matches the lookup key (id or email)
    #[error("User {0} not found")]
    NotFound(String),

    /// A unique column (email) already holds the value
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store failed; the transaction was rolled back
    #[error("Storage error: {0}")]
    Storage(#[source] DatabaseError),

    /// Password hashing failed
    #[error("Security error: {0}")]
    Security(#[source] anyhow::Error),
}

impl From<DatabaseError> for UserServiceError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::Conflict(detail) => UserServiceError::Conflict(detail),
            other => UserServiceError::Storage(other),
        }
    }
}

/// Type alias for user service results
pub type UserServiceResult<T> = Result<T, UserServiceError>;

impl IntoResponse for UserServiceError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            UserServiceError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation error",
                Some(e.to_string()),
            ),
            UserServiceError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                Some("The requested resource was not found.".to_string()),
            ),
            UserServiceError::Conflict(_) => (
                StatusCode::CONFLICT,
                "Conflict",
                Some("A user with this email already exists.".to_string()),
            ),
            UserServiceError::Storage(_) | UserServiceError::Security(_) => {
                error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
