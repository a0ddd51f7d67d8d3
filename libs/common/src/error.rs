//! Custom error types for the common library
//!
//! This module defines the persistence error type shared by every service
//! repository.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while acquiring a connection or opening a transaction
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution or commit
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A unique constraint rejected the write
    #[error("Database conflict: {0}")]
    Conflict(String),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

impl DatabaseError {
    /// Classify a query failure, singling out unique-constraint violations
    pub fn from_query(error: SqlxError) -> Self {
        let conflict = error
            .as_database_error()
            .filter(|db_error| db_error.is_unique_violation())
            .map(|db_error| db_error.message().to_string());

        match conflict {
            Some(message) => DatabaseError::Conflict(message),
            None => DatabaseError::Query(error),
        }
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
