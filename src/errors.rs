/*!
 * Error types for the studentdb crate.
 *
 * This module contains custom error types for the domain model, the
 * student store and the application, using the thiserror crate for
 * ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the domain model itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The student already carries a store-assigned identity
    #[error("Student already has id {existing}, refusing to assign {requested}")]
    IdAlreadyDefined {
        /// Identity already held by the student
        existing: i64,
        /// Identity that was about to be assigned
        requested: i64,
    },
}

/// Errors that can occur while talking to the student store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A statement failed to prepare or execute
    #[error("Store execution failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// The connection could not be acquired
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A stored birth date is not a valid `YYYY-MM-DD` value
    #[error("Invalid birth date '{value}' stored for student {student_id}")]
    InvalidDate {
        /// Row the value was read from
        student_id: i64,
        /// Raw column value
        value: String,
    },

    /// The operation needs a persisted student
    #[error("Student '{0}' has not been persisted yet")]
    NotPersisted(String),

    /// The domain model rejected a hydrated value
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

impl StoreError {
    /// Checks if the store rejected the statement because of a constraint
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Query(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the student store
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Alternate formatting keeps the whole context chain
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
