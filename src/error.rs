//! Error types for Nestly.

use thiserror::Error;

/// Common error type for Nestly.
#[derive(Error, Debug)]
pub enum NestlyError {
    /// Database error.
    ///
    /// Wraps errors from the sqlx backend. sqlx errors are converted
    /// automatically.
    #[error("database error: {0}")]
    Database(String),

    /// Duplicate key: a unique constraint (username or email) was violated.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The requester is not allowed to act on the target resource.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for NestlyError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return NestlyError::Duplicate("username or email already exists".to_string());
            }
        }
        NestlyError::Database(e.to_string())
    }
}

/// Result type alias for Nestly operations.
pub type Result<T> = std::result::Result<T, NestlyError>;
