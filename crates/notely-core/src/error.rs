//! Error types for notely.

use thiserror::Error;

/// Result type alias using notely's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notely operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Required request fields are missing
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A schema constraint was violated (unknown category, title too long, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// External credential rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors meaning "the requested note does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NoteNotFound(_))
    }
}
