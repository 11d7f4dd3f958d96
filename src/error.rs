//! Error types for mediadrop.

use thiserror::Error;

/// Common error type for mediadrop.
#[derive(Error, Debug)]
pub enum MediadropError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Validation error for client input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operating system entropy source failed.
    #[error("random source failure: {0}")]
    Random(String),

    /// Filesystem statistics could not be obtained.
    #[error("disk statistics unavailable: {0}")]
    Disk(String),
}

impl From<rand_core::Error> for MediadropError {
    fn from(e: rand_core::Error) -> Self {
        MediadropError::Random(e.to_string())
    }
}

/// Result type alias for mediadrop operations.
pub type Result<T> = std::result::Result<T, MediadropError>;
