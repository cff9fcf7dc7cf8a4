//! Error handling module for VideoGate

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for VideoGate operations
#[derive(Error, Debug)]
pub enum VideoGateError {
    /// Scratch copy of the upload could not be created or written
    #[error("Failed to stage upload in a temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    /// Configuration file or override could not be used
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Compatibility policy rejected at load time
    #[error("Invalid compatibility policy: {0}")]
    InvalidPolicy(String),

    /// Task running a validation panicked or was cancelled
    #[error("Validation task failed: {message}")]
    TaskFailed { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<DomainError> for VideoGateError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidPolicy(msg) => VideoGateError::InvalidPolicy(msg),
            DomainError::BadArgs(msg) => VideoGateError::Config { message: msg },
        }
    }
}

/// Result type alias for VideoGate operations
pub type VideoGateResult<T> = std::result::Result<T, VideoGateError>;
