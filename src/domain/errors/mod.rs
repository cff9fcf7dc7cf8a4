// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Compatibility policy cannot be used as configured
    InvalidPolicy(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::InvalidPolicy(msg) => write!(f, "Invalid policy: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

/// Failure raised by a media prober.
///
/// The validation engine never lets these escape: every variant is turned
/// into a single "could not verify codec" warning on the verdict.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The prober binary could not be spawned
    #[error("ffprobe not found or failed to start ({binary}): {source}")]
    NotFound {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The prober ran and exited unsuccessfully
    #[error("ffprobe exited with code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },

    /// The prober did not finish in time and was killed
    #[error("ffprobe timed out after {after:?}")]
    Timeout { after: std::time::Duration },

    /// The prober report was not usable
    #[error("failed to parse ffprobe output: {0}")]
    Parse(String),

    /// Waiting on the child process failed
    #[error("ffprobe I/O error: {0}")]
    Io(#[from] std::io::Error),
}
