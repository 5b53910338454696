//! Directory-specific error types.

use cityscope_core::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Directory returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid directory response: {0}")]
    Parse(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl DirectoryError {
    /// Whether a later attempt could plausibly succeed.
    ///
    /// The list engine does not retry; this only feeds the log line.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Parse(_) | Self::Client(_) => false,
        }
    }
}
