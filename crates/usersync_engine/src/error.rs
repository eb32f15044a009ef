//! Error types for the sync engine.

use thiserror::Error;
use usersync_model::ModelError;
use usersync_store::StoreError;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
///
/// Every variant is recoverable: the presentation layer shows the message
/// and lets the user retry.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The network was unreachable when the operation started.
    #[error("no internet connection")]
    NoConnectivity,

    /// The server answered with a non-success status.
    #[error("server error: {status}")]
    Remote {
        /// HTTP-like status code.
        status: u16,
    },

    /// The call to the server did not complete.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// Local store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] ModelError),

    /// A submitted background task panicked or was aborted.
    #[error("background task failed: {0}")]
    TaskFailed(String),
}

impl SyncError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns the server status code, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SyncError::Remote { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport { retryable, .. } => *retryable,
            SyncError::Remote { status } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }
}
