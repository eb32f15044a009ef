//! CLI error types.

use thiserror::Error;
use usersync_engine::SyncError;
use usersync_model::UserId;
use usersync_store::StoreError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported by the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// The configured base URL cannot be probed.
    #[error("invalid base URL {url}: {message}")]
    InvalidBaseUrl {
        /// The URL as given.
        url: String,
        /// Parse failure.
        message: String,
    },

    /// No stored user has this ID.
    #[error("no user with id {0}")]
    UnknownUser(UserId),

    /// Unsupported `--format` value.
    #[error("unknown output format: {0} (expected text or json)")]
    UnknownFormat(String),

    /// HTTP client setup failed.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Engine error.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Runtime or output error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
