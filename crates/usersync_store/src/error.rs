//! Error types for store operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use usersync_model::ModelError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Records could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] ModelError),

    /// The store file exists but does not hold a user list.
    #[error("store corrupted at {path}: {message}")]
    Corrupted {
        /// Path of the store file.
        path: PathBuf,
        /// What failed to parse.
        message: String,
    },
}
