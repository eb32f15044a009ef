//! Error types for the model crate.

use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors that can occur while encoding or decoding wire payloads.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Failed to encode a value to JSON.
    #[error("encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to decode JSON bytes.
    #[error("decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}
