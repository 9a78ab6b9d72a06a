//! Error types for Chat Gate Core.

use thiserror::Error;

/// Errors raised while converting ban state to and from its persisted form.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error for key {key}: {reason}")]
    DecodingError { key: String, reason: String },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
