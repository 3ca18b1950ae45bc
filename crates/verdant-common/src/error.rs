//! Error types shared across Verdant crates.

use thiserror::Error;

/// Errors raised while encoding or decoding an opaque state blob.
#[derive(Debug, Error)]
pub enum BlobError {
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing or wrong magic bytes
    #[error("Invalid blob format")]
    InvalidFormat,

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },

    /// Payload could not be decoded
    #[error("Blob corrupted: {0}")]
    Corrupted(String),
}

/// Result type alias for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;
