//! Codec error types.

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors that can occur while encoding or decoding stored logs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Envelope version is not supported by this version
    #[error("Unsupported log format version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The stored fingerprint no longer matches the decoded log
    #[error("Fingerprint mismatch: stored {stored}, computed {computed}")]
    FingerprintMismatch { stored: String, computed: String },
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Codec
    }
}
