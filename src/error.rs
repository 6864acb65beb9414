//! Crate-wide error classification.

use std::fmt;

/// Boxed error used for failures raised by caller-supplied code
/// (guards, idempotency key functions, store backends).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification shared by every error type in the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidMachineName,
    InvalidState,
    InvalidEvent,
    InvalidTransition,
    DuplicateTransition,
    NoTransition,
    /// Guard denial, guard failure, or replay of a denied attempt.
    IllegalTransition,
    MissingIdempotencyKey,
    /// The idempotency key function returned an error.
    KeyDerivation,
    /// A required collaborator was not supplied at construction.
    MissingDependency,
    Storage,
    Codec,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidMachineName => "invalid machine name",
            Self::InvalidState => "invalid state",
            Self::InvalidEvent => "invalid event",
            Self::InvalidTransition => "invalid transition",
            Self::DuplicateTransition => "duplicate transition",
            Self::NoTransition => "no transition",
            Self::IllegalTransition => "illegal transition",
            Self::MissingIdempotencyKey => "missing idempotency key",
            Self::KeyDerivation => "idempotency key derivation failed",
            Self::MissingDependency => "missing dependency",
            Self::Storage => "storage error",
            Self::Codec => "codec error",
        };
        f.write_str(s)
    }
}
