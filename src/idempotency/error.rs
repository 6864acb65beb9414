//! Idempotent application errors.

use super::store::StoreError;
use crate::engine::Evaluation;
use crate::error::{BoxError, ErrorKind};
use thiserror::Error;

/// Failures of [`IdempotentMachine::apply`](super::IdempotentMachine::apply)
/// that happen outside the transition engine itself.
///
/// Engine outcomes, including denials, are returned inside the
/// [`Evaluation`]; this type only covers key derivation and storage.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("idempotency key derivation failed")]
    KeyDerivation(#[source] BoxError),

    #[error("idempotency key function returned an empty key")]
    MissingIdempotencyKey,

    #[error("transition log lookup failed for key '{key}'")]
    Lookup {
        key: String,
        #[source]
        source: StoreError,
    },

    /// The transition was evaluated but its log could not be stored. The
    /// evaluation is preserved so the caller still knows the outcome.
    #[error("transition outcome for key '{key}' was evaluated but not recorded")]
    NotRecorded {
        key: String,
        evaluation: Box<Evaluation>,
        #[source]
        source: StoreError,
    },
}

impl ApplyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::KeyDerivation(_) => ErrorKind::KeyDerivation,
            Self::MissingIdempotencyKey => ErrorKind::MissingIdempotencyKey,
            Self::Lookup { .. } | Self::NotRecorded { .. } => ErrorKind::Storage,
        }
    }

    /// The unrecorded evaluation, for [`ApplyError::NotRecorded`].
    pub fn evaluation(&self) -> Option<&Evaluation> {
        match self {
            Self::NotRecorded { evaluation, .. } => Some(&**evaluation),
            _ => None,
        }
    }

    pub fn into_evaluation(self) -> Option<Evaluation> {
        match self {
            Self::NotRecorded { evaluation, .. } => Some(*evaluation),
            _ => None,
        }
    }
}

/// A meta entry required by [`MetaKey`](super::MetaKey) is absent or blank.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("meta entry '{0}' required for the idempotency key is missing or blank")]
pub struct MissingMetaEntry(pub String);
