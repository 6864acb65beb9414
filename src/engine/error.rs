//! Registration and evaluation errors.

use crate::core::{Event, ReasonCode, State};
use crate::error::{BoxError, ErrorKind};
use thiserror::Error;

/// Structural errors raised while constructing or configuring a machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error("invalid machine name {0:?}: must be 1 to 128 characters after trimming")]
    InvalidMachineName(String),

    #[error("invalid state '{0}'")]
    InvalidState(State),

    #[error("invalid transition '{from}' --'{on}'--> '{to}'")]
    InvalidTransition { from: State, on: Event, to: State },

    #[error("duplicate transition for state '{from}' on event '{on}'")]
    DuplicateTransition { from: State, on: Event },
}

impl MachineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMachineName(_) => ErrorKind::InvalidMachineName,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::DuplicateTransition { .. } => ErrorKind::DuplicateTransition,
        }
    }
}

/// Why a matched transition was refused.
#[derive(Debug, Error)]
pub enum Denial {
    /// The guard deterministically denied the transition.
    #[error("{}", blocked_message(.reason))]
    Blocked { reason: String },

    /// The guard failed internally. The cause stays reachable via `source()`.
    #[error("guard failed")]
    GuardFailed(#[source] BoxError),

    /// A stored attempt for the same idempotency key was already denied.
    #[error("previously denied ({0})")]
    Replayed(ReasonCode),
}

fn blocked_message(reason: &str) -> String {
    if reason.is_empty() {
        "guard blocked".to_string()
    } else {
        format!("guard blocked: {reason}")
    }
}

/// Evaluation failures. Always delivered alongside a populated log.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("invalid state '{0}'")]
    InvalidState(State),

    #[error("invalid event '{0}'")]
    InvalidEvent(Event),

    #[error("no transition for state '{from}' on event '{on}'")]
    NoTransition { from: State, on: Event },

    #[error("illegal transition from '{from}' on '{on}'")]
    IllegalTransition {
        from: State,
        on: Event,
        #[source]
        denial: Denial,
    },
}

impl TransitionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::InvalidEvent(_) => ErrorKind::InvalidEvent,
            Self::NoTransition { .. } => ErrorKind::NoTransition,
            Self::IllegalTransition { .. } => ErrorKind::IllegalTransition,
        }
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::IllegalTransition { denial, .. } => Some(denial),
            _ => None,
        }
    }

    /// The underlying guard failure, if this error wraps one.
    pub fn guard_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self.denial() {
            Some(Denial::GuardFailed(cause)) => Some(cause.as_ref()),
            _ => None,
        }
    }
}
