//! Build errors for machine and idempotency builders.

use crate::engine::MachineError;
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors that can occur when building machines and idempotent wrappers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Machine not specified. Call .machine(machine) before .build()")]
    MissingMachine,

    #[error("Store not specified. Call .store(store) before .build()")]
    MissingStore,

    #[error("Idempotency key function not specified. Call .key_fn(key_fn) before .build()")]
    MissingKeyFn,

    #[error(transparent)]
    Machine(#[from] MachineError),
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingMachine | Self::MissingStore | Self::MissingKeyFn => {
                ErrorKind::MissingDependency
            }
            Self::Machine(err) => err.kind(),
        }
    }
}
