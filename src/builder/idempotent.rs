//! Builder for idempotent machine wrappers.

use crate::builder::error::BuildError;
use crate::engine::Machine;
use crate::idempotency::{IdempotencyKey, IdempotentMachine, TransitionLogStore};
use std::sync::Arc;

/// Builder for [`IdempotentMachine`] that reports missing collaborators
/// instead of requiring all of them up front.
pub struct IdempotentMachineBuilder<I = ()> {
    machine: Option<Arc<Machine<I>>>,
    store: Option<Arc<dyn TransitionLogStore>>,
    key_fn: Option<Arc<dyn IdempotencyKey<I>>>,
}

impl<I> IdempotentMachineBuilder<I> {
    pub fn new() -> Self {
        Self {
            machine: None,
            store: None,
            key_fn: None,
        }
    }

    /// Set the wrapped machine (required).
    pub fn machine(mut self, machine: impl Into<Arc<Machine<I>>>) -> Self {
        self.machine = Some(machine.into());
        self
    }

    /// Set the log store (required).
    pub fn store(mut self, store: impl TransitionLogStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set the idempotency key function (required).
    pub fn key_fn(mut self, key_fn: impl IdempotencyKey<I> + 'static) -> Self {
        self.key_fn = Some(Arc::new(key_fn));
        self
    }

    pub fn build(self) -> Result<IdempotentMachine<I>, BuildError> {
        let machine = self.machine.ok_or(BuildError::MissingMachine)?;
        let store = self.store.ok_or(BuildError::MissingStore)?;
        let key_fn = self.key_fn.ok_or(BuildError::MissingKeyFn)?;
        Ok(IdempotentMachine::from_parts(machine, store, key_fn))
    }

    /// Like [`build`](Self::build) but panics when a collaborator is missing.
    pub fn must_build(self) -> IdempotentMachine<I> {
        match self.build() {
            Ok(im) => im,
            Err(err) => panic!("fsmkit: {err}"),
        }
    }
}

impl<I> Default for IdempotentMachineBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}
