//! Retry-safe application of transitions.

use super::error::ApplyError;
use super::key::{IdempotencyKey, KeyRequest};
use super::store::TransitionLogStore;
use crate::builder::IdempotentMachineBuilder;
use crate::core::{Event, Meta, State, TransitionLog};
use crate::engine::{Denial, Evaluation, Machine, TransitionError};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

/// Wraps a [`Machine`] so that retried attempts observe the first outcome.
///
/// Holds no state of its own: every attempt is keyed by the key function and
/// remembered by the store, denied attempts included.
pub struct IdempotentMachine<I = ()> {
    machine: Arc<Machine<I>>,
    store: Arc<dyn TransitionLogStore>,
    key_fn: Arc<dyn IdempotencyKey<I>>,
}

impl<I> IdempotentMachine<I> {
    pub fn new(
        machine: impl Into<Arc<Machine<I>>>,
        store: impl TransitionLogStore + 'static,
        key_fn: impl IdempotencyKey<I> + 'static,
    ) -> Self {
        Self::from_parts(machine.into(), Arc::new(store), Arc::new(key_fn))
    }

    /// Start a builder that reports missing collaborators as errors.
    pub fn builder() -> IdempotentMachineBuilder<I> {
        IdempotentMachineBuilder::new()
    }

    pub(crate) fn from_parts(
        machine: Arc<Machine<I>>,
        store: Arc<dyn TransitionLogStore>,
        key_fn: Arc<dyn IdempotencyKey<I>>,
    ) -> Self {
        Self {
            machine,
            store,
            key_fn,
        }
    }

    pub fn machine(&self) -> &Machine<I> {
        &self.machine
    }

    pub fn store(&self) -> &dyn TransitionLogStore {
        self.store.as_ref()
    }

    /// Apply an attempt at most once per idempotency key.
    ///
    /// A stored allowed log is replayed verbatim without running guards. A
    /// stored denied log is replayed with
    /// [`TransitionError::IllegalTransition`]. On a miss the machine is
    /// evaluated and the log stored whatever the outcome.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::{Duration, Utc};
    /// use fsmkit::idempotency::{InMemoryStore, KeyFn, KeyRequest};
    /// use fsmkit::{IdempotentMachine, Machine, Transition};
    ///
    /// let mut machine: Machine = Machine::new("transfer-intent").unwrap();
    /// machine.register(Transition::new("PENDING", "SUBMIT", "SUBMITTED")).unwrap();
    ///
    /// let im = IdempotentMachine::new(
    ///     machine,
    ///     InMemoryStore::new(),
    ///     KeyFn::new(|req: &KeyRequest<'_, ()>| Ok(format!("{}:event:123", req.machine_id))),
    /// );
    ///
    /// let now = Utc::now();
    /// let first = im.apply("tx-1", "PENDING", "SUBMIT", now, None, &()).unwrap();
    /// let retry = im
    ///     .apply("tx-1", "PENDING", "SUBMIT", now + Duration::minutes(1), None, &())
    ///     .unwrap();
    ///
    /// assert_eq!(first.log.canonical_string(), retry.log.canonical_string());
    /// ```
    pub fn apply<Tz: TimeZone>(
        &self,
        machine_id: &str,
        from: impl Into<State>,
        on: impl Into<Event>,
        at: DateTime<Tz>,
        meta: Option<&Meta>,
        input: &I,
    ) -> Result<Evaluation, ApplyError> {
        let from = from.into().normalize();
        let on = on.into().normalize();
        let at = at.with_timezone(&Utc);
        let empty = Meta::new();

        let request = KeyRequest {
            machine_name: self.machine.name(),
            machine_id,
            from: &from,
            on: &on,
            at,
            meta: meta.unwrap_or(&empty),
            input,
        };
        let key = self
            .key_fn
            .derive(&request)
            .map_err(ApplyError::KeyDerivation)?;
        if key.is_empty() {
            return Err(ApplyError::MissingIdempotencyKey);
        }

        match self.store.get(&key) {
            Err(source) => return Err(ApplyError::Lookup { key, source }),
            Ok(Some(prior)) => {
                tracing::debug!(
                    machine = %self.machine.name(),
                    machine_id,
                    key = %key,
                    allowed = prior.allowed(),
                    "replaying recorded transition"
                );
                return Ok(replay(prior));
            }
            Ok(None) => {}
        }

        let evaluation = self.machine.next(machine_id, from, on, at, meta, input);

        match self.store.put_if_absent(&key, &evaluation.log) {
            Ok(None) => Ok(evaluation),
            Ok(Some(winner)) => {
                tracing::debug!(
                    machine = %self.machine.name(),
                    machine_id,
                    key = %key,
                    "concurrent attempt recorded first, replaying its outcome"
                );
                Ok(replay(winner))
            }
            Err(source) => {
                tracing::warn!(
                    machine = %self.machine.name(),
                    machine_id,
                    key = %key,
                    error = %source,
                    "failed to record transition log"
                );
                Err(ApplyError::NotRecorded {
                    key,
                    evaluation: Box::new(evaluation),
                    source,
                })
            }
        }
    }
}

/// Rebuild an evaluation from a stored log without touching the machine.
fn replay(log: TransitionLog) -> Evaluation {
    let result = if log.allowed() {
        Ok(log.to().clone())
    } else {
        Err(TransitionError::IllegalTransition {
            from: log.from().clone(),
            on: log.on().clone(),
            denial: Denial::Replayed(log.reason()),
        })
    };
    Evaluation { log, result }
}
