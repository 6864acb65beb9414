//! Transition registry and evaluator.

use super::error::{Denial, MachineError, TransitionError};
use crate::core::{Event, GuardContext, GuardDecision, Meta, ReasonCode, State, Transition, TransitionLog};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;

/// Maximum machine name length, after trimming.
pub const MAX_MACHINE_NAME_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TransitionKey {
    from: State,
    on: Event,
}

/// Result of one evaluation: the audit log plus the next state or the reason
/// there is none. The log is populated on every path.
#[derive(Debug)]
#[must_use]
pub struct Evaluation {
    pub log: TransitionLog,
    pub result: Result<State, TransitionError>,
}

impl Evaluation {
    pub fn next_state(&self) -> Option<&State> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&TransitionError> {
        self.result.as_ref().err()
    }

    pub fn is_allowed(&self) -> bool {
        self.result.is_ok()
    }

    /// Split into a plain `Result`, keeping the log on both sides.
    pub fn into_result(self) -> Result<(State, TransitionLog), (TransitionError, TransitionLog)> {
        match self.result {
            Ok(next) => Ok((next, self.log)),
            Err(err) => Err((err, self.log)),
        }
    }
}

/// Reusable finite state machine definition.
///
/// Holds transition rules keyed by `(from, on)`. Evaluation through
/// [`Machine::next`] is pure: it returns the next state and a log and never
/// mutates the machine. Registration needs `&mut self`, so a machine shared
/// behind `Arc` is frozen.
///
/// `I` is the opaque input type handed to guards.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use fsmkit::{Machine, ReasonCode, Transition};
///
/// let mut machine: Machine = Machine::new("transfer-intent").unwrap();
/// machine
///     .register(Transition::new("PENDING", "SUBMIT", "SUBMITTED").named("submit"))
///     .unwrap();
///
/// let eval = machine.next("tx-1", " PENDING ", "SUBMIT", Utc::now(), None, &());
/// assert_eq!(eval.next_state().map(|s| s.as_str()), Some("SUBMITTED"));
/// assert_eq!(eval.log.reason(), ReasonCode::Ok);
/// ```
pub struct Machine<I = ()> {
    name: String,
    initial: Option<State>,
    transitions: HashMap<TransitionKey, Transition<I>>,
}

impl<I> Machine<I> {
    /// Create an empty machine. The name is trimmed and must be 1 to
    /// [`MAX_MACHINE_NAME_LEN`] characters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, MachineError> {
        let name = name.as_ref().trim();
        if name.is_empty() || name.chars().count() > MAX_MACHINE_NAME_LEN {
            return Err(MachineError::InvalidMachineName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            initial: None,
            transitions: HashMap::new(),
        })
    }

    /// Like [`Machine::new`] but panics on an invalid name. Intended for
    /// statically known configuration.
    pub fn must_new(name: impl AsRef<str>) -> Self {
        match Self::new(name) {
            Ok(machine) => machine,
            Err(err) => panic!("fsmkit: {err}"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare the initial state. Informational only; `next` never reads it.
    pub fn set_initial(&mut self, state: impl Into<State>) -> Result<(), MachineError> {
        let state = state.into().normalize();
        if !state.is_valid() {
            return Err(MachineError::InvalidState(state));
        }
        self.initial = Some(state);
        Ok(())
    }

    pub fn initial(&self) -> Option<&State> {
        self.initial.as_ref()
    }

    /// Add a transition rule. `(from, on)` must be unique regardless of `to`.
    ///
    /// The normalized transition is stored, not the caller's raw values.
    pub fn register(&mut self, transition: Transition<I>) -> Result<(), MachineError> {
        let transition = transition.normalize();
        if !transition.is_valid() {
            return Err(MachineError::InvalidTransition {
                from: transition.from,
                on: transition.on,
                to: transition.to,
            });
        }

        let key = TransitionKey {
            from: transition.from.clone(),
            on: transition.on.clone(),
        };
        if self.transitions.contains_key(&key) {
            return Err(MachineError::DuplicateTransition {
                from: key.from,
                on: key.on,
            });
        }

        tracing::trace!(
            machine = %self.name,
            from = %transition.from,
            on = %transition.on,
            to = %transition.to,
            "transition registered"
        );
        self.transitions.insert(key, transition);
        Ok(())
    }

    /// Like [`Machine::register`] but panics on failure.
    pub fn must_register(&mut self, transition: Transition<I>) {
        if let Err(err) = self.register(transition) {
            panic!("fsmkit: {err}");
        }
    }

    pub fn lookup(&self, from: impl Into<State>, on: impl Into<Event>) -> Option<&Transition<I>> {
        let key = TransitionKey {
            from: from.into().normalize(),
            on: on.into().normalize(),
        };
        self.transitions.get(&key)
    }

    /// Registered transitions sorted by `from`, then `on`, then `to`.
    pub fn transitions(&self) -> Vec<&Transition<I>> {
        let mut out: Vec<&Transition<I>> = self.transitions.values().collect();
        out.sort_by(|a, b| {
            a.from
                .cmp(&b.from)
                .then_with(|| a.on.cmp(&b.on))
                .then_with(|| a.to.cmp(&b.to))
        });
        out
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Evaluate `on` against `from`.
    ///
    /// Inputs are trimmed, `at` is converted to UTC and a missing `meta`
    /// becomes empty. When the matched rule has a guard it runs against the
    /// rule's own normalized `from`/`on`/`to`. The returned log is complete
    /// on every path, so callers can persist it even on failure.
    pub fn next<Tz: TimeZone>(
        &self,
        machine_id: &str,
        from: impl Into<State>,
        on: impl Into<Event>,
        at: DateTime<Tz>,
        meta: Option<&Meta>,
        input: &I,
    ) -> Evaluation {
        let from = from.into().normalize();
        let on = on.into().normalize();
        let at = at.with_timezone(&Utc);
        let meta = meta.cloned().unwrap_or_default();

        let record = Record {
            machine_id,
            at,
            meta: &meta,
        };

        if !from.is_valid() {
            let log = record.denied(&from, &on, &State::default(), ReasonCode::InvalidInput);
            return self.finish(log, Err(TransitionError::InvalidState(from)));
        }
        if !on.is_valid() {
            let log = record.denied(&from, &on, &State::default(), ReasonCode::InvalidInput);
            return self.finish(log, Err(TransitionError::InvalidEvent(on)));
        }

        let key = TransitionKey { from, on };
        let Some(transition) = self.transitions.get(&key) else {
            let log = record.denied(&key.from, &key.on, &State::default(), ReasonCode::NoTransition);
            return self.finish(
                log,
                Err(TransitionError::NoTransition {
                    from: key.from,
                    on: key.on,
                }),
            );
        };

        if let Some(guard) = &transition.guard {
            let ctx = GuardContext {
                machine_name: &self.name,
                machine_id,
                from: &transition.from,
                on: &transition.on,
                to: &transition.to,
                at,
                meta: &meta,
                input,
            };

            let (reason, denial) = match guard.check(&ctx) {
                GuardDecision::Allow => (ReasonCode::Ok, None),
                GuardDecision::Deny(reason) => {
                    (ReasonCode::GuardBlocked, Some(Denial::Blocked { reason }))
                }
                GuardDecision::Fail(cause) => {
                    tracing::warn!(
                        machine = %self.name,
                        machine_id,
                        from = %transition.from,
                        on = %transition.on,
                        error = %cause,
                        "guard failed"
                    );
                    (ReasonCode::InternalError, Some(Denial::GuardFailed(cause)))
                }
            };

            if let Some(denial) = denial {
                let log = record.denied(&transition.from, &transition.on, &transition.to, reason);
                return self.finish(
                    log,
                    Err(TransitionError::IllegalTransition {
                        from: transition.from.clone(),
                        on: transition.on.clone(),
                        denial,
                    }),
                );
            }
        }

        let log = record.allowed(transition);
        self.finish(log, Ok(transition.to.clone()))
    }

    fn finish(&self, log: TransitionLog, result: Result<State, TransitionError>) -> Evaluation {
        tracing::debug!(
            machine = %self.name,
            machine_id = %log.machine_id(),
            from = %log.from(),
            on = %log.on(),
            to = %log.to(),
            allowed = log.allowed(),
            reason = %log.reason(),
            "transition evaluated"
        );
        Evaluation { log, result }
    }
}

/// Fields shared by every log produced during one evaluation.
struct Record<'a> {
    machine_id: &'a str,
    at: DateTime<Utc>,
    meta: &'a Meta,
}

impl Record<'_> {
    fn denied(&self, from: &State, on: &Event, to: &State, reason: ReasonCode) -> TransitionLog {
        self.build(from, on, to, false, reason)
    }

    fn allowed<I>(&self, transition: &Transition<I>) -> TransitionLog {
        self.build(&transition.from, &transition.on, &transition.to, true, ReasonCode::Ok)
    }

    fn build(
        &self,
        from: &State,
        on: &Event,
        to: &State,
        allowed: bool,
        reason: ReasonCode,
    ) -> TransitionLog {
        TransitionLog {
            machine_id: self.machine_id.to_string(),
            from: from.clone(),
            on: on.clone(),
            to: to.clone(),
            at: self.at,
            meta: self.meta.clone(),
            allowed,
            reason,
        }
    }
}
