//! Guards decide whether a matched transition may fire.
//!
//! A guard sees an immutable [`GuardContext`] and answers with a
//! [`GuardDecision`]. Guards must be pure functions of their context: no
//! clock reads, no hidden state. Idempotent replay skips guard evaluation
//! entirely and relies on that purity.

use super::ident::{Event, State};
use super::log::Meta;
use crate::error::BoxError;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Snapshot handed to a guard at evaluation time.
///
/// `from`, `on` and `to` are the registered transition's normalized values,
/// not the caller's raw input.
#[derive(Debug)]
pub struct GuardContext<'a, I> {
    pub machine_name: &'a str,
    pub machine_id: &'a str,
    pub from: &'a State,
    pub on: &'a Event,
    pub to: &'a State,
    pub at: DateTime<Utc>,
    pub meta: &'a Meta,
    /// Opaque domain input supplied by the caller.
    pub input: &'a I,
}

impl<I> Clone for GuardContext<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for GuardContext<'_, I> {}

/// Outcome of a guard check.
#[derive(Debug)]
pub enum GuardDecision {
    /// The transition may fire.
    Allow,
    /// Deterministic domain denial with an optional human-readable reason.
    Deny(String),
    /// The guard itself failed. Never conflated with a denial.
    Fail(BoxError),
}

impl GuardDecision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny(reason.into())
    }

    pub fn fail(cause: impl Into<BoxError>) -> Self {
        Self::Fail(cause.into())
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Deterministic allow/deny capability attached to a transition.
///
/// `I` is the caller's opaque input type, shared by every guard of a machine.
///
/// # Example
///
/// ```rust
/// use fsmkit::core::{Guard, GuardContext, GuardDecision};
///
/// struct RequiresSource;
///
/// impl Guard<()> for RequiresSource {
///     fn check(&self, ctx: &GuardContext<'_, ()>) -> GuardDecision {
///         if ctx.meta.contains_key("source") {
///             GuardDecision::Allow
///         } else {
///             GuardDecision::deny("missing_source")
///         }
///     }
/// }
/// ```
pub trait Guard<I>: Send + Sync {
    fn check(&self, ctx: &GuardContext<'_, I>) -> GuardDecision;
}

impl<I, G: Guard<I> + ?Sized> Guard<I> for Arc<G> {
    fn check(&self, ctx: &GuardContext<'_, I>) -> GuardDecision {
        (**self).check(ctx)
    }
}

/// Guard that always allows.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl<I> Guard<I> for AllowAll {
    fn check(&self, _ctx: &GuardContext<'_, I>) -> GuardDecision {
        GuardDecision::Allow
    }
}

type DecisionFn<I> = Box<dyn Fn(&GuardContext<'_, I>) -> GuardDecision + Send + Sync>;

/// Guard built from a closure returning a full decision.
///
/// # Example
///
/// ```rust
/// use fsmkit::core::{GuardDecision, GuardFn};
///
/// let signed = GuardFn::new(|ctx: &fsmkit::core::GuardContext<'_, u32>| {
///     if *ctx.input >= 2 {
///         GuardDecision::Allow
///     } else {
///         GuardDecision::deny("signatures_missing")
///     }
/// });
/// # let _ = signed;
/// ```
pub struct GuardFn<I> {
    check: DecisionFn<I>,
}

impl<I> GuardFn<I> {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&GuardContext<'_, I>) -> GuardDecision + Send + Sync + 'static,
    {
        Self {
            check: Box::new(check),
        }
    }
}

impl<I> Guard<I> for GuardFn<I> {
    fn check(&self, ctx: &GuardContext<'_, I>) -> GuardDecision {
        (self.check)(ctx)
    }
}

type PredicateFn<I> = Box<dyn Fn(&GuardContext<'_, I>) -> bool + Send + Sync>;

/// Boolean guard: `true` allows, `false` denies with a fixed reason.
pub struct Predicate<I> {
    reason: String,
    predicate: PredicateFn<I>,
}

impl<I> Predicate<I> {
    /// Create a guard from a pure predicate and the reason reported on denial.
    pub fn new<F>(reason: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&GuardContext<'_, I>) -> bool + Send + Sync + 'static,
    {
        Self {
            reason: reason.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl<I> Guard<I> for Predicate<I> {
    fn check(&self, ctx: &GuardContext<'_, I>) -> GuardDecision {
        if (self.predicate)(ctx) {
            GuardDecision::Allow
        } else {
            GuardDecision::Deny(self.reason.clone())
        }
    }
}

/// Composite guard. Checks members in order and returns the first decision
/// that is not [`GuardDecision::Allow`]; later members are not evaluated.
pub struct AllOf<I> {
    guards: Vec<Arc<dyn Guard<I>>>,
}

impl<I> AllOf<I> {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    pub fn with(mut self, guard: impl Guard<I> + 'static) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl<I> Default for AllOf<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Guard<I> for AllOf<I> {
    fn check(&self, ctx: &GuardContext<'_, I>) -> GuardDecision {
        for guard in &self.guards {
            let decision = guard.check(ctx);
            if !decision.is_allow() {
                return decision;
            }
        }
        GuardDecision::Allow
    }
}
