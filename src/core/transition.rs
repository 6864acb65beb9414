//! Transition rules.

use super::guard::Guard;
use super::ident::{Event, State};
use std::fmt;
use std::sync::Arc;

/// Immutable rule `(from, on) -> to` with an optional guard.
pub struct Transition<I = ()> {
    pub from: State,
    pub on: Event,
    pub to: State,
    /// Free-form label. Trimmed on registration, never validated.
    pub name: String,
    pub guard: Option<Arc<dyn Guard<I>>>,
}

impl<I> Transition<I> {
    /// Create an unguarded, unnamed transition.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fsmkit::core::{GuardContext, Predicate, Transition};
    ///
    /// let submit: Transition = Transition::new("PENDING", "SUBMIT", "SUBMITTED")
    ///     .named("submit")
    ///     .guarded(Predicate::new("no_source", |ctx: &GuardContext<'_, ()>| {
    ///         ctx.meta.contains_key("source")
    ///     }));
    ///
    /// assert!(submit.is_valid());
    /// assert!(submit.guard.is_some());
    /// ```
    pub fn new(from: impl Into<State>, on: impl Into<Event>, to: impl Into<State>) -> Self {
        Self {
            from: from.into(),
            on: on.into(),
            to: to.into(),
            name: String::new(),
            guard: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn guarded(mut self, guard: impl Guard<I> + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Trim every field.
    pub fn normalize(mut self) -> Self {
        self.from = self.from.normalize();
        self.on = self.on.normalize();
        self.to = self.to.normalize();
        self.name = self.name.trim().to_string();
        self
    }

    pub fn is_valid(&self) -> bool {
        self.from.is_valid() && self.on.is_valid() && self.to.is_valid()
    }
}

impl<I> Clone for Transition<I> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            on: self.on.clone(),
            to: self.to.clone(),
            name: self.name.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<I> fmt::Debug for Transition<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("on", &self.on)
            .field("to", &self.to)
            .field("name", &self.name)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
