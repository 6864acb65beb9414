//! Core state machine types.
//!
//! This module contains the pure building blocks of the engine:
//! - `State` and `Event` identifiers with normalization
//! - Guards that decide whether a matched transition may fire
//! - Transition rules
//! - The canonical `TransitionLog` record
//!
//! Nothing in this module performs I/O or reads the clock.

mod guard;
mod ident;
mod log;
mod transition;

pub use guard::{AllOf, AllowAll, Guard, GuardContext, GuardDecision, GuardFn, Predicate};
pub use ident::{Event, State, MAX_IDENT_LEN};
pub use log::{Meta, ReasonCode, TransitionLog};
pub use transition::Transition;

pub(crate) use log::rfc3339_nano;
