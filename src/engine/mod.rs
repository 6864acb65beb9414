//! Transition registry and pure evaluator.
//!
//! A [`Machine`] holds rules keyed by `(from, on)` and evaluates one event
//! against one state at a time. Evaluation performs no I/O and never mutates
//! the machine; it always yields a [`TransitionLog`](crate::core::TransitionLog)
//! inside an [`Evaluation`], even on failure.

mod error;
mod machine;

pub use error::{Denial, MachineError, TransitionError};
pub use machine::{Evaluation, Machine, MAX_MACHINE_NAME_LEN};
