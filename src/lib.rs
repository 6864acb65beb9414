//! fsmkit: a deterministic finite state machine engine
//!
//! fsmkit models domain workflows (order or transfer lifecycles) whose
//! transitions must be auditable, side-effect-free to evaluate and safe to
//! retry from distributed callers.
//!
//! # Core Concepts
//!
//! - **State / Event**: validated, normalized string identifiers
//! - **Guards**: deterministic allow/deny capabilities attached to transitions
//! - **Machine**: registry of `(from, on) -> to` rules with a pure evaluator
//! - **TransitionLog**: canonical, immutable record of every evaluation
//! - **IdempotentMachine**: replays the recorded outcome for retried attempts
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use fsmkit::{Machine, ReasonCode, Transition};
//! use fsmkit::core::Meta;
//!
//! let mut machine: Machine = Machine::new("transfer-intent").unwrap();
//! machine
//!     .register(Transition::new("PENDING", "SUBMIT", "SUBMITTED").named("submit"))
//!     .unwrap();
//!
//! let mut meta = Meta::new();
//! meta.insert("source".to_string(), "api".to_string());
//! let at = Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap();
//!
//! let eval = machine.next("tx-1", "PENDING", "SUBMIT", at, Some(&meta), &());
//! assert_eq!(eval.next_state().map(|s| s.as_str()), Some("SUBMITTED"));
//! assert_eq!(eval.log.reason(), ReasonCode::Ok);
//!
//! let eval = machine.next("tx-1", "PENDING", "APPROVE", at, Some(&meta), &());
//! assert!(eval.next_state().is_none());
//! assert_eq!(eval.log.reason(), ReasonCode::NoTransition);
//! ```

pub mod builder;
pub mod codec;
pub mod core;
pub mod engine;
pub mod error;
pub mod idempotency;

// Re-export commonly used types
pub use crate::builder::{BuildError, MachineBuilder};
pub use crate::core::{Event, Guard, GuardContext, GuardDecision, ReasonCode, State, Transition, TransitionLog};
pub use crate::engine::{Denial, Evaluation, Machine, MachineError, TransitionError};
pub use crate::error::ErrorKind;
pub use crate::idempotency::{ApplyError, IdempotentMachine, TransitionLogStore};
