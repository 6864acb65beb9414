//! Builder API for assembling machines and their idempotent wrappers.
//!
//! Builders give the engine an explicit build phase: everything is validated
//! and registered up front, and the resulting machine is only ever read
//! afterwards.

pub mod error;
pub mod idempotent;
pub mod machine;

pub use error::BuildError;
pub use idempotent::IdempotentMachineBuilder;
pub use machine::MachineBuilder;
