//! Idempotent application of transitions.
//!
//! [`IdempotentMachine`] derives a key for every attempt, consults a
//! caller-supplied [`TransitionLogStore`] and only evaluates the underlying
//! machine on a miss. Both allowed and denied outcomes are recorded, so a
//! retried attempt always observes the first outcome.
//!
//! # Concurrency
//!
//! The engine adds no locking around the store. Two concurrent attempts with
//! the same key may both miss on `get` and both evaluate. The computed log is
//! written with [`TransitionLogStore::put_if_absent`]; when the store
//! implements it atomically the losing caller receives the winner's recorded
//! outcome. With the default, non-atomic implementation this is best effort.

mod error;
mod key;
mod machine;
mod store;

pub use error::{ApplyError, MissingMetaEntry};
pub use key::{FingerprintKey, IdempotencyKey, KeyFn, KeyRequest, MetaKey};
pub use machine::IdempotentMachine;
pub use store::{InMemoryStore, StoreError, TransitionLogStore};
