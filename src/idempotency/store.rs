//! Storage contract for idempotency records.
//!
//! The engine never talks to a database itself. Callers supply a
//! [`TransitionLogStore`]; [`InMemoryStore`] is the reference implementation
//! for tests and single-process use.

use crate::codec::CodecError;
use crate::core::TransitionLog;
use crate::error::ErrorKind;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by a store backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    /// A storage backend error occurred.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored record could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Backend(_) => ErrorKind::Storage,
            Self::Codec(_) => ErrorKind::Codec,
        }
    }
}

/// Keyed persistence for transition logs.
///
/// Implementations must be thread-safe. `put` must tolerate being called
/// repeatedly with the same `(key, log)` pair.
pub trait TransitionLogStore: Send + Sync {
    /// Previously stored log for `key`, if any.
    fn get(&self, key: &str) -> Result<Option<TransitionLog>, StoreError>;

    /// Store `log` under `key`.
    fn put(&self, key: &str, log: &TransitionLog) -> Result<(), StoreError>;

    /// Store `log` only if `key` is vacant. Returns the existing log when the
    /// key is already taken.
    ///
    /// The default is a plain `get` followed by `put` and is not atomic.
    /// Backends that can do a conditional write should override it.
    fn put_if_absent(
        &self,
        key: &str,
        log: &TransitionLog,
    ) -> Result<Option<TransitionLog>, StoreError> {
        if let Some(existing) = self.get(key)? {
            return Ok(Some(existing));
        }
        self.put(key, log)?;
        Ok(None)
    }
}

impl<S: TransitionLogStore + ?Sized> TransitionLogStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<TransitionLog>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, log: &TransitionLog) -> Result<(), StoreError> {
        (**self).put(key, log)
    }

    fn put_if_absent(
        &self,
        key: &str,
        log: &TransitionLog,
    ) -> Result<Option<TransitionLog>, StoreError> {
        (**self).put_if_absent(key, log)
    }
}

/// In-memory store backed by `parking_lot::RwLock`.
///
/// `put_if_absent` is atomic: the check and the insert happen under one
/// write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<String, TransitionLog>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl TransitionLogStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<TransitionLog>, StoreError> {
        Ok(self.records.read().get(key).cloned())
    }

    fn put(&self, key: &str, log: &TransitionLog) -> Result<(), StoreError> {
        self.records.write().insert(key.to_string(), log.clone());
        Ok(())
    }

    fn put_if_absent(
        &self,
        key: &str,
        log: &TransitionLog,
    ) -> Result<Option<TransitionLog>, StoreError> {
        let mut records = self.records.write();
        if let Some(existing) = records.get(key) {
            return Ok(Some(existing.clone()));
        }
        records.insert(key.to_string(), log.clone());
        Ok(None)
    }
}
