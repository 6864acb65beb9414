//! Idempotency key derivation.
//!
//! A key function maps one logical attempt to a stable string. It must be a
//! pure function of its request for retries to converge on the same key.

use super::error::MissingMetaEntry;
use crate::core::{rfc3339_nano, Event, Meta, State};
use crate::error::BoxError;
use chrono::{DateTime, Utc};

/// Everything a key function may look at. `from` and `on` are already
/// trimmed and `at` is in UTC.
#[derive(Debug)]
pub struct KeyRequest<'a, I> {
    pub machine_name: &'a str,
    pub machine_id: &'a str,
    pub from: &'a State,
    pub on: &'a Event,
    pub at: DateTime<Utc>,
    pub meta: &'a Meta,
    pub input: &'a I,
}

/// Derives the idempotency key for an attempt.
///
/// Returning an empty key is treated as a missing key by
/// [`IdempotentMachine::apply`](super::IdempotentMachine::apply).
pub trait IdempotencyKey<I>: Send + Sync {
    fn derive(&self, req: &KeyRequest<'_, I>) -> Result<String, BoxError>;
}

type DeriveFn<I> = Box<dyn Fn(&KeyRequest<'_, I>) -> Result<String, BoxError> + Send + Sync>;

/// Key function built from a closure.
///
/// # Example
///
/// ```rust
/// use fsmkit::idempotency::{KeyFn, KeyRequest};
///
/// let key_fn = KeyFn::new(|req: &KeyRequest<'_, ()>| {
///     Ok(format!("{}:event:123", req.machine_id))
/// });
/// # let _ = key_fn;
/// ```
pub struct KeyFn<I> {
    derive: DeriveFn<I>,
}

impl<I> KeyFn<I> {
    pub fn new<F>(derive: F) -> Self
    where
        F: Fn(&KeyRequest<'_, I>) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        Self {
            derive: Box::new(derive),
        }
    }
}

impl<I> IdempotencyKey<I> for KeyFn<I> {
    fn derive(&self, req: &KeyRequest<'_, I>) -> Result<String, BoxError> {
        (self.derive)(req)
    }
}

/// Key made of the machine name, machine id and one meta entry, typically an
/// externally assigned event id. Each field is written as `{len}:{value}`
/// so separators inside a value cannot shift field boundaries, e.g.
/// `15:transfer-intent:4:tx-1:5:evt-7`.
///
/// Fails when the entry is missing or blank.
#[derive(Clone, Debug)]
pub struct MetaKey {
    entry: String,
}

impl MetaKey {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
        }
    }
}

impl<I> IdempotencyKey<I> for MetaKey {
    fn derive(&self, req: &KeyRequest<'_, I>) -> Result<String, BoxError> {
        let value = req
            .meta
            .get(&self.entry)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MissingMetaEntry(self.entry.clone()))?;
        let fields: Vec<String> = [req.machine_name, req.machine_id, value]
            .iter()
            .map(|field| format!("{}:{field}", field.len()))
            .collect();
        Ok(fields.join(":"))
    }
}

/// SHA-256 over the bincode encoding of the machine name, machine id, from,
/// on, timestamp and the sorted meta entries. The encoding length-prefixes
/// every string, so distinct requests never share material. The opaque input
/// is not part of the fingerprint.
///
/// Because the timestamp is included, retries must reuse the original `at`
/// to map to the same key.
#[derive(Clone, Copy, Debug, Default)]
pub struct FingerprintKey;

impl<I> IdempotencyKey<I> for FingerprintKey {
    fn derive(&self, req: &KeyRequest<'_, I>) -> Result<String, BoxError> {
        let mut entries: Vec<(&str, &str)> = req
            .meta
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort_unstable();

        let material = bincode::serialize(&(
            req.machine_name,
            req.machine_id,
            req.from.as_str(),
            req.on.as_str(),
            rfc3339_nano(req.at),
            entries,
        ))?;
        Ok(sha256::digest(material))
    }
}
