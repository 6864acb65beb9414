//! Canonical transition records.
//!
//! A [`TransitionLog`] is produced by every evaluation, allowed or not. It is
//! the audit artifact and the payload stored for idempotent replay, so its
//! canonical string must be byte-stable.

use super::ident::{Event, State};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Caller metadata attached to an evaluation. Has no inherent order.
pub type Meta = HashMap<String, String>;

/// Why an evaluation ended the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    Ok,
    InvalidInput,
    NoTransition,
    GuardBlocked,
    InternalError,
}

impl ReasonCode {
    /// Stable wire code used in canonical strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::InvalidInput => "invalid_input",
            Self::NoTransition => "no_transition",
            Self::GuardBlocked => "guard_blocked",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable outcome record of one evaluation.
///
/// Fields are read through accessors only; the meta map is a private copy
/// and never aliases caller state.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use fsmkit::{Machine, Transition};
///
/// let mut machine: Machine = Machine::new("transfer-intent").unwrap();
/// machine.register(Transition::new("PENDING", "SUBMIT", "SUBMITTED")).unwrap();
///
/// let at = Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap();
/// let eval = machine.next("tx-1", "PENDING", "SUBMIT", at, None, &());
///
/// assert_eq!(
///     eval.log.canonical_string(),
///     "from=PENDING|on=SUBMIT|to=SUBMITTED|at=2026-02-15T00:00:00Z|allowed=1|reason=ok"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionLog {
    pub(crate) machine_id: String,
    pub(crate) from: State,
    pub(crate) on: Event,
    pub(crate) to: State,
    pub(crate) at: DateTime<Utc>,
    pub(crate) meta: Meta,
    pub(crate) allowed: bool,
    pub(crate) reason: ReasonCode,
}

impl TransitionLog {
    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn from(&self) -> &State {
        &self.from
    }

    pub fn on(&self) -> &Event {
        &self.on
    }

    /// Target state. Empty when the input was invalid or no rule matched.
    pub fn to(&self) -> &State {
        &self.to
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }

    pub fn reason(&self) -> ReasonCode {
        self.reason
    }

    /// Meta entries as `key=value`, sorted by key.
    pub fn canonical_meta_pairs(&self) -> Vec<String> {
        let mut keys: Vec<&String> = self.meta.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|k| format!("{}={}", k, self.meta[k]))
            .collect()
    }

    /// Deterministic, whitespace-free encoding with a fixed field order.
    ///
    /// `from=F|on=E|to=T|at=RFC3339NANO|allowed=1|reason=code` followed by one
    /// `|m=key=value` segment per meta entry in ascending key order. The
    /// machine id is not part of the encoding.
    pub fn canonical_string(&self) -> String {
        let mut out = String::with_capacity(128);
        out.push_str("from=");
        out.push_str(self.from.as_str());
        out.push_str("|on=");
        out.push_str(self.on.as_str());
        out.push_str("|to=");
        out.push_str(self.to.as_str());
        out.push_str("|at=");
        out.push_str(&rfc3339_nano(self.at));
        out.push_str("|allowed=");
        out.push_str(if self.allowed { "1" } else { "0" });
        out.push_str("|reason=");
        out.push_str(self.reason.as_str());
        for pair in self.canonical_meta_pairs() {
            out.push_str("|m=");
            out.push_str(&pair);
        }
        out
    }

    /// Lowercase hex SHA-256 of [`canonical_string`](Self::canonical_string).
    pub fn fingerprint(&self) -> String {
        let canonical = self.canonical_string();
        sha256::digest(canonical.as_str())
    }
}

/// RFC 3339 in UTC with up to nine fractional digits, trailing zeros
/// trimmed and the fraction omitted on whole seconds.
///
/// The year is zero-padded to four digits and never carries a `+` sign;
/// years past 9999 are written with as many digits as they need.
pub(crate) fn rfc3339_nano(at: DateTime<Utc>) -> String {
    let year = at.year();
    let mut out = if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{year:04}")
    };
    out.push_str(&at.format("-%m-%dT%H:%M:%S").to_string());
    let nanos = at.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push('Z');
    out
}
