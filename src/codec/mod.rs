//! Persistence encoding for transition logs.
//!
//! Store implementations that write logs to disk or over the network can
//! wrap them in a versioned [`StoredLog`] envelope. The envelope carries the
//! log's fingerprint so a decoded record is checked against its canonical
//! string before it is trusted for replay.

use crate::core::TransitionLog;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::CodecError;

/// Version identifier for the stored log format
pub const LOG_FORMAT_VERSION: u32 = 1;

/// Versioned, self-checking envelope around a [`TransitionLog`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLog {
    /// Envelope format version
    pub version: u32,

    /// SHA-256 of the log's canonical string at encoding time
    pub fingerprint: String,

    pub log: TransitionLog,
}

impl StoredLog {
    pub fn new(log: TransitionLog) -> Self {
        Self {
            version: LOG_FORMAT_VERSION,
            fingerprint: log.fingerprint(),
            log,
        }
    }

    /// Check version and fingerprint, returning the log.
    pub fn verify(self) -> Result<TransitionLog, CodecError> {
        if self.version != LOG_FORMAT_VERSION {
            return Err(CodecError::UnsupportedVersion {
                found: self.version,
                supported: LOG_FORMAT_VERSION,
            });
        }
        let computed = self.log.fingerprint();
        if computed != self.fingerprint {
            return Err(CodecError::FingerprintMismatch {
                stored: self.fingerprint,
                computed,
            });
        }
        Ok(self.log)
    }
}

/// Encode a log as a JSON envelope.
pub fn to_json(log: &TransitionLog) -> Result<String, CodecError> {
    serde_json::to_string(&StoredLog::new(log.clone()))
        .map_err(|e| CodecError::SerializationFailed(e.to_string()))
}

/// Decode and verify a JSON envelope.
pub fn from_json(data: &str) -> Result<TransitionLog, CodecError> {
    let stored: StoredLog =
        serde_json::from_str(data).map_err(|e| CodecError::DeserializationFailed(e.to_string()))?;
    stored.verify()
}

/// Encode a log as a compact binary envelope.
pub fn to_bytes(log: &TransitionLog) -> Result<Vec<u8>, CodecError> {
    bincode::serialize(&StoredLog::new(log.clone()))
        .map_err(|e| CodecError::SerializationFailed(e.to_string()))
}

/// Decode and verify a binary envelope.
pub fn from_bytes(data: &[u8]) -> Result<TransitionLog, CodecError> {
    let stored: StoredLog =
        bincode::deserialize(data).map_err(|e| CodecError::DeserializationFailed(e.to_string()))?;
    stored.verify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Meta, Transition};
    use crate::engine::Machine;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_log() -> TransitionLog {
        let mut m: Machine = Machine::must_new("transfer-intent");
        m.must_register(Transition::new("PENDING", "SUBMIT", "SUBMITTED"));
        let mut meta = Meta::new();
        meta.insert("source".to_string(), "api".to_string());
        meta.insert("channel".to_string(), "web".to_string());
        let at = Utc.with_ymd_and_hms(2026, 2, 15, 9, 30, 0).unwrap() + Duration::nanoseconds(42);
        m.next("tx-1", "PENDING", "SUBMIT", at, Some(&meta), &()).log
    }

    #[test]
    fn json_envelope_preserves_canonical_string() {
        let log = sample_log();
        let json = to_json(&log).unwrap();
        let decoded = from_json(&json).unwrap();

        assert_eq!(decoded, log);
        assert_eq!(decoded.canonical_string(), log.canonical_string());
    }

    #[test]
    fn binary_envelope_preserves_log() {
        let log = sample_log();
        let bytes = to_bytes(&log).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), log);
    }

    #[test]
    fn unsupported_version_rejected() {
        let mut stored = StoredLog::new(sample_log());
        stored.version = LOG_FORMAT_VERSION + 1;
        let json = serde_json::to_string(&stored).unwrap();

        assert_eq!(
            from_json(&json),
            Err(CodecError::UnsupportedVersion {
                found: LOG_FORMAT_VERSION + 1,
                supported: LOG_FORMAT_VERSION,
            })
        );
    }

    #[test]
    fn tampered_log_rejected() {
        let stored = StoredLog::new(sample_log());
        let json = serde_json::to_string(&stored)
            .unwrap()
            .replace("\"allowed\":true", "\"allowed\":false");

        assert!(matches!(
            from_json(&json),
            Err(CodecError::FingerprintMismatch { .. })
        ));
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        assert!(matches!(
            from_json("{not json"),
            Err(CodecError::DeserializationFailed(_))
        ));
        assert!(matches!(
            from_bytes(&[1, 2, 3]),
            Err(CodecError::DeserializationFailed(_))
        ));
    }
}
