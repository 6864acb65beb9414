//! Validated identifiers for states and events.
//!
//! States and events share one set of rules: after trimming surrounding
//! whitespace the value must be 1 to [`MAX_IDENT_LEN`] characters drawn only
//! from `[A-Za-z0-9_.:-]`. Nothing is case folded.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a state or event identifier, after trimming.
pub const MAX_IDENT_LEN: usize = 64;

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}

fn is_valid_ident(raw: &str) -> bool {
    let v = raw.trim();
    !v.is_empty() && v.len() <= MAX_IDENT_LEN && v.chars().all(is_ident_char)
}

/// Generate an opaque identifier newtype with normalization and validation.
macro_rules! identifier {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw value. No validation happens here.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Trim surrounding whitespace. Normalizing twice is a no-op.
            pub fn normalize(&self) -> Self {
                Self(self.0.trim().to_string())
            }

            /// True when the trimmed value is a well-formed identifier.
            pub fn is_valid(&self) -> bool {
                is_valid_ident(&self.0)
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&$name> for $name {
            fn from(value: &$name) -> Self {
                value.clone()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier! {
    /// Opaque identifier naming a machine state.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fsmkit::core::State;
    ///
    /// let pending = State::new("  PENDING ");
    /// assert!(pending.is_valid());
    /// assert_eq!(pending.normalize().as_str(), "PENDING");
    /// assert!(!State::new("BAD STATE").is_valid());
    /// ```
    State
}

identifier! {
    /// Opaque identifier naming a transition trigger.
    Event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_whitespace() {
        assert_eq!(State::new(" PENDING \t").normalize(), State::new("PENDING"));
        assert_eq!(Event::new("\nSUBMIT ").normalize(), Event::new("SUBMIT"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = State::new("  a:b ").normalize();
        assert_eq!(once.normalize(), once);
    }

    #[test]
    fn allowed_punctuation_is_valid() {
        assert!(State::new("order.v2:PENDING_payment-1").is_valid());
        assert!(Event::new("a").is_valid());
    }

    #[test]
    fn invalid_characters_rejected() {
        assert!(!State::new("BAD STATE").is_valid());
        assert!(!Event::new("BAD@EVENT").is_valid());
        assert!(!State::new("Ünïcode").is_valid());
    }

    #[test]
    fn empty_and_blank_rejected() {
        assert!(!State::new("").is_valid());
        assert!(!Event::new("   ").is_valid());
    }

    #[test]
    fn length_limit_applies_after_trim() {
        let max = "x".repeat(MAX_IDENT_LEN);
        assert!(State::new(format!("  {max}  ")).is_valid());
        assert!(!State::new(format!("{max}x")).is_valid());
    }

    #[test]
    fn no_case_folding() {
        assert_ne!(State::new("pending"), State::new("PENDING"));
    }

    #[test]
    fn identifiers_serialize_as_plain_strings() {
        let json = serde_json::to_string(&Event::new("SUBMIT")).unwrap();
        assert_eq!(json, "\"SUBMIT\"");
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Event::new("SUBMIT"));
    }
}
