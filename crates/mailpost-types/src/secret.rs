//! Redacting wrapper for credential values.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A credential value that must not leak through `Debug`, `Display`, or
/// serialized output.
///
/// - `Debug` and `Display` print `[REDACTED]` (empty values print as empty)
/// - `Serialize` always emits an empty string
/// - `Deserialize` accepts a plain string, so config files stay ordinary JSON
/// - [`expose()`](SecretString::expose) hands out the inner value at the one
///   place it is actually needed (the mailbox login)
#[derive(Clone, Default)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The wrapped value. Call only where the credential is consumed.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the wrapped value is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "\"\"")
        } else {
            write!(f, "\"[REDACTED]\"")
        }
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, "[REDACTED]")
        }
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(SecretString(String::deserialize(deserializer)?))
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        SecretString(s.to_string())
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        SecretString(s)
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let s = SecretString::new("hunter2");
        assert_eq!(format!("{s:?}"), "\"[REDACTED]\"");
    }

    #[test]
    fn debug_empty_stays_empty() {
        assert_eq!(format!("{:?}", SecretString::default()), "\"\"");
    }

    #[test]
    fn display_is_redacted() {
        assert_eq!(SecretString::new("hunter2").to_string(), "[REDACTED]");
        assert_eq!(SecretString::default().to_string(), "");
    }

    #[test]
    fn serialize_never_emits_value() {
        let json = serde_json::to_string(&SecretString::new("hunter2")).unwrap();
        assert_eq!(json, "\"\"");
    }

    #[test]
    fn deserialize_plain_string() {
        let s: SecretString = serde_json::from_str("\"hunter2\"").unwrap();
        assert_eq!(s.expose(), "hunter2");
    }

    #[test]
    fn expose_and_is_empty() {
        let s = SecretString::new("x");
        assert_eq!(s.expose(), "x");
        assert!(!s.is_empty());
        assert!(SecretString::default().is_empty());
    }
}
