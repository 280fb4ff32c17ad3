//! Operation key value object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The `(objectName, methodName)` pair a permission grant or route names.
///
/// Canonical rendering is the dotted form `object.method`; that string is
/// what persistent storage records for a grant. Construction validates both
/// halves so a malformed grant string can never alias a real operation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OperationKey {
    object: String,
    method: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid operation key: {0}")]
pub struct InvalidOperationKey(pub String);

impl OperationKey {
    /// Build a key from its halves.
    ///
    /// Both halves must be non-empty and dot-free; the dot is reserved as
    /// the separator of the canonical rendering.
    pub fn new(
        object: impl Into<String>,
        method: impl Into<String>,
    ) -> Result<Self, InvalidOperationKey> {
        let object = object.into();
        let method = method.into();

        if object.is_empty() || method.is_empty() {
            return Err(InvalidOperationKey(
                "object and method names must be non-empty".to_string(),
            ));
        }
        if object.contains('.') || method.contains('.') {
            return Err(InvalidOperationKey(format!(
                "object and method names must not contain '.': '{object}.{method}'"
            )));
        }

        Ok(Self { object, method })
    }

    /// Parse the canonical dotted form. Exactly one dot, both halves non-empty.
    pub fn parse(s: &str) -> Result<Self, InvalidOperationKey> {
        let mut parts = s.splitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(object), Some(method), None) => Self::new(object, method),
            _ => Err(InvalidOperationKey(format!(
                "expected 'object.method', got '{s}'"
            ))),
        }
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl core::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.object, self.method)
    }
}

impl From<OperationKey> for String {
    fn from(value: OperationKey) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for OperationKey {
    type Error = InvalidOperationKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_canonical_form() {
        let key = OperationKey::new("Users", "create").unwrap();
        assert_eq!(key.to_string(), "Users.create");
        assert_eq!(OperationKey::parse("Users.create").unwrap(), key);
    }

    #[test]
    fn rejects_missing_or_extra_separators() {
        assert!(OperationKey::parse("Users").is_err());
        assert!(OperationKey::parse("Users.create.extra").is_err());
        assert!(OperationKey::parse(".create").is_err());
        assert!(OperationKey::parse("Users.").is_err());
    }

    #[test]
    fn rejects_dotted_halves() {
        assert!(OperationKey::new("a.b", "c").is_err());
        assert!(OperationKey::new("a", "b.c").is_err());
    }

    #[test]
    fn serializes_as_dotted_string() {
        let key = OperationKey::new("Users", "create").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"Users.create\"");

        let back: OperationKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
