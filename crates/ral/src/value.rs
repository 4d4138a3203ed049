//! Attribute values.

use std::fmt;

/// A single attribute value.
///
/// Values are small tagged scalars. `Absent` is a distinguished state
/// meaning "no value", which lets attribute lookups be total: asking for
/// an attribute that was never set yields `Absent`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// No value
    #[default]
    Absent,
    /// A string value
    String(String),
    /// A boolean value
    Bool(bool),
    /// An integer value
    Int(i64),
}

impl Value {
    /// Whether this value is anything other than `Absent`.
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// The string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Canonical textual form, used when putting values on the wire.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_absent() {
        assert_eq!(Value::default(), Value::Absent);
        assert!(!Value::default().is_present());
    }

    #[test]
    fn test_is_present() {
        assert!(Value::from("x").is_present());
        assert!(Value::from(false).is_present());
        assert!(Value::from(0i64).is_present());
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(Value::from("red").as_str(), Some("red"));
        assert_eq!(Value::from("red").as_bool(), None);
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(42i64).as_int(), Some(42));
        assert_eq!(Value::Absent.as_str(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Absent.to_string(), "absent");
        assert_eq!(Value::from("red").to_string(), "red");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from(-3i64).to_string(), "-3");
    }

    #[test]
    fn test_equality_compares_tag_and_payload() {
        assert_eq!(Value::from("true"), Value::from("true"));
        assert_ne!(Value::from("true"), Value::from(true));
        assert_ne!(Value::from("1"), Value::from(1i64));
    }
}
