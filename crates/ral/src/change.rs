//! Attribute change records.

use crate::value::Value;
use std::fmt;
use std::slice;

/// A single attribute's observed-vs-previous value delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Attribute name
    pub attr: String,
    /// The new (or desired) value
    pub is: Value,
    /// The previous value
    pub was: Value,
}

/// An ordered, append-only sequence of [`Change`] records.
///
/// Insertion order is iteration order is report order. Attribute lists
/// are small, so `exists` is a linear scan rather than a secondary index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeList(Vec<Change>);

impl ChangeList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a change record.
    pub fn add(&mut self, attr: impl Into<String>, is: Value, was: Value) {
        self.0.push(Change {
            attr: attr.into(),
            is,
            was,
        });
    }

    /// Whether a change for the attribute has been recorded.
    pub fn exists(&self, attr: &str) -> bool {
        self.0.iter().any(|change| change.attr == attr)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Change> {
        self.0.iter()
    }

    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no changes were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ChangeList {
    type Item = &'a Change;
    type IntoIter = slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ChangeList {
    /// One change per line in `attr(was->is)` form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for change in &self.0 {
            writeln!(f, "{}({}->{})", change.attr, change.was, change.is)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_preserves_order() {
        let mut changes = ChangeList::new();
        changes.add("shell", Value::from("/bin/zsh"), Value::from("/bin/sh"));
        changes.add("uid", Value::from(1000i64), Value::Absent);
        let attrs: Vec<&str> = changes.iter().map(|c| c.attr.as_str()).collect();
        assert_eq!(attrs, vec!["shell", "uid"]);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn test_exists() {
        let mut changes = ChangeList::new();
        assert!(!changes.exists("shell"));
        changes.add("shell", Value::from("/bin/zsh"), Value::from("/bin/sh"));
        assert!(changes.exists("shell"));
        assert!(!changes.exists("uid"));
    }

    #[test]
    fn test_display_format() {
        let mut changes = ChangeList::new();
        changes.add("color", Value::from("red"), Value::from("blue"));
        changes.add("enabled", Value::from(true), Value::Absent);
        assert_eq!(
            changes.to_string(),
            "color(blue->red)\nenabled(absent->true)\n"
        );
    }
}
