//! Attribute maps.

use crate::value::Value;
use std::collections::BTreeMap;
use std::collections::btree_map;

static ABSENT: Value = Value::Absent;

/// A mapping from attribute name to [`Value`].
///
/// Lookup is total: reading a key that was never written yields
/// [`Value::Absent`] without mutating the map. Iteration order is the
/// sorted key order, so output built from a map is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeMap(BTreeMap<String, Value>);

impl AttributeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an attribute. Missing keys read as `Absent`.
    pub fn get(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&ABSENT)
    }

    /// Write an attribute, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Whether the key has ever been written.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Typed string lookup with a default for missing or non-string
    /// values.
    pub fn lookup<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).as_str().unwrap_or(default)
    }

    /// Iterate over `(name, value)` pairs in sorted key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(String, Value)> for AttributeMap {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_absent() {
        let attrs = AttributeMap::new();
        assert_eq!(attrs.get("color"), &Value::Absent);
        assert!(!attrs.get("color").is_present());
        // Read-only lookup must not materialize the key
        assert!(!attrs.contains("color"));
        assert!(attrs.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let mut attrs = AttributeMap::new();
        attrs.set("color", "red");
        assert_eq!(attrs.get("color"), &Value::from("red"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_lookup_with_default() {
        let mut attrs = AttributeMap::new();
        attrs.set("shell", "/bin/sh");
        attrs.set("uid", 42i64);
        assert_eq!(attrs.lookup("shell", "/bin/bash"), "/bin/sh");
        assert_eq!(attrs.lookup("missing", "/bin/bash"), "/bin/bash");
        // Wrong type falls back to the default too
        assert_eq!(attrs.lookup("uid", "none"), "none");
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut attrs = AttributeMap::new();
        attrs.set("zeta", "z");
        attrs.set("alpha", "a");
        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
