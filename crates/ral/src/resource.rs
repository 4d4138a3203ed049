//! Resources: named entities owning an attribute map.

use crate::attrs::AttributeMap;
use crate::change::ChangeList;
use crate::error::{Error, Result};
use crate::value::Value;

/// The reserved identity key. It is never stored in a resource's
/// attribute map.
const NAME: &str = "name";

fn is_name(key: &str) -> bool {
    key == NAME
}

/// A named entity representing a piece of managed system state, such as
/// a user account or a file.
///
/// Identity is the name, immutable after construction. State is the
/// attribute map. The name is deliberately not an attribute: reading or
/// writing the key `"name"` through [`get`](Resource::get) or
/// [`set`](Resource::set) fails with [`Error::ReservedAttribute`].
///
/// Resources are plain data owned by the caller; mutation of host state
/// flows through the owning provider's `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    name: String,
    attrs: AttributeMap,
}

impl Resource {
    /// Create an in-memory resource with no attributes. This does not
    /// touch host state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: AttributeMap::new(),
        }
    }

    /// The resource's identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read an attribute. Missing attributes read as
    /// [`Value::Absent`](crate::Value::Absent).
    pub fn get(&self, key: &str) -> Result<&Value> {
        if is_name(key) {
            return Err(Error::ReservedAttribute);
        }
        Ok(self.attrs.get(key))
    }

    /// Write an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        if is_name(&key) {
            return Err(Error::ReservedAttribute);
        }
        self.attrs.set(key, value);
        Ok(())
    }

    /// The full attribute map.
    pub fn attrs(&self) -> &AttributeMap {
        &self.attrs
    }

    /// The canonical diff primitive.
    ///
    /// For each property in `props`, compare only when `should` carries a
    /// present value for it; when that value differs from the resource's
    /// current one, append a change with `is` = desired and `was` =
    /// current. Properties absent from `should` are never considered
    /// changed.
    pub fn check(
        &self,
        changes: &mut ChangeList,
        should: &AttributeMap,
        props: &[&str],
    ) -> Result<()> {
        for &prop in props {
            let want = should.get(prop);
            if !want.is_present() {
                continue;
            }
            let have = self.get(prop)?;
            if have != want {
                changes.add(prop, want.clone(), have.clone());
            }
        }
        Ok(())
    }
}
