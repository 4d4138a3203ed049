//! The provider abstraction.
//!
//! A [`Provider`] implements resource discovery and mutation for one
//! resource type. Providers are long-lived, one instance per type, and
//! every operation is synchronous: a call blocks until the underlying
//! work (for script providers, one external process) completes.

use crate::attrs::AttributeMap;
use crate::change::ChangeList;
use crate::error::{Error, Result};
use crate::resource::Resource;
use crate::spec::ProviderSpec;
use crate::value::Value;

/// A pluggable implementation of resource discovery and mutation for one
/// resource type.
///
/// The read path is `instances`/`find` producing [`Resource`] handles;
/// the write path is `update` against a desired [`AttributeMap`].
/// `prepare` must be called before `parse` so the attribute schema is
/// cached.
pub trait Provider: Send + Sync {
    /// Parse and return this provider's attribute schema. Failure
    /// signals a configuration error such as unparsable metadata.
    fn describe(&self) -> Result<ProviderSpec>;

    /// Whether this provider can run on the current host. Failure
    /// signals malformed metadata.
    fn suitable(&self) -> Result<bool>;

    /// The schema cached by [`prepare`](Provider::prepare), if any.
    fn spec(&self) -> Option<&ProviderSpec>;

    /// Idempotent lazy initialization: calls
    /// [`describe`](Provider::describe) logically once and caches the
    /// schema, propagating its error unchanged.
    fn prepare(&self) -> Result<()>;

    /// Enumerate all resources of this provider's type currently present
    /// on the host.
    ///
    /// Underlying failures are not surfaced: they are logged and an
    /// empty sequence is returned, so callers cannot distinguish "none
    /// exist" from "enumeration failed" through this call alone.
    fn instances(&self) -> Vec<Resource>;

    /// Apply the desired attribute values to the resource on the host,
    /// returning the changes that were made. On success the desired
    /// values are also written back into the in-memory resource.
    fn update(&self, resource: &mut Resource, should: &AttributeMap) -> Result<ChangeList>;

    /// Construct an empty in-memory resource handle bound to this
    /// provider's type. Does not touch host state.
    fn create(&self, name: &str) -> Resource {
        Resource::new(name)
    }

    /// Locate one resource by identity.
    ///
    /// Returns `None` both when the resource genuinely does not exist
    /// and when the lookup failed (the error is logged). The default
    /// implementation linearly scans [`instances`](Provider::instances);
    /// concrete providers may override with a targeted lookup.
    fn find(&self, name: &str) -> Option<Resource> {
        self.instances().into_iter().find(|r| r.name() == name)
    }

    /// Validate and convert a raw string into a typed [`Value`] using
    /// the cached schema.
    fn parse(&self, attr: &str, text: &str) -> Result<Value> {
        let spec = self.spec().ok_or(Error::NoSpec)?;
        let attr_spec = spec.attr(attr).ok_or_else(|| Error::UnknownAttribute {
            name: attr.to_string(),
        })?;
        attr_spec.read_string(text)
    }

    /// Provider-specific batching hook. For protocol providers this is
    /// a no-op.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
