//! # ral
//!
//! Typed system resources with pluggable providers.
//!
//! This crate models declarative system resources (a user account, a
//! package, a file) as named entities with attribute maps, and provides
//! a uniform way to discover their current state on a host, diff it
//! against a desired state, and apply changes. The actual inspection and
//! mutation is delegated to [`Provider`] implementations; the one
//! shipped here is [`ScriptProvider`], which drives an external
//! executable through a JSON request/response protocol over standard
//! input/output.
//!
//! ## Example
//!
//! ```no_run
//! use ral::{AttributeMap, Provider, ScriptProvider};
//!
//! // A provider script plus its `<script>.json` descriptor
//! let provider = ScriptProvider::from_sidecar("/opt/providers/user.sh")?;
//! provider.prepare()?;
//!
//! // Read path: enumerate, or look one up by name
//! for resource in provider.instances() {
//!     println!("{}", resource.name());
//! }
//!
//! // Write path: build a desired state and apply it
//! let mut resource = provider.find("alice").unwrap_or_else(|| provider.create("alice"));
//! let mut should = AttributeMap::new();
//! should.set("shell", provider.parse("shell", "/bin/zsh")?);
//! let changes = provider.update(&mut resource, &should)?;
//! print!("{changes}");
//! # Ok::<(), ral::Error>(())
//! ```
//!
//! ## Error handling
//!
//! Every fallible operation returns [`Result`]. The exceptions are
//! `find` and `instances`, which deliberately collapse failures into
//! "no result" / "empty sequence" (logging the underlying error), so a
//! caller cannot distinguish an absent resource from a failed lookup
//! through those calls alone.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attrs;
pub mod change;
pub mod error;
pub mod provider;
pub mod resource;
pub mod script;
pub mod spec;
pub mod value;

pub use attrs::AttributeMap;
pub use change::{Change, ChangeList};
pub use error::{Error, ErrorKind, Result};
pub use provider::Provider;
pub use resource::Resource;
pub use script::{Action, ScriptProvider};
pub use spec::{Access, AttrSpec, AttrType, Metadata, ProviderSpec};
pub use value::Value;
