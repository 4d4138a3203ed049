//! Script providers: external executables speaking the JSON protocol.
//!
//! A script provider wraps an executable that implements the `ral`
//! action protocol: every lifecycle call becomes exactly one process
//! invocation with an `ral_action=<action>` argument, a JSON request
//! document on standard input, and a JSON response document on standard
//! output. Providers are expected to be silent on success; any stderr
//! output, even with a zero exit, fails the call.

pub mod exec;

use crate::attrs::AttributeMap;
use crate::change::ChangeList;
use crate::error::{Error, ErrorKind, Result};
use crate::provider::Provider;
use crate::resource::Resource;
use crate::spec::{Metadata, ProviderSpec};
use crate::value::Value;
use log::{debug, error, warn};
use serde_json::{Value as Json, json};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The operation requested of a script provider via its invocation
/// argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Apply desired attribute values to one resource
    Update,
    /// Locate one resource by name
    Find,
    /// Enumerate all resources
    List,
}

impl Action {
    /// The wire name of this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Find => "find",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider backed by an external executable speaking the JSON action
/// protocol.
pub struct ScriptProvider {
    path: PathBuf,
    metadata: Metadata,
    spec: OnceLock<ProviderSpec>,
}

impl ScriptProvider {
    /// Create a provider for the executable at `path` with an already
    /// parsed descriptor.
    pub fn new(path: impl Into<PathBuf>, metadata: Metadata) -> Self {
        Self {
            path: path.into(),
            metadata,
            spec: OnceLock::new(),
        }
    }

    /// Create a provider, loading the conventional `<script>.json`
    /// sidecar descriptor.
    pub fn from_sidecar(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = Metadata::for_script(&path)?;
        Ok(Self::new(path, metadata))
    }

    /// Path of the provider executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one action against the script: spawn it with
    /// `ral_action=<action>`, feed the request document on stdin, and
    /// parse stdout as the response document.
    ///
    /// Non-zero exit is always a hard failure. A zero exit with
    /// non-empty stderr is promoted to a failure as well.
    fn run_action(&self, action: Action, request: &Json) -> Result<Json> {
        let arg = format!("ral_action={action}");
        debug!("provider[{}]: running action '{action}'", self.path.display());
        let out = exec::execute(&self.path, &[&arg], &request.to_string())?;

        if !out.success {
            return Err(Error::Exec {
                action: action.as_str().to_string(),
                exit: out.exit_code,
                stdout: out.stdout,
                stderr: out.stderr,
            });
        }
        if !out.stderr.is_empty() {
            return Err(Error::Stderr {
                action: action.as_str().to_string(),
                stderr: out.stderr,
            });
        }
        serde_json::from_str(&out.stdout).map_err(|e| Error::MalformedResponse {
            detail: format!("action '{action}' produced invalid JSON: {e}"),
        })
    }

    /// Extract the response's `error` object, if any, with the protocol
    /// defaults: empty message, kind `failed`.
    fn wire_error(response: &Json) -> Option<(String, ErrorKind)> {
        let err = response.get("error")?;
        let message = err
            .get("message")
            .and_then(Json::as_str)
            .unwrap_or("")
            .to_string();
        let kind = err.get("kind").and_then(Json::as_str).unwrap_or("failed");
        Some((message, ErrorKind::from_wire(kind)))
    }

    /// Reconstruct a resource from a wire document.
    ///
    /// The document must carry a `name`; every other key is copied in as
    /// a string-typed value. No coercion through the attribute schema is
    /// performed at this boundary; callers that need typed values go
    /// through [`Provider::parse`].
    fn resource_from_json(&self, doc: &Json) -> Result<Resource> {
        let obj = doc.as_object().ok_or_else(|| Error::MalformedResponse {
            detail: "resource entry is not an object".to_string(),
        })?;
        let name = obj
            .get("name")
            .and_then(Json::as_str)
            .ok_or_else(|| Error::MalformedResponse {
                detail: "resource does not have a name".to_string(),
            })?;

        let mut rsrc = self.create(name);
        for (key, value) in obj {
            if key == "name" {
                continue;
            }
            let text = match value {
                Json::String(s) => s.clone(),
                other => other.to_string(),
            };
            rsrc.set(key.clone(), Value::String(text))?;
        }
        Ok(rsrc)
    }
}

impl Provider for ScriptProvider {
    fn describe(&self) -> Result<ProviderSpec> {
        ProviderSpec::from_metadata(&self.metadata)
    }

    fn suitable(&self) -> Result<bool> {
        match self.metadata.provider.suitable.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(Error::Metadata {
                detail: format!(
                    "provider {}: metadata 'suitable' must be either 'true' or 'false' but was '{other}'",
                    self.path.display()
                ),
            }),
        }
    }

    fn spec(&self) -> Option<&ProviderSpec> {
        self.spec.get()
    }

    fn prepare(&self) -> Result<()> {
        if self.spec.get().is_some() {
            return Ok(());
        }
        let spec = self.describe()?;
        // A lost race means an identical spec is already in place
        let _ = self.spec.set(spec);
        Ok(())
    }

    fn update(&self, resource: &mut Resource, should: &AttributeMap) -> Result<ChangeList> {
        let mut request = json!({
            "ral": { "noop": false },
            "resource": { "name": resource.name() },
        });
        for (key, value) in should {
            // Values always cross the wire in their string form
            request["resource"][key] = Json::String(value.to_string());
        }

        let out = self.run_action(Action::Update, &request).inspect_err(|e| {
            error!("provider[{}]: {e}", self.path.display());
        })?;

        if let Some((message, kind)) = Self::wire_error(&out) {
            return Err(Error::Provider {
                message: format!("update failed: {message}"),
                kind,
            });
        }

        let mut changes = ChangeList::new();
        let Some(wire_changes) = out.get("changes") else {
            // The provider ran but reported nothing changed
            return Ok(changes);
        };
        let entries = wire_changes
            .as_object()
            .ok_or_else(|| Error::MalformedResponse {
                detail: "'changes' is not an object".to_string(),
            })?;
        for (attr, entry) in entries {
            let is = entry.get("is").and_then(Json::as_str).ok_or_else(|| {
                Error::MalformedResponse {
                    detail: format!("malformed change: entry for {attr} does not contain 'is'"),
                }
            })?;
            let was = entry.get("was").and_then(Json::as_str).ok_or_else(|| {
                Error::MalformedResponse {
                    detail: format!("malformed change: entry for {attr} does not contain 'was'"),
                }
            })?;
            changes.add(attr.clone(), Value::from(is), Value::from(was));
        }

        // Optimistic local state sync; the script is not re-queried
        for (key, value) in should {
            if key != "name" {
                resource.set(key.clone(), value.clone())?;
            }
        }
        Ok(changes)
    }

    fn find(&self, name: &str) -> Option<Resource> {
        let request = json!({ "resource": { "name": name } });
        let out = match self.run_action(Action::Find, &request) {
            Ok(out) => out,
            Err(e) => {
                error!("provider[{}]: {e}", self.path.display());
                return None;
            }
        };

        if let Some((message, kind)) = Self::wire_error(&out) {
            if !kind.is_not_found() {
                warn!(
                    "provider[{}]: find for name '{name}' failed with error {message}",
                    self.path.display()
                );
            }
            return None;
        }

        let Some(doc) = out.get("resource") else {
            error!(
                "provider[{}]: find of '{name}' did not produce a 'resource' entry",
                self.path.display()
            );
            return None;
        };
        let rsrc = match self.resource_from_json(doc) {
            Ok(rsrc) => rsrc,
            Err(e) => {
                error!("provider[{}]: find of '{name}': {e}", self.path.display());
                return None;
            }
        };
        if rsrc.name() != name {
            error!(
                "provider[{}]: find of name '{name}' returned resource named '{}'",
                self.path.display(),
                rsrc.name()
            );
            return None;
        }
        Some(rsrc)
    }

    fn instances(&self) -> Vec<Resource> {
        let mut found = Vec::new();
        let out = match self.run_action(Action::List, &json!({})) {
            Ok(out) => out,
            Err(e) => {
                error!("provider[{}]: {e}", self.path.display());
                return found;
            }
        };

        if let Some((message, _)) = Self::wire_error(&out) {
            error!(
                "provider[{}]: list failed with error {message}",
                self.path.display()
            );
            return found;
        }
        let Some(entries) = out.get("resources").and_then(Json::as_array) else {
            error!(
                "provider[{}]: list did not produce a 'resources' entry",
                self.path.display()
            );
            return found;
        };

        for entry in entries {
            match self.resource_from_json(entry) {
                Ok(rsrc) => found.push(rsrc),
                Err(e) => {
                    // Abandon the listing, keeping what was accumulated
                    error!("provider[{}]: list failed: {e}", self.path.display());
                    return found;
                }
            }
        }
        found
    }
}
