//! Provider metadata and the attribute schema built from it.
//!
//! A provider ships a JSON descriptor declaring its resource type and
//! the attributes that type carries. [`Metadata`] is the raw descriptor
//! document; [`ProviderSpec`] is the validated schema a provider caches
//! after `prepare`, and the place raw strings get parsed into typed
//! [`Value`]s.

use crate::error::{Error, Result};
use crate::value::Value;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The scalar type an attribute's values must have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrType {
    /// Free-form string
    String,
    /// `true` or `false`
    Bool,
    /// Signed integer
    Int,
    /// One of a closed set of alternatives
    Enum(Vec<String>),
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "boolean"),
            Self::Int => write!(f, "integer"),
            Self::Enum(alts) => write!(f, "enum[{}]", alts.join(", ")),
        }
    }
}

/// Read/write rules for an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Can only be read from the host
    Read,
    /// Can be read and written
    ReadWrite,
    /// Can only be written
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "r"),
            Self::ReadWrite => write!(f, "rw"),
            Self::Write => write!(f, "w"),
        }
    }
}

/// Schema entry for a single attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSpec {
    /// Attribute name
    pub name: String,
    /// Human-readable description
    pub desc: String,
    /// Value type
    pub attr_type: AttrType,
    /// Read/write rules
    pub access: Access,
    /// Whether this attribute is the resource identity
    pub namevar: bool,
}

impl AttrSpec {
    /// Validate and convert a raw string into a typed [`Value`] according
    /// to this attribute's declared type.
    pub fn read_string(&self, text: &str) -> Result<Value> {
        let reject = |expected: String| Error::ParseValue {
            attr: self.name.clone(),
            value: text.to_string(),
            expected,
        };
        match &self.attr_type {
            AttrType::String => Ok(Value::from(text)),
            AttrType::Bool => match text {
                "true" => Ok(Value::from(true)),
                "false" => Ok(Value::from(false)),
                _ => Err(reject("boolean".to_string())),
            },
            AttrType::Int => text
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| reject("integer".to_string())),
            AttrType::Enum(alts) => {
                if alts.iter().any(|alt| alt == text) {
                    Ok(Value::from(text))
                } else {
                    Err(reject(format!("one of [{}]", alts.join(", "))))
                }
            }
        }
    }
}

/// The attribute schema a provider declares for its resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    type_name: String,
    attrs: Vec<AttrSpec>,
}

impl ProviderSpec {
    /// The resource type this schema describes.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// All declared attributes, in name order.
    pub fn attrs(&self) -> &[AttrSpec] {
        &self.attrs
    }

    /// Look up one attribute by name. Attribute lists are small, so this
    /// is a linear scan.
    pub fn attr(&self, name: &str) -> Option<&AttrSpec> {
        self.attrs.iter().find(|spec| spec.name == name)
    }

    /// The identity attribute. [`from_metadata`](Self::from_metadata)
    /// guarantees exactly one.
    pub fn namevar(&self) -> Option<&AttrSpec> {
        self.attrs.iter().find(|spec| spec.namevar)
    }

    /// Build a validated schema from a provider descriptor.
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        let meta = &metadata.provider;
        let mut attrs = Vec::with_capacity(meta.attributes.len());
        for (name, attr) in &meta.attributes {
            attrs.push(AttrSpec {
                name: name.clone(),
                desc: attr.desc.clone(),
                attr_type: parse_attr_type(name, &attr.attr_type)?,
                access: parse_access(name, &attr.kind)?,
                namevar: attr.namevar || name == "name",
            });
        }
        let namevars = attrs.iter().filter(|spec| spec.namevar).count();
        if namevars != 1 {
            return Err(Error::Metadata {
                detail: format!(
                    "provider '{}' must declare exactly one namevar attribute but has {namevars}",
                    meta.type_name
                ),
            });
        }
        Ok(Self {
            type_name: meta.type_name.clone(),
            attrs,
        })
    }
}

fn parse_attr_type(attr: &str, text: &str) -> Result<AttrType> {
    match text {
        "string" => Ok(AttrType::String),
        "boolean" => Ok(AttrType::Bool),
        "integer" => Ok(AttrType::Int),
        _ => {
            if let Some(alts) = text.strip_prefix("enum[").and_then(|t| t.strip_suffix(']')) {
                return Ok(AttrType::Enum(
                    alts.split(',').map(|alt| alt.trim().to_string()).collect(),
                ));
            }
            Err(Error::Metadata {
                detail: format!("attribute '{attr}' has unknown type '{text}'"),
            })
        }
    }
}

fn parse_access(attr: &str, text: &str) -> Result<Access> {
    match text {
        "r" => Ok(Access::Read),
        "rw" => Ok(Access::ReadWrite),
        "w" => Ok(Access::Write),
        _ => Err(Error::Metadata {
            detail: format!(
                "attribute '{attr}' has invalid kind '{text}' (expected 'r', 'rw' or 'w')"
            ),
        }),
    }
}

/// A provider's raw descriptor document.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// The `provider` section
    pub provider: ProviderMeta,
}

/// The `provider` section of a descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderMeta {
    /// Resource type name
    #[serde(rename = "type")]
    pub type_name: String,
    /// Human-readable description
    #[serde(default)]
    pub desc: String,
    /// Whether the provider can run on this host. Kept as the literal
    /// string from the descriptor; anything but `"true"`/`"false"` is
    /// rejected when the provider is asked.
    pub suitable: String,
    /// Declared attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrMeta>,
}

/// One attribute entry in a descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct AttrMeta {
    /// Human-readable description
    #[serde(default)]
    pub desc: String,
    /// Value type: `string`, `boolean`, `integer` or `enum[a, b, ...]`
    #[serde(rename = "type", default = "default_attr_type")]
    pub attr_type: String,
    /// Read/write rules: `r`, `rw` or `w`
    #[serde(default = "default_access")]
    pub kind: String,
    /// Whether this attribute is the resource identity. The attribute
    /// literally named `name` is the namevar by default.
    #[serde(default)]
    pub namevar: bool,
}

fn default_attr_type() -> String {
    "string".to_string()
}

fn default_access() -> String {
    "rw".to_string()
}

impl Metadata {
    /// Parse a descriptor from JSON text.
    pub fn from_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Metadata {
            detail: format!("unparsable descriptor: {e}"),
        })
    }

    /// Load the conventional sidecar descriptor for a provider script,
    /// `<script>.json`.
    pub fn for_script(script: &Path) -> Result<Self> {
        let path = sidecar_path(script);
        let text = std::fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|e| Error::Metadata {
            detail: format!("{}: unparsable descriptor: {e}", path.display()),
        })
    }
}

fn sidecar_path(script: &Path) -> PathBuf {
    let mut os = script.as_os_str().to_os_string();
    os.push(".json");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_metadata() -> Metadata {
        Metadata::from_str(
            r#"{
              "provider": {
                "type": "widget",
                "desc": "manages widgets",
                "suitable": "true",
                "attributes": {
                  "name": { "desc": "widget name", "type": "string" },
                  "color": { "type": "enum[red, green, blue]" },
                  "enabled": { "type": "boolean" },
                  "weight": { "type": "integer", "kind": "r" }
                }
              }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_spec_from_metadata() {
        let spec = ProviderSpec::from_metadata(&widget_metadata()).unwrap();
        assert_eq!(spec.type_name(), "widget");
        assert_eq!(spec.attrs().len(), 4);
        assert_eq!(spec.namevar().unwrap().name, "name");
        assert_eq!(spec.attr("enabled").unwrap().attr_type, AttrType::Bool);
        assert_eq!(spec.attr("weight").unwrap().access, Access::Read);
        assert!(spec.attr("nope").is_none());
    }

    #[test]
    fn test_spec_requires_a_namevar() {
        let metadata = Metadata::from_str(
            r#"{"provider": {"type": "widget", "suitable": "true",
                "attributes": {"color": {"type": "string"}}}}"#,
        )
        .unwrap();
        let err = ProviderSpec::from_metadata(&metadata).unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
    }

    #[test]
    fn test_unknown_attr_type_is_rejected() {
        let metadata = Metadata::from_str(
            r#"{"provider": {"type": "widget", "suitable": "true",
                "attributes": {"name": {"type": "float"}}}}"#,
        )
        .unwrap();
        assert!(ProviderSpec::from_metadata(&metadata).is_err());
    }

    #[test]
    fn test_read_string_by_type() {
        let spec = ProviderSpec::from_metadata(&widget_metadata()).unwrap();

        let color = spec.attr("color").unwrap();
        assert_eq!(color.read_string("red").unwrap(), Value::from("red"));
        assert!(color.read_string("purple").is_err());

        let enabled = spec.attr("enabled").unwrap();
        assert_eq!(enabled.read_string("true").unwrap(), Value::from(true));
        assert!(enabled.read_string("yes").is_err());

        let weight = spec.attr("weight").unwrap();
        assert_eq!(weight.read_string("12").unwrap(), Value::from(12i64));
        assert!(weight.read_string("heavy").is_err());

        let name = spec.attr("name").unwrap();
        assert_eq!(name.read_string("w1").unwrap(), Value::from("w1"));
    }

    #[test]
    fn test_unparsable_descriptor() {
        assert!(matches!(
            Metadata::from_str("{ not json"),
            Err(Error::Metadata { .. })
        ));
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/opt/providers/widget.sh")),
            PathBuf::from("/opt/providers/widget.sh.json")
        );
    }
}
