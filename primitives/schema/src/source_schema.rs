//! Resource-provider schema documents.
//!
//! Only the top-level keys the converter reads are modelled. Missing
//! `required`, `createOnlyProperties` and `readOnlyProperties` collections
//! deserialize as empty; a missing `properties` map is kept as `None` so the
//! translator can reject it explicitly.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SchemaFileError;

/// Prefix of the JSON pointers used in `createOnlyProperties` and
/// `readOnlyProperties`.
pub const PROPERTY_POINTER_PREFIX: &str = "/properties/";

/// A parsed resource-provider schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSchema {
    /// Namespaced type name, e.g. `Org::Service::Resource`.
    #[serde(default)]
    pub type_name: String,
    /// Property name → definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, PropertyDef>>,
    /// Names of required properties.
    #[serde(default)]
    pub required: Vec<String>,
    /// `/properties/<name>` pointers to properties settable only at creation.
    #[serde(default)]
    pub create_only_properties: Vec<String>,
    /// Pointers to derived, attribute-only properties.
    #[serde(default)]
    pub read_only_properties: Vec<String>,
}

/// A single property definition.
///
/// `type` is kept as raw JSON so unions (`["string", "null"]`) and missing
/// types can be reported precisely; every other key is preserved verbatim.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDef {
    /// The declared JSON-schema `type`, if any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<Value>,
    /// Remaining keys (`description`, `$ref`, `items`, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl PropertyDef {
    /// A definition with only a scalar `type`.
    pub fn with_type(type_tag: &str) -> Self {
        Self { type_tag: Some(Value::String(type_tag.to_string())), extra: BTreeMap::new() }
    }

    /// The declared type when it is a single string.
    pub fn declared_type(&self) -> Option<&str> { self.type_tag.as_ref().and_then(Value::as_str) }
}

impl SourceSchema {
    /// Parse a schema from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a schema from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SchemaFileError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json_str(&content)?)
    }

    /// Whether `name` is listed in `required`.
    pub fn is_required(&self, name: &str) -> bool { self.required.iter().any(|r| r == name) }

    /// Whether `/properties/<name>` is listed in `createOnlyProperties`.
    pub fn is_create_only(&self, name: &str) -> bool {
        let pointer = property_pointer(name);
        self.create_only_properties.iter().any(|p| *p == pointer)
    }

    /// Whether `/properties/<name>` is listed in `readOnlyProperties`.
    pub fn is_read_only(&self, name: &str) -> bool {
        let pointer = property_pointer(name);
        self.read_only_properties.iter().any(|p| *p == pointer)
    }
}

/// Build the `/properties/<name>` pointer for a property.
pub fn property_pointer(name: &str) -> String { format!("{}{}", PROPERTY_POINTER_PREFIX, name) }

/// Name of the top-level property a pointer refers to.
///
/// `/properties/Tags/0/Key` → `Tags`; pointers outside `/properties/` yield `None`.
pub fn pointer_property_name(pointer: &str) -> Option<&str> {
    let rest = pointer.strip_prefix(PROPERTY_POINTER_PREFIX)?;
    let name = rest.split('/').next().unwrap_or(rest);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_names() {
        assert_eq!(pointer_property_name("/properties/Name"), Some("Name"));
        assert_eq!(pointer_property_name("/properties/Tags/0/Key"), Some("Tags"));
        assert_eq!(pointer_property_name("/properties/"), None);
        assert_eq!(pointer_property_name("/definitions/Foo"), None);
    }

    #[test]
    fn membership_helpers_use_exact_pointers() {
        let schema = SourceSchema::from_json_str(
            r#"{
                "typeName": "Org::Svc::Widget",
                "properties": {"Name": {"type": "string"}, "Arn": {"type": "string"}},
                "required": ["Name"],
                "createOnlyProperties": ["/properties/Name"],
                "readOnlyProperties": ["/properties/Arn"]
            }"#,
        )
        .expect("valid schema");

        assert!(schema.is_required("Name"));
        assert!(!schema.is_required("Arn"));
        assert!(schema.is_create_only("Name"));
        assert!(!schema.is_create_only("Nam"));
        assert!(schema.is_read_only("Arn"));
    }
}
