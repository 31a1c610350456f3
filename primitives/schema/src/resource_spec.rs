//! Legacy resource-specification documents.
//!
//! The serialized shape is the contract of the generator's `cfnspec` patch
//! step:
//!
//! ```json
//! {"ResourceTypes": {"Org::Svc::Widget": {"Attributes": {...}, "Properties": {...}}}}
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::SchemaFileError;

/// Top-level resource-specification document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Type name → resource type specification.
    #[serde(rename = "ResourceTypes")]
    pub resource_types: BTreeMap<String, ResourceTypeSpec>,
}

/// Specification of a single resource type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceTypeSpec {
    /// Attribute name → attribute specification.
    #[serde(rename = "Attributes")]
    pub attributes: BTreeMap<String, AttributeSpec>,
    /// Property name → property specification.
    #[serde(rename = "Properties")]
    pub properties: BTreeMap<String, PropertySpec>,
}

/// An attribute entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttributeSpec {
    /// Capitalized schema type, e.g. `String`.
    pub primitive_type: String,
}

/// A property entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertySpec {
    /// Capitalized schema type, e.g. `String`.
    pub primitive_type: String,
    /// Whether the property is listed in the schema's `required`.
    pub required: bool,
    /// Whether the property can change after creation.
    pub update_type: UpdateType,
}

/// Update behaviour of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateType {
    /// May be updated in place.
    Mutable,
    /// Settable only at creation time.
    Immutable,
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateType::Mutable => f.write_str("Mutable"),
            UpdateType::Immutable => f.write_str("Immutable"),
        }
    }
}

impl ResourceSpec {
    /// A document holding exactly one resource type.
    pub fn single(type_name: impl Into<String>, resource: ResourceTypeSpec) -> Self {
        let mut resource_types = BTreeMap::new();
        resource_types.insert(type_name.into(), resource);
        Self { resource_types }
    }

    /// Look up a resource type by its full type name.
    pub fn resource_type(&self, type_name: &str) -> Option<&ResourceTypeSpec> {
        self.resource_types.get(type_name)
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a resource specification from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SchemaFileError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save the specification as pretty JSON, creating parent directories.
    pub fn to_file(&self, path: &Path) -> Result<(), SchemaFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        // Ensure file ends with a newline (POSIX standard)
        writeln!(file)?;
        Ok(())
    }
}

impl ResourceTypeSpec {
    /// Insert both the attribute and property entries for `name`.
    pub fn insert(&mut self, name: &str, property: PropertySpec) {
        self.attributes.insert(
            name.to_string(),
            AttributeSpec { primitive_type: property.primitive_type.clone() },
        );
        self.properties.insert(name.to_string(), property);
    }
}
