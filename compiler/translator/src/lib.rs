#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Schema translation
//!
//! Converts a resource-provider [`SourceSchema`] into the legacy
//! [`ResourceSpec`] document. Translation is pure: no I/O, no shared state,
//! and the output only depends on the schema's content, never on the order
//! its maps were read in.
//!
//! For every property:
//!
//! - `PrimitiveType` is the declared `type` with its first letter uppercased.
//! - `Required` is true iff the name appears in `required`.
//! - `UpdateType` is `Immutable` iff `/properties/<name>` appears in
//!   `createOnlyProperties`.
//!
//! Composite types (`array`, `object`) receive the same treatment and come
//! out as `Array` / `Object` with no item or member structure. The legacy
//! format supports richer encodings; cfn2ts accepts the flat tag, so the
//! flat tag is what is emitted.

mod shape;

use schema::{
    capitalize_first, PropertySpec, ResourceSpec, ResourceTypeSpec, SourceSchema, TypeName,
    TypeNameError, UpdateType,
};
use thiserror::Error;

/// Errors that can occur while translating a schema.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The schema's `typeName` is not `Org::Service::Resource`.
    #[error("schema shape error: {0}")]
    TypeName(#[from] TypeNameError),
    /// The schema is missing, or misuses, a field the translation needs.
    #[error("schema shape error: {0}")]
    SchemaShape(String),
}

/// Result type for translation.
pub type Result<T> = std::result::Result<T, TranslateError>;

/// A translated schema together with its validated type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// The schema's validated type name.
    pub type_name: TypeName,
    /// The single-resource specification document.
    pub spec: ResourceSpec,
}

/// Translate a schema into a resource specification.
pub fn translate(schema: &SourceSchema) -> Result<ResourceSpec> {
    translate_schema(schema).map(|translation| translation.spec)
}

/// Translate a schema, keeping the parsed [`TypeName`] for later stages.
pub fn translate_schema(schema: &SourceSchema) -> Result<Translation> {
    let shape = shape::validate(schema)?;

    let mut resource = ResourceTypeSpec::default();
    for (name, definition) in shape.properties {
        // validated above: every property has a scalar type
        let declared = definition.declared_type().unwrap_or_default();
        resource.insert(
            name,
            PropertySpec {
                primitive_type: primitive_type(declared),
                required: schema.is_required(name),
                update_type: update_type(schema, name),
            },
        );
    }

    Ok(Translation {
        spec: ResourceSpec::single(shape.type_name.as_str(), resource),
        type_name: shape.type_name,
    })
}

/// Map a JSON-schema type to a legacy `PrimitiveType` tag.
///
/// ```
/// use cfnbridge_translator::primitive_type;
/// assert_eq!(primitive_type("string"), "String");
/// assert_eq!(primitive_type("integer"), "Integer");
/// assert_eq!(primitive_type("array"), "Array");
/// ```
pub fn primitive_type(schema_type: &str) -> String { capitalize_first(schema_type) }

fn update_type(schema: &SourceSchema, name: &str) -> UpdateType {
    if schema.is_create_only(name) {
        UpdateType::Immutable
    } else {
        UpdateType::Mutable
    }
}
