//! Schema shape validation
//!
//! Checks the parts of a [`SourceSchema`] the translation depends on before
//! any output is produced. Validation is all-or-nothing: the first problem
//! found is reported.

use std::collections::BTreeMap;

use schema::{pointer_property_name, PropertyDef, SourceSchema, TypeName};

use crate::TranslateError;

/// The validated pieces of a schema the translator reads.
pub(crate) struct ValidatedShape<'a> {
    pub type_name: TypeName,
    pub properties: &'a BTreeMap<String, PropertyDef>,
}

pub(crate) fn validate(schema: &SourceSchema) -> Result<ValidatedShape<'_>, TranslateError> {
    let type_name = TypeName::parse(&schema.type_name)?;

    let properties = schema.properties.as_ref().ok_or_else(|| {
        TranslateError::SchemaShape(format!("schema `{}` has no `properties`", type_name))
    })?;

    for (name, definition) in properties {
        if definition.declared_type().is_none() {
            let found = match &definition.type_tag {
                Some(tag) => format!("non-string type {}", tag),
                None => "no type".to_string(),
            };
            return Err(TranslateError::SchemaShape(format!(
                "property `{}` of `{}` has {}; only scalar JSON-schema types can be mapped",
                name, type_name, found
            )));
        }
    }

    for name in &schema.required {
        if !properties.contains_key(name) {
            return Err(TranslateError::SchemaShape(format!(
                "`required` lists `{}`, which is not a property of `{}`",
                name, type_name
            )));
        }
    }

    for pointer in &schema.create_only_properties {
        let referenced = pointer_property_name(pointer).ok_or_else(|| {
            TranslateError::SchemaShape(format!(
                "`createOnlyProperties` entry `{}` is not a `/properties/<name>` pointer",
                pointer
            ))
        })?;
        if !properties.contains_key(referenced) {
            return Err(TranslateError::SchemaShape(format!(
                "`createOnlyProperties` entry `{}` references unknown property `{}`",
                pointer, referenced
            )));
        }
    }

    Ok(ValidatedShape { type_name, properties })
}
