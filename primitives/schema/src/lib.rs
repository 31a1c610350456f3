#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! cfnbridge schema model
//!
//! This crate defines the two documents the converter moves between:
//!
//! - [`SourceSchema`] - a CloudFormation resource-provider schema, as parsed
//!   from its JSON document.
//! - [`ResourceSpec`] - the legacy resource-specification document consumed
//!   by the cfn2ts generator's `cfnspec` patch step.
//!
//! [`TypeName`] carries the `Org::Service::Resource` naming rules shared by
//! the translator, the orchestrator and the package finalizer.

use thiserror::Error;

pub mod resource_spec;
pub mod source_schema;
pub mod type_name;

pub use resource_spec::*;
pub use source_schema::*;
pub use type_name::*;

/// Errors raised while reading or writing schema documents on disk.
#[derive(Debug, Error)]
pub enum SchemaFileError {
    /// I/O error while reading or writing the document.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The document is not valid JSON for the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Uppercase the first character of `value`, leaving the rest untouched.
///
/// ```
/// use cfnbridge_schema::capitalize_first;
/// assert_eq!(capitalize_first("string"), "String");
/// assert_eq!(capitalize_first("nonNegative"), "NonNegative");
/// assert_eq!(capitalize_first(""), "");
/// ```
pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
