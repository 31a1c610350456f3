//! Resource type names of the form `Org::Service::Resource`.
//!
//! Every name the pipeline needs (generator scope, organization prefix,
//! package directory, npm package name) is derived here, once, from the
//! schema's `typeName`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::capitalize_first;

/// Separator between the segments of a resource type name.
pub const TYPE_NAME_SEPARATOR: &str = "::";

/// Errors produced when a `typeName` does not follow `Org::Service::Resource`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeNameError {
    /// The name does not split into exactly three segments.
    #[error("type name `{name}` must have exactly three `::`-delimited segments, found {found}")]
    SegmentCount {
        /// The offending type name.
        name: String,
        /// Number of segments found.
        found: usize,
    },
    /// One of the three segments is empty.
    #[error("type name `{0}` contains an empty segment")]
    EmptySegment(String),
    /// A segment contains characters other than ASCII letters and digits.
    #[error("type name segment `{segment}` in `{name}` must contain only ASCII letters and digits")]
    InvalidSegment {
        /// The offending type name.
        name: String,
        /// The segment that failed validation.
        segment: String,
    },
}

/// A validated `Org::Service::Resource` type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    raw: String,
    organization: String,
    service: String,
    resource: String,
}

impl TypeName {
    /// Parse and validate a raw type name.
    pub fn parse(raw: &str) -> Result<Self, TypeNameError> {
        let segments: Vec<&str> = raw.split(TYPE_NAME_SEPARATOR).collect();
        if segments.len() != 3 {
            return Err(TypeNameError::SegmentCount {
                name: raw.to_string(),
                found: segments.len(),
            });
        }
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(TypeNameError::EmptySegment(raw.to_string()));
        }
        // Segments become directory and file names; keep them to `[A-Za-z0-9]+`.
        if let Some(segment) =
            segments.iter().find(|segment| !segment.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            return Err(TypeNameError::InvalidSegment {
                name: raw.to_string(),
                segment: segment.to_string(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            organization: segments[0].to_string(),
            service: segments[1].to_string(),
            resource: segments[2].to_string(),
        })
    }

    /// The type name exactly as it appeared in the schema.
    pub fn as_str(&self) -> &str { &self.raw }

    /// First segment, original casing.
    pub fn organization(&self) -> &str { &self.organization }

    /// Second segment, original casing.
    pub fn service(&self) -> &str { &self.service }

    /// Third segment, original casing.
    pub fn resource(&self) -> &str { &self.resource }

    /// Lowercased organization segment (`Org::Svc::Widget` → `org`).
    pub fn org_name(&self) -> String { self.organization.to_lowercase() }

    /// Lowercased service segment, used as the generator scope (`svc`).
    pub fn scope_name(&self) -> String { self.service.to_lowercase() }

    /// Organization name as the generator's allow-list expects it (`Org`).
    pub fn org_prefix(&self) -> String { capitalize_first(&self.org_name()) }

    /// Everything before the final `::` segment (`Org::Svc`), passed to
    /// `cfn2ts --scope`.
    pub fn namespace_prefix(&self) -> String {
        format!("{}{}{}", self.organization, TYPE_NAME_SEPARATOR, self.service)
    }

    /// Lowercased, hyphenated form (`org-svc-widget`), used both for the
    /// final package directory and the npm package name.
    pub fn package_dir_name(&self) -> String {
        self.raw.replace(TYPE_NAME_SEPARATOR, "-").to_lowercase()
    }

    /// Directory name of the generator's scaffolded package (`org-svc`).
    pub fn generator_package_name(&self) -> String {
        format!("{}-{}", self.org_name(), self.scope_name())
    }

    /// File name cfn2ts emits for this scope (`svc.generated.ts`).
    pub fn generated_source_file(&self) -> String {
        format!("{}.generated.ts", self.scope_name())
    }
}

impl FromStr for TypeName {
    type Err = TypeNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.raw) }
}
