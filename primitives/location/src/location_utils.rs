// SPDX-License-Identifier: Apache-2.0

//! Schema location parsing and output path resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while interpreting a location string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The location string is empty or whitespace.
    #[error("schema location must not be empty")]
    Empty,
    /// The URL uses a scheme the loader cannot fetch.
    #[error("unsupported URL scheme `{0}` (expected http, https or file)")]
    UnsupportedScheme(String),
}

/// Where a schema document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocation {
    /// An `http://` or `https://` URL.
    Remote(String),
    /// A local file, given as a path or a `file://` URL.
    Local(PathBuf),
}

impl SchemaLocation {
    /// Classify a raw location string.
    ///
    /// ```
    /// use cfnbridge_location::SchemaLocation;
    /// use std::path::PathBuf;
    ///
    /// assert!(SchemaLocation::parse("https://example.com/schema.json").unwrap().is_remote());
    /// assert_eq!(
    ///     SchemaLocation::parse("file:///tmp/schema.json").unwrap(),
    ///     SchemaLocation::Local(PathBuf::from("/tmp/schema.json"))
    /// );
    /// ```
    pub fn parse(raw: &str) -> Result<Self, LocationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LocationError::Empty);
        }

        match trimmed.split_once("://") {
            Some((scheme, rest)) => match scheme.to_ascii_lowercase().as_str() {
                "http" | "https" => Ok(SchemaLocation::Remote(trimmed.to_string())),
                "file" => Ok(SchemaLocation::Local(PathBuf::from(rest))),
                other => Err(LocationError::UnsupportedScheme(other.to_string())),
            },
            None => Ok(SchemaLocation::Local(PathBuf::from(trimmed))),
        }
    }

    /// Whether the schema must be fetched over the network.
    pub fn is_remote(&self) -> bool { matches!(self, SchemaLocation::Remote(_)) }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaLocation::Remote(url) => f.write_str(url),
            SchemaLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve `path` against `base` unless it is already absolute.
///
/// The CLI resolves every user-supplied path against the current directory
/// once at start-up, so the pipeline and the generator commands only see
/// absolute paths.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
