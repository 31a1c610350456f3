// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Location utilities for schema documents and output directories.
//!
//! A schema can be given as an `http(s)://` URL, a `file://` URL or a plain
//! filesystem path; [`SchemaLocation`] classifies the raw CLI value once so
//! the loader never has to guess.

pub mod location_utils;

// Re-export for convenience
pub use location_utils::*;
