//! cfnbridge umbrella crate.
//!
//! This crate primarily serves as the workspace root and re-exports the
//! member crates that make up the conversion pipeline:
//!
//! - [`schema`] - source schema and resource-specification data model
//! - [`translator`] - pure schema → resource-spec translation
//! - [`adapters`] - schema loading and the external generator toolchain
//! - [`pipeline`] - the staged orchestrator and package finalizer

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![doc(test(attr(warn(unused))))]

pub use adapters;
pub use pipeline;
pub use schema;
pub use translator;

/// Miscellaneous metadata about the cfnbridge workspace.
pub mod cfnbridge_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
