#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Adapter Library
//!
//! This crate holds everything that touches the outside world on behalf of
//! the pipeline:
//!
//! - [`SchemaLoader`] fetches a resource-provider schema from a URL or a local
//!   path and parses it into a [`schema::SourceSchema`].
//! - [`GeneratorToolchain`] is the seam to the external cfn2ts generator and
//!   the git / package-manager commands that materialize it.
//!   [`ProcessToolchain`] implements it with real subprocesses; tests
//!   substitute their own implementation.
//! - [`GeneratorLayout`] names the files inside the generator's checkout.

pub mod generator_layout;
pub mod process_toolchain;
pub mod schema_loader;
pub mod toolchain;

// Re-export the main adapter types for convenience
pub use generator_layout::*;
pub use process_toolchain::ProcessToolchain;
pub use schema_loader::*;
pub use toolchain::*;
