#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Conversion pipeline from a resource-provider schema to a CDK construct
//! package.
//!
//! The pipeline is a strictly linear state machine (see [`Stage`]):
//!
//! - `orchestration` - [`Pipeline`], the run driver and its report
//! - `pipeline_context` - ephemeral work dir and progress of a run
//! - `generator_staging` - generator tree, staged spec, organization patch
//! - `relocation` - copying the generated package to the output path
//! - `package_setup` - `package.json`, `tsconfig.json` and scaffolding pruning
//!
//! Every external command goes through an injected
//! [`adapters::GeneratorToolchain`], so a run can be driven without git, yarn
//! or node.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub mod generator_staging;
pub mod options;
pub mod orchestration;
pub mod package_setup;
pub mod pipeline_context;
pub mod relocation;
pub mod stage;

pub use options::{GeneratorSettings, PackageOptions, PipelineOptions};
pub use orchestration::{Pipeline, RunReport};
pub use pipeline_context::PipelineContext;
pub use stage::Stage;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the conversion pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The ephemeral work dir could not be created.
    #[error("failed to create working directory: {0}")]
    WorkDir(#[source] std::io::Error),
    /// The schema could not be fetched or parsed.
    #[error(transparent)]
    Load(#[from] adapters::LoadError),
    /// The schema does not have the expected shape.
    #[error(transparent)]
    Translate(#[from] translator::TranslateError),
    /// The translated spec could not be written to the requested file.
    #[error("failed to write resource spec to {}: {source}", .path.display())]
    SpecOutput {
        /// Requested destination
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: schema::SchemaFileError,
    },
    /// The generator tree could not be materialized or prepared.
    #[error("generator staging failed: {0}")]
    Staging(String),
    /// The external generator failed.
    #[error("generator failed: {0}")]
    Generator(#[source] adapters::ToolchainError),
    /// The generated package could not be copied to the output path.
    #[error("relocation failed: {0}")]
    Relocation(String),
    /// The package manifest could not be written or scaffolding is missing.
    #[error("package finalization failed: {0}")]
    Finalize(String),
    /// The run was asked to stop.
    #[error("interrupted")]
    Interrupted,
}

/// A failed run: the error plus where it happened.
///
/// `from` is the last state the run reached; `attempted` is the state the
/// failing transition was heading for. An unreachable schema fails from
/// `Init` while attempting `Loaded`; a failing generator fails from
/// `GeneratorStaged` while attempting `GeneratorRun`.
#[derive(Debug)]
pub struct PipelineFailure {
    /// Last state reached before the failure.
    pub from: Stage,
    /// Target of the failing transition.
    pub attempted: Stage,
    /// What went wrong.
    pub error: PipelineError,
}

impl PipelineFailure {
    /// Failure of the transition leaving `from`.
    pub fn new(from: Stage, error: PipelineError) -> Self {
        Self { from, attempted: from.next().unwrap_or(from), error }
    }

    /// The state the run ends in.
    pub fn terminal_stage(&self) -> Stage { Stage::Failed }
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage {} failed (from {}): {}", self.attempted, self.from, self.error)
    }
}

impl std::error::Error for PipelineFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { Some(&self.error) }
}
