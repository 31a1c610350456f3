//! Per-run state owned by the orchestrator.
//!
//! The context owns the ephemeral work dir. Dropping it removes the
//! directory, so every exit path that unwinds the orchestrator cleans up.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::stage::Stage;

/// Prefix of ephemeral work dir names.
pub const WORK_DIR_PREFIX: &str = "cfnbridge-";

/// Work dir and progress of a single run.
#[derive(Debug)]
pub struct PipelineContext {
    work_dir: TempDir,
    output_path: PathBuf,
    stage: Stage,
}

impl PipelineContext {
    /// Create a fresh work dir under `work_root` (or the system temp dir).
    ///
    /// The work dir path is always absolute, since generator commands run
    /// with their own current directory.
    pub fn create(work_root: Option<&Path>, output_path: &Path) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORK_DIR_PREFIX);
        let work_dir = match work_root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root.canonicalize()?)?
            }
            None => builder.tempdir()?,
        };
        Ok(Self { work_dir, output_path: output_path.to_path_buf(), stage: Stage::Init })
    }

    /// The ephemeral work dir.
    pub fn work_dir(&self) -> &Path { self.work_dir.path() }

    /// Where the generated package goes.
    pub fn output_path(&self) -> &Path { &self.output_path }

    /// Last state reached.
    pub fn stage(&self) -> Stage { self.stage }

    /// Record a completed transition and return the new state.
    pub fn advance(&mut self) -> Stage {
        if let Some(next) = self.stage.next() {
            self.stage = next;
        }
        self.stage
    }

    /// Remove the work dir, reporting removal errors instead of ignoring them.
    pub fn teardown(self) -> io::Result<()> { self.work_dir.close() }
}
