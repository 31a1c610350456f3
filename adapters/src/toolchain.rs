//! Generator Toolchain Trait
//!
//! The external generator is opaque: the pipeline only asks for its source
//! tree to be materialized and for commands to be run inside it. Exit status
//! is the only signal read back.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::generator_layout::GeneratorLayout;

/// Exit status of an external command.
///
/// `code` is `None` when the process was terminated without an exit code
/// (e.g. by a signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    code: Option<i32>,
}

impl ToolExit {
    /// A status with the given exit code.
    pub fn from_code(code: i32) -> Self { Self { code: Some(code) } }

    /// A status for a process that ended without an exit code.
    pub fn terminated() -> Self { Self { code: None } }

    /// Exit code, if any.
    pub fn code(&self) -> Option<i32> { self.code }

    /// Whether the command exited with status zero.
    pub fn success(&self) -> bool { self.code == Some(0) }
}

impl From<std::process::ExitStatus> for ToolExit {
    fn from(status: std::process::ExitStatus) -> Self { Self { code: status.code() } }
}

impl fmt::Display for ToolExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => f.write_str("termination without exit code"),
        }
    }
}

/// What to materialize: a repository and where its checkout goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorTree {
    /// Git URL of the repository carrying the generator.
    pub repository: String,
    /// Layout of the checkout to create.
    pub layout: GeneratorLayout,
}

#[derive(Debug, Error)]
/// Errors raised by toolchain operations
pub enum ToolchainError {
    /// The program is not on `PATH`
    #[error("`{0}` was not found on PATH")]
    MissingProgram(String),
    /// The program exists but could not be started
    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// The command ran and exited unsuccessfully
    #[error("`{command}` in {} failed with {exit}", .cwd.display())]
    CommandFailed {
        /// Program and arguments, space separated
        command: String,
        /// Directory the command ran in
        cwd: PathBuf,
        /// Reported exit status
        exit: ToolExit,
    },
    /// I/O error while preparing the tree
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for toolchain operations
pub type ToolchainResult<T> = std::result::Result<T, ToolchainError>;

/// The external generator and the tools that materialize it.
///
/// Every call names its working directory explicitly; implementations must
/// not depend on the process-wide current directory.
pub trait GeneratorToolchain {
    /// Materialize the generator source tree described by `tree` and build it
    /// so its scripts can run.
    fn prepare(&self, tree: &GeneratorTree) -> ToolchainResult<()>;

    /// Run `program` with `args` in `cwd` and report its exit status.
    ///
    /// A non-zero exit is *not* an error at this level; see
    /// [`GeneratorToolchain::run_checked`].
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> ToolchainResult<ToolExit>;

    /// Run a command and turn a non-zero exit into
    /// [`ToolchainError::CommandFailed`].
    fn run_checked(&self, program: &str, args: &[&str], cwd: &Path) -> ToolchainResult<()> {
        let exit = self.run(program, args, cwd)?;
        if exit.success() {
            Ok(())
        } else {
            Err(ToolchainError::CommandFailed {
                command: command_line(program, args),
                cwd: cwd.to_path_buf(),
                exit,
            })
        }
    }
}

/// Render a program and its arguments for messages.
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program).chain(args.iter().copied()).collect::<Vec<_>>().join(" ")
}
