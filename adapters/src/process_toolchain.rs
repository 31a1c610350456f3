//! Subprocess-backed generator toolchain.
//!
//! Materializes the generator by cloning the CDK repository, installing its
//! dependencies and building cfn2ts. Commands inherit stdout/stderr so the
//! generator's own progress stays visible. A command that hangs blocks the
//! run; there is no timeout.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::generator_layout::BUILDUP_SCRIPT;
use crate::toolchain::{
    GeneratorToolchain, GeneratorTree, ToolExit, ToolchainError, ToolchainResult,
};

/// Runs the real git, package-manager and generator commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessToolchain {
    git: String,
    package_manager: String,
}

impl Default for ProcessToolchain {
    fn default() -> Self { Self::new("git", "yarn") }
}

impl ProcessToolchain {
    /// Toolchain using the given git and package-manager executables.
    pub fn new(git: impl Into<String>, package_manager: impl Into<String>) -> Self {
        Self { git: git.into(), package_manager: package_manager.into() }
    }
}

impl GeneratorToolchain for ProcessToolchain {
    fn prepare(&self, tree: &GeneratorTree) -> ToolchainResult<()> {
        let checkout = tree.layout.checkout();
        let parent = checkout.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        logging::info("toolchain", &format!("Cloning {}", tree.repository));
        let checkout_arg = checkout.to_string_lossy().into_owned();
        self.run_checked(
            &self.git,
            &["clone", tree.repository.as_str(), checkout_arg.as_str()],
            parent,
        )?;

        logging::info("toolchain", &format!("Running {} install", self.package_manager));
        self.run_checked(&self.package_manager, &["install"], checkout)?;

        logging::info("toolchain", "Running buildup on cfn2ts");
        self.run_checked(BUILDUP_SCRIPT, &[], &tree.layout.cfn2ts_dir())?;

        Ok(())
    }

    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> ToolchainResult<ToolExit> {
        // A relative cwd would be applied twice: once to the program path and
        // once by the child's chdir.
        let cwd = &location::resolve_against(&std::env::current_dir()?, cwd);
        let resolved = resolve_program(program, cwd)?;
        logging::trace(
            "toolchain",
            &format!("→ {} (in {})", crate::toolchain::command_line(program, args), cwd.display()),
        );

        let status = Command::new(&resolved)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|source| ToolchainError::Spawn { program: program.to_string(), source })?;
        Ok(status.into())
    }
}

/// Resolve a program name to an executable path.
///
/// Names containing a path separator are taken relative to `cwd` (absolute
/// paths stay as they are); bare names are looked up on `PATH`.
fn resolve_program(program: &str, cwd: &Path) -> ToolchainResult<PathBuf> {
    if program.contains('/') || program.contains(std::path::MAIN_SEPARATOR) {
        return Ok(cwd.join(program));
    }
    which::which(program).map_err(|_| ToolchainError::MissingProgram(program.to_string()))
}
