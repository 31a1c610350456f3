#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
//! Command-line surface of the `cfnbridge` binary.
//!
//! Arguments the binary does not know are dropped before parsing, so wrapper
//! scripts can pass extra flags through without breaking the run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use adapters::ProcessToolchain;
use clap::{CommandFactory, Parser};
use config::{Config, ConfigError};
use location::{resolve_against, LocationError, SchemaLocation};
use pipeline::{GeneratorSettings, PackageOptions, PipelineFailure, PipelineOptions};
use thiserror::Error;

/// Errors that end a `cfnbridge` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// `--schema-url` is not a usable location.
    #[error("invalid --schema-url: {0}")]
    Location(#[from] LocationError),
    /// The current directory could not be determined.
    #[error("failed to read the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    /// A pipeline stage failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineFailure),
    /// The resource spec could not be rendered for stdout.
    #[error("failed to render resource spec: {0}")]
    Render(#[from] serde_json::Error),
    /// The interrupt handler could not be installed.
    #[cfg(feature = "signals")]
    #[error("failed to install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Generate a CDK construct package from a CloudFormation resource-provider schema.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "cfnbridge", disable_version_flag = true)]
pub struct Cli {
    /// Schema location: http(s) URL, file:// URL or filesystem path
    #[arg(short = 'u', long = "schema-url")]
    pub schema_url: String,
    /// Directory the generated package is written into
    #[arg(short = 'o', long = "output-path", default_value = "./")]
    pub output_path: PathBuf,
    /// Version of the generated package [default from config: 0.1.0]
    #[arg(long)]
    pub version: Option<String>,
    /// Author of the generated package
    #[arg(long, default_value = "")]
    pub author: String,
    /// Version range of @aws-cdk/core [default from config: ^1.110.1]
    #[arg(long = "cdk-version")]
    pub cdk_version: Option<String>,
    /// npm scope for the package name, e.g. @acme
    #[arg(long = "npm-scope")]
    pub npm_scope: Option<String>,
    /// Configuration file [default: <config dir>/cfnbridge/config.toml if present]
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Also write the translated resource spec to this file
    #[arg(long = "spec-out")]
    pub spec_out: Option<PathBuf>,
    /// Stop after translating; print the spec unless --spec-out is given
    #[arg(long = "translate-only")]
    pub translate_only: bool,
    /// Parent directory for the ephemeral working directory
    #[arg(long = "work-dir")]
    pub work_dir: Option<PathBuf>,
    /// Log level, overriding the configuration (RUST_LOG wins over both)
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parse `args` after dropping the ones this binary does not define.
    pub fn parse_lenient<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<String> =
            args.into_iter().map(|a| a.into().to_string_lossy().into_owned()).collect();
        Self::try_parse_from(retain_known_args(&args))
    }

    /// Run parameters: flags first, then configuration, then built-in defaults.
    ///
    /// Relative paths are resolved against `cwd` here, so every later stage
    /// and every generator command sees absolute paths.
    pub fn pipeline_options(
        &self,
        config: &Config,
        cwd: &Path,
    ) -> std::result::Result<PipelineOptions, LocationError> {
        let location = match SchemaLocation::parse(&self.schema_url)? {
            SchemaLocation::Local(path) => SchemaLocation::Local(resolve_against(cwd, &path)),
            remote => remote,
        };
        let mut options = PipelineOptions::new(location, resolve_against(cwd, &self.output_path));
        options.package = PackageOptions {
            version: self.version.clone().unwrap_or_else(|| config.package.version.clone()),
            author: self.author.clone(),
            cdk_version: self.cdk_version.clone().unwrap_or_else(|| config.package.cdk_version.clone()),
            npm_scope: self.npm_scope.clone().filter(|scope| !scope.is_empty()),
        };
        options.generator = GeneratorSettings::from(&config.generator);
        options.work_root = self.work_dir.as_deref().map(|dir| resolve_against(cwd, dir));
        options.spec_out = self.spec_out.as_deref().map(|file| resolve_against(cwd, file));
        Ok(options)
    }

    /// Log level to initialize logging with.
    pub fn log_level<'a>(&'a self, config: &'a Config) -> &'a str {
        self.log_level.as_deref().unwrap_or(&config.logging.level)
    }
}

/// Subprocess toolchain using the configured git and package manager.
pub fn toolchain(config: &Config) -> ProcessToolchain {
    ProcessToolchain::new(config.generator.git.as_str(), config.generator.package_manager.as_str())
}

/// Keep the program name and every flag [`Cli`] defines, with its value.
///
/// An unknown flag is dropped together with the bare words following it, as
/// are stray positional words. A switch given an inline value
/// (`--translate-only=true`) is kept bare when the value is truthy and
/// dropped otherwise.
pub fn retain_known_args(args: &[String]) -> Vec<String> {
    let mut command = Cli::command();
    command.build();

    let takes_value = |token: &str| -> Option<bool> {
        let found = if let Some(long) = token.strip_prefix("--") {
            command.get_arguments().find(|a| a.get_long() == Some(long))
        } else {
            let short = token.strip_prefix('-').and_then(|s| s.chars().next())?;
            command.get_arguments().find(|a| a.get_short() == Some(short))
        };
        found.map(|arg| arg.get_action().takes_values())
    };

    let mut kept = Vec::with_capacity(args.len());
    let mut iter = args.iter().peekable();
    if let Some(program) = iter.next() {
        kept.push(program.clone());
    }

    while let Some(token) = iter.next() {
        if !token.starts_with('-') || token == "-" || token == "--" {
            continue;
        }
        let (name, inline_value) = match token.split_once('=') {
            Some((name, _)) if token.starts_with("--") => (name, true),
            _ => (token.as_str(), !token.starts_with("--") && token.len() > 2),
        };

        match takes_value(name) {
            Some(true) => {
                kept.push(token.clone());
                if !inline_value {
                    if let Some(value) = iter.next() {
                        kept.push(value.clone());
                    }
                }
            }
            Some(false) if inline_value && token.starts_with("--") => {
                let value = token.split_once('=').map(|(_, v)| v).unwrap_or_default();
                if is_truthy(value) {
                    kept.push(name.to_string());
                }
            }
            Some(false) => kept.push(token.clone()),
            None => {
                while iter.peek().is_some_and(|next| !next.starts_with('-')) {
                    iter.next();
                }
            }
        }
    }
    kept
}

/// Whether an inline value given to a switch turns it on.
fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "" | "true" | "yes" | "on" | "1")
}

/// Flag set when the user interrupts the run.
///
/// With the `signals` feature, Ctrl-C and termination requests set it instead
/// of killing the process, so the pipeline stops at the next stage boundary
/// and removes its working directory.
pub fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    #[cfg(feature = "signals")]
    {
        let handler_flag = flag.clone();
        ctrlc::set_handler(move || {
            handler_flag.store(true, std::sync::atomic::Ordering::SeqCst);
            logging::warn("cli", "Interrupted; stopping after the current stage");
        })?;
    }
    Ok(flag)
}
