#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! cfnbridge Configuration
//!
//! This crate provides configuration management for cfnbridge.
//! It handles loading, saving, and defaulting the configuration file that specifies:
//! - Where the cfn2ts generator comes from and which tools bootstrap it
//! - Package defaults (version, CDK runtime version)
//! - Logging configuration
//!
//! Configuration is stored in TOML format. Every key is optional; missing keys
//! take the built-in defaults, and command-line flags override both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Repository the generator tree is cloned from.
pub const DEFAULT_GENERATOR_REPOSITORY: &str = "https://github.com/aws/aws-cdk.git";
/// Directory name of the clone inside the ephemeral work dir.
pub const DEFAULT_CHECKOUT_DIR: &str = "aws-cdk";
/// Version written to generated packages.
pub const DEFAULT_PACKAGE_VERSION: &str = "0.1.0";
/// `@aws-cdk/core` version range generated packages depend on.
pub const DEFAULT_CDK_VERSION: &str = "^1.110.1";

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Configuration file was not found at the specified path
    #[error("Config file not found at: {0}")]
    NotFound(PathBuf),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// A value is present but unusable
    #[error("Invalid config value for `{key}`: {reason}")]
    Invalid {
        /// Dotted key of the offending value
        key: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generator source tree and bootstrap tools
    pub generator: GeneratorConfig,
    /// Defaults for the emitted package
    pub package: PackageConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Generator source tree settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Git URL of the CDK repository carrying cfn2ts
    pub repository: String,
    /// Directory name of the clone inside the work dir
    pub checkout_dir: String,
    /// Git executable
    pub git: String,
    /// Package manager used for `install` (e.g. `yarn`)
    pub package_manager: String,
}

/// Package defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Version written to `package.json`
    pub version: String,
    /// Version range of the `@aws-cdk/core` dependency
    pub cdk_version: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_GENERATOR_REPOSITORY.to_string(),
            checkout_dir: DEFAULT_CHECKOUT_DIR.to_string(),
            git: "git".to_string(),
            package_manager: "yarn".to_string(),
        }
    }
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_PACKAGE_VERSION.to_string(),
            cdk_version: DEFAULT_CDK_VERSION.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "info".to_string() } }
}

impl Config {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/cfnbridge/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir =
            dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("cfnbridge");
        Ok(config_dir.join("config.toml"))
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. Without one, the default path is used if a
    /// file is there; otherwise the built-in defaults apply.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_or_default_internal(explicit, Self::default_path().ok())
    }

    /// Internal function for testing - allows injection of the default path
    fn load_or_default_internal(
        explicit: Option<&Path>,
        default_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        match default_path {
            Some(path) if path.exists() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_empty = [
            ("generator.repository", &self.generator.repository),
            ("generator.checkout_dir", &self.generator.checkout_dir),
            ("generator.git", &self.generator.git),
            ("generator.package_manager", &self.generator.package_manager),
            ("package.version", &self.package.version),
            ("package.cdk_version", &self.package.cdk_version),
        ];
        for (key, value) in non_empty {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid { key, reason: "must not be empty".to_string() });
            }
        }

        if self.generator.checkout_dir.contains(['/', '\\']) || self.generator.checkout_dir == ".." {
            return Err(ConfigError::Invalid {
                key: "generator.checkout_dir",
                reason: format!("`{}` must be a single directory name", self.generator.checkout_dir),
            });
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
            return Err(ConfigError::Invalid {
                key: "logging.level",
                reason: format!("unknown level `{}`", self.logging.level),
            });
        }

        Ok(())
    }
}
