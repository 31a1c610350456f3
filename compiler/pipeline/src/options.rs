//! Run parameters.

use std::path::PathBuf;

use location::SchemaLocation;

/// Packaging parameters passed to the package finalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOptions {
    /// `version` of the generated package.
    pub version: String,
    /// `author` of the generated package; may be empty.
    pub author: String,
    /// Version range of the `@aws-cdk/core` dependency.
    pub cdk_version: String,
    /// npm registry scope prefixed to the package name, e.g. `@acme`.
    pub npm_scope: Option<String>,
}

impl Default for PackageOptions {
    fn default() -> Self { Self::from(&config::PackageConfig::default()) }
}

impl From<&config::PackageConfig> for PackageOptions {
    fn from(package: &config::PackageConfig) -> Self {
        Self {
            version: package.version.clone(),
            author: String::new(),
            cdk_version: package.cdk_version.clone(),
            npm_scope: None,
        }
    }
}

/// Where the generator tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Git URL of the CDK repository.
    pub repository: String,
    /// Name of the checkout directory inside the work dir.
    pub checkout_dir: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self { Self::from(&config::GeneratorConfig::default()) }
}

impl From<&config::GeneratorConfig> for GeneratorSettings {
    fn from(generator: &config::GeneratorConfig) -> Self {
        Self { repository: generator.repository.clone(), checkout_dir: generator.checkout_dir.clone() }
    }
}

/// Everything a pipeline run needs from its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Where to read the resource-provider schema.
    pub schema_location: SchemaLocation,
    /// Directory the generated package is written into.
    pub output_path: PathBuf,
    /// Packaging parameters.
    pub package: PackageOptions,
    /// Generator source.
    pub generator: GeneratorSettings,
    /// Parent directory for the ephemeral work dir; the system temp dir when unset.
    pub work_root: Option<PathBuf>,
    /// Also write the translated resource spec here.
    pub spec_out: Option<PathBuf>,
}

impl PipelineOptions {
    /// Options with default packaging and generator settings.
    pub fn new(schema_location: SchemaLocation, output_path: impl Into<PathBuf>) -> Self {
        Self {
            schema_location,
            output_path: output_path.into(),
            package: PackageOptions::default(),
            generator: GeneratorSettings::default(),
            work_root: None,
            spec_out: None,
        }
    }
}
