//! Paths inside the generator checkout.
//!
//! The cfn2ts generator lives in the CDK monorepo. The pipeline reads and
//! writes a handful of files in that tree; their locations are collected here
//! so the orchestrator and the toolchain agree on them.

use std::path::{Path, PathBuf};

use schema::TypeName;

/// Bootstrap script run from `tools/cfn2ts` to build the generator.
pub const BUILDUP_SCRIPT: &str = "../../scripts/buildup";
/// Merge step that folds `spec-source/*.json` patches into the spec.
pub const BUMP_CFNSPEC_SCRIPT: &str = "./scripts/bump-cfnspec.sh";
/// Code-generation entry point, relative to `tools/cfn2ts`.
pub const CFN2TS_BIN: &str = "bin/cfn2ts";
/// Name of the resource-spec patch the merge step picks up.
pub const SPEC_SOURCE_FILE: &str = "999_result.json";

/// Layout of a generator checkout rooted at `checkout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorLayout {
    checkout: PathBuf,
}

impl GeneratorLayout {
    /// Layout for a checkout at `checkout`.
    pub fn new(checkout: impl Into<PathBuf>) -> Self { Self { checkout: checkout.into() } }

    /// Root of the checkout.
    pub fn checkout(&self) -> &Path { &self.checkout }

    /// `tools/cfn2ts`, the generator's working directory.
    pub fn cfn2ts_dir(&self) -> PathBuf { self.checkout.join("tools").join("cfn2ts") }

    /// The generator configuration holding the organization allow-list.
    pub fn genspec_path(&self) -> PathBuf { self.cfn2ts_dir().join("lib").join("genspec.js") }

    /// `packages/@aws-cdk`, parent of every scaffolded package.
    pub fn packages_dir(&self) -> PathBuf { self.checkout.join("packages").join("@aws-cdk") }

    /// Where the translated resource spec is staged for the merge step.
    pub fn spec_source_path(&self) -> PathBuf {
        self.packages_dir().join("cfnspec").join("spec-source").join(SPEC_SOURCE_FILE)
    }

    /// Source file cfn2ts emits for the type's scope.
    pub fn generated_source(&self, type_name: &TypeName) -> PathBuf {
        self.cfn2ts_dir().join("lib").join(type_name.generated_source_file())
    }

    /// Scaffolded package directory for the type's scope.
    pub fn package_dir(&self, type_name: &TypeName) -> PathBuf {
        self.packages_dir().join(type_name.generator_package_name())
    }

    /// Location of the generated source inside the scaffolded package.
    pub fn package_source(&self, type_name: &TypeName) -> PathBuf {
        self.package_dir(type_name).join("lib").join(type_name.generated_source_file())
    }
}
