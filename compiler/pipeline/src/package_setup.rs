//! Package finalization: manifest, build configuration, scaffolding pruning.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use schema::TypeName;
use serde::Serialize;

use crate::options::PackageOptions;
use crate::{PipelineError, Result};

/// Runtime library every generated package depends on.
pub const CDK_CORE_PACKAGE: &str = "@aws-cdk/core";

/// Generator scaffolding directories removed from the package.
pub const PRUNED_DIRS: &[&str] = &["test"];

/// Generator scaffolding files removed from the package.
pub const PRUNED_FILES: &[&str] = &["LICENSE", "NOTICE", "jest.config.js", ".eslintrc.js"];

/// `package.json` of a generated package. Field order is the output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    /// Package name, optionally scoped.
    pub name: String,
    /// Package version.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Compiled entry point.
    pub main: String,
    /// Type declarations entry point.
    pub types: String,
    /// Conventional directories.
    pub directories: ManifestDirectories,
    /// npm scripts.
    pub scripts: ManifestScripts,
    /// Package author.
    pub author: String,
    /// License identifier; left empty.
    pub license: String,
    /// Runtime dependencies.
    pub dependencies: BTreeMap<String, String>,
}

/// `directories` of a [`PackageManifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestDirectories {
    /// Source directory.
    pub lib: String,
    /// Test directory.
    pub test: String,
}

/// `scripts` of a [`PackageManifest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestScripts {
    /// Placeholder test script.
    pub test: String,
}

impl PackageManifest {
    /// Manifest for the package generated from `type_name`.
    pub fn new(type_name: &TypeName, options: &PackageOptions) -> Self {
        let mut dependencies = BTreeMap::new();
        dependencies.insert(CDK_CORE_PACKAGE.to_string(), options.cdk_version.clone());

        Self {
            name: package_name(type_name, options.npm_scope.as_deref()),
            version: options.version.clone(),
            description: format!("The CDK Construct Library for {}", type_name),
            main: "dist/index.js".to_string(),
            types: "dist/index.d.ts".to_string(),
            directories: ManifestDirectories { lib: "lib".to_string(), test: "test".to_string() },
            scripts: ManifestScripts {
                test: "echo \"Error: no test specified\" && exit 1".to_string(),
            },
            author: options.author.clone(),
            license: String::new(),
            dependencies,
        }
    }
}

/// `tsconfig.json` of a generated package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TsConfig {
    /// Compiler options.
    #[serde(rename = "compilerOptions")]
    pub compiler_options: CompilerOptions,
}

/// TypeScript compiler options. Not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct CompilerOptions {
    pub target: String,
    pub module: String,
    pub declaration: bool,
    pub out_dir: String,
    pub strict: bool,
    pub es_module_interop: bool,
    pub skip_lib_check: bool,
    pub force_consistent_casing_in_file_names: bool,
}

impl Default for TsConfig {
    fn default() -> Self {
        Self {
            compiler_options: CompilerOptions {
                target: "ES2017".to_string(),
                module: "commonjs".to_string(),
                declaration: true,
                out_dir: "./dist".to_string(),
                strict: true,
                es_module_interop: true,
                skip_lib_check: true,
                force_consistent_casing_in_file_names: true,
            },
        }
    }
}

/// npm package name: the hyphenated, lowercased type name, scoped when a
/// scope is given.
pub fn package_name(type_name: &TypeName, npm_scope: Option<&str>) -> String {
    let name = type_name.package_dir_name();
    match npm_scope {
        Some(scope) if !scope.is_empty() => format!("{}/{}", scope, name),
        _ => name,
    }
}

/// Write `package.json` and `tsconfig.json` into `package_dir` and prune the
/// generator's scaffolding.
pub fn finalize_package(package_dir: &Path, type_name: &TypeName, options: &PackageOptions) -> Result<()> {
    logging::info("package", "Setting up package.json");
    write_json(&package_dir.join("package.json"), &PackageManifest::new(type_name, options))?;

    logging::info("package", "Setting up tsconfig.json");
    write_json(&package_dir.join("tsconfig.json"), &TsConfig::default())?;

    logging::info("package", "Removing generator scaffolding");
    prune_scaffolding(package_dir)
}

/// Remove [`PRUNED_DIRS`] and [`PRUNED_FILES`] from `package_dir`.
///
/// Every entry must exist; nothing is removed if any is missing.
pub fn prune_scaffolding(package_dir: &Path) -> Result<()> {
    let missing: Vec<&str> = PRUNED_DIRS
        .iter()
        .filter(|d| !package_dir.join(d).is_dir())
        .chain(PRUNED_FILES.iter().filter(|f| !package_dir.join(f).is_file()))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::Finalize(format!(
            "{} is missing generator scaffolding: {}",
            package_dir.display(),
            missing.join(", ")
        )));
    }

    let finalize_error =
        |path: &Path, e: std::io::Error| PipelineError::Finalize(format!("{}: {}", path.display(), e));
    for dir in PRUNED_DIRS {
        let path = package_dir.join(dir);
        fs::remove_dir_all(&path).map_err(|e| finalize_error(&path, e))?;
    }
    for file in PRUNED_FILES {
        let path = package_dir.join(file);
        fs::remove_file(&path).map_err(|e| finalize_error(&path, e))?;
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .map_err(|e| PipelineError::Finalize(format!("{}: {}", path.display(), e)))?;
    json.push('\n');
    fs::write(path, json).map_err(|e| PipelineError::Finalize(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> TypeName { TypeName::parse("Org::Svc::Widget").expect("type name") }

    fn scaffolded_package() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("test")).expect("mkdir test");
        fs::write(dir.path().join("test/widget.test.ts"), "").expect("write test");
        fs::create_dir_all(dir.path().join("lib")).expect("mkdir lib");
        for file in PRUNED_FILES {
            fs::write(dir.path().join(file), "").expect("write scaffolding");
        }
        dir
    }

    #[test]
    fn package_name_is_hyphenated_and_optionally_scoped() {
        assert_eq!(package_name(&widget(), None), "org-svc-widget");
        assert_eq!(package_name(&widget(), Some("@acme")), "@acme/org-svc-widget");
        assert_eq!(package_name(&widget(), Some("")), "org-svc-widget");
    }

    #[test]
    fn manifest_fields_in_order() {
        let options = PackageOptions {
            version: "1.2.3".to_string(),
            author: "Jane".to_string(),
            cdk_version: "^1.110.1".to_string(),
            npm_scope: Some("@acme".to_string()),
        };
        let json = serde_json::to_string(&PackageManifest::new(&widget(), &options)).expect("json");
        assert_eq!(
            json,
            concat!(
                r#"{"name":"@acme/org-svc-widget","version":"1.2.3","#,
                r#""description":"The CDK Construct Library for Org::Svc::Widget","#,
                r#""main":"dist/index.js","types":"dist/index.d.ts","#,
                r#""directories":{"lib":"lib","test":"test"},"#,
                r#""scripts":{"test":"echo \"Error: no test specified\" && exit 1"},"#,
                r#""author":"Jane","license":"","dependencies":{"@aws-cdk/core":"^1.110.1"}}"#
            )
        );
    }

    #[test]
    fn tsconfig_uses_camel_case_options() {
        let value = serde_json::to_value(TsConfig::default()).expect("json");
        let options = &value["compilerOptions"];
        assert_eq!(options["target"], "ES2017");
        assert_eq!(options["module"], "commonjs");
        assert_eq!(options["outDir"], "./dist");
        assert_eq!(options["esModuleInterop"], true);
        assert_eq!(options["forceConsistentCasingInFileNames"], true);
        assert_eq!(options.as_object().map(|o| o.len()), Some(8));
    }

    #[test]
    fn finalize_writes_files_and_prunes() {
        let dir = scaffolded_package();
        finalize_package(dir.path(), &widget(), &PackageOptions::default()).expect("finalize");

        assert!(dir.path().join("package.json").is_file());
        assert!(dir.path().join("tsconfig.json").is_file());
        assert!(dir.path().join("lib").is_dir());
        assert!(!dir.path().join("test").exists());
        for file in PRUNED_FILES {
            assert!(!dir.path().join(file).exists(), "{} should be pruned", file);
        }
    }

    #[test]
    fn missing_scaffolding_is_reported_and_nothing_is_removed() {
        let dir = scaffolded_package();
        fs::remove_file(dir.path().join("NOTICE")).expect("remove NOTICE");

        match prune_scaffolding(dir.path()) {
            Err(PipelineError::Finalize(msg)) => assert!(msg.ends_with("NOTICE"), "{}", msg),
            other => panic!("expected Finalize error, got {:?}", other),
        }
        assert!(dir.path().join("test").is_dir());
        assert!(dir.path().join("LICENSE").is_file());
    }
}
