//! Generator staging and invocation.
//!
//! Materializes the generator tree inside the work dir, stages the translated
//! resource spec where the merge step picks it up, and adds the type's
//! organization to cfn2ts' organization allow-list. [`run_generator`] then
//! merges the spec and runs cfn2ts for the type's scope.

use std::fs;
use std::path::Path;

use adapters::{
    GeneratorLayout, GeneratorToolchain, GeneratorTree, BUMP_CFNSPEC_SCRIPT, CFN2TS_BIN,
};
use schema::TypeName;
use translator::Translation;

use crate::options::GeneratorSettings;
use crate::{PipelineError, Result};

/// The organization allow-list in `genspec.js`, matched exactly.
pub const ORG_ALLOW_LIST_LITERAL: &str = "'AWS', 'Alexa'";

/// Prepare the generator tree under `work_dir` and stage `translation` in it.
pub fn stage_generator<T>(
    toolchain: &T,
    work_dir: &Path,
    settings: &GeneratorSettings,
    translation: &Translation,
) -> Result<GeneratorLayout>
where
    T: GeneratorToolchain + ?Sized,
{
    let layout = GeneratorLayout::new(work_dir.join(&settings.checkout_dir));
    let tree = GeneratorTree { repository: settings.repository.clone(), layout: layout.clone() };

    toolchain.prepare(&tree).map_err(|e| {
        PipelineError::Staging(format!("could not prepare generator from {}: {}", tree.repository, e))
    })?;
    if !layout.packages_dir().is_dir() {
        return Err(PipelineError::Staging(format!(
            "generator tree is missing {}",
            layout.packages_dir().display()
        )));
    }

    let spec_path = layout.spec_source_path();
    logging::info("staging", &format!("Saving resource spec to {}", spec_path.display()));
    translation.spec.to_file(&spec_path).map_err(|e| {
        PipelineError::Staging(format!("could not write {}: {}", spec_path.display(), e))
    })?;

    let org_prefix = translation.type_name.org_prefix();
    logging::info("staging", &format!("Adding organization {} to the cfn2ts allow-list", org_prefix));
    patch_genspec(&layout.genspec_path(), &org_prefix)?;

    Ok(layout)
}

/// Run the merge step, then cfn2ts scoped to the type's namespace prefix.
///
/// Exit status is the only signal read back; any non-zero exit is a
/// [`PipelineError::Generator`].
pub fn run_generator<T>(toolchain: &T, layout: &GeneratorLayout, type_name: &TypeName) -> Result<()>
where
    T: GeneratorToolchain + ?Sized,
{
    logging::info("generator", "Running cfnspec bump to merge the staged resource spec");
    toolchain
        .run_checked(BUMP_CFNSPEC_SCRIPT, &[], layout.checkout())
        .map_err(PipelineError::Generator)?;

    let scope = type_name.namespace_prefix();
    logging::info("generator", &format!("Running cfn2ts --scope {}", scope));
    toolchain
        .run_checked(CFN2TS_BIN, &["--scope", scope.as_str()], &layout.cfn2ts_dir())
        .map_err(PipelineError::Generator)
}

/// Rewrite the allow-list in the genspec file at `path`.
pub fn patch_genspec(path: &Path, org_prefix: &str) -> Result<()> {
    let staging_error =
        |e: std::io::Error| PipelineError::Staging(format!("{}: {}", path.display(), e));

    let contents = fs::read_to_string(path).map_err(staging_error)?;
    let patched = patch_org_allow_list(&contents, org_prefix).ok_or_else(|| {
        PipelineError::Staging(format!(
            "{} does not contain the organization allow-list {}",
            path.display(),
            ORG_ALLOW_LIST_LITERAL
        ))
    })?;
    fs::write(path, patched).map_err(staging_error)
}

/// Append `'<org_prefix>'` after every occurrence of the allow-list literal.
///
/// Returns `None` when the literal does not occur.
pub fn patch_org_allow_list(source: &str, org_prefix: &str) -> Option<String> {
    if !source.contains(ORG_ALLOW_LIST_LITERAL) {
        return None;
    }
    let replacement = format!("{}, '{}'", ORG_ALLOW_LIST_LITERAL, org_prefix);
    Some(source.replace(ORG_ALLOW_LIST_LITERAL, &replacement))
}
