//! Moving the generated package out of the generator tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use adapters::GeneratorLayout;
use schema::TypeName;
use walkdir::WalkDir;

use crate::{PipelineError, Result};

/// Copy the generated source into its package and the package to `output_path`.
///
/// Returns the destination package directory,
/// `<output_path>/<org-service-resource>`. An existing destination is
/// replaced, never merged into.
pub fn relocate(layout: &GeneratorLayout, type_name: &TypeName, output_path: &Path) -> Result<PathBuf> {
    let package_dir = layout.package_dir(type_name);
    if !package_dir.is_dir() {
        return Err(PipelineError::Relocation(format!(
            "generator produced no package at {}",
            package_dir.display()
        )));
    }

    let generated = layout.generated_source(type_name);
    let package_source = layout.package_source(type_name);
    logging::info("relocation", "Copying generated ts to package folder");
    fs::copy(&generated, &package_source)
        .map_err(|e| relocation_error(&format!("copy {}", generated.display()), e))?;

    let destination = output_path.join(type_name.package_dir_name());
    logging::info("relocation", &format!("Copying package to {}", destination.display()));
    copy_and_overwrite(&package_dir, &destination)
        .map_err(|e| relocation_error(&format!("copy package to {}", destination.display()), e))?;

    Ok(destination)
}

/// Replace `to` with a recursive copy of `from`.
pub fn copy_and_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    match fs::symlink_metadata(to) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(to)?,
        Ok(_) => fs::remove_file(to)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    copy_tree(from, to)
}

/// Recursively copy the directory `from` to `to`, following symlinks.
pub fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn relocation_error(action: &str, e: io::Error) -> PipelineError {
    PipelineError::Relocation(format!("could not {}: {}", action, e))
}
