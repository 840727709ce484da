//! Validators over serialized artifacts and over an in-memory ontology.

pub mod functional;
pub mod jsonld;
pub mod rdf;
pub mod store;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Artifacts directly inside `dir` with the given extension, sorted by path.
///
/// # Errors
///
/// Returns an error if `dir` cannot be listed.
pub fn find_artifacts(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == extension) {
            found.push(path.to_path_buf());
        }
    }
    found.sort();
    Ok(found)
}

/// Reads an artifact as UTF-8.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Display name of an artifact in result messages.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
