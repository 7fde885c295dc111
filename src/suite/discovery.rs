//! Discover executables by walking a directory tree.
//!
//! A file is registered when it is a regular file, carries an executable permission bit (unix) or an `.exe`
//! extension (windows), and its name is not on the [`exetest_core::naming::SKIPPED_EXTENSIONS`] list. Results are
//! sorted so the execution order is deterministic.

use std::path::{Path, PathBuf};

use exetest_core::naming;
use walkdir::{DirEntry, WalkDir};

use crate::error::{SuiteError, SuiteResult};

/// Recursively collect executable files under `root`.
pub fn discover_executables(root: &Path) -> SuiteResult<Vec<PathBuf>> {
    if !root.exists() {
        return Err(SuiteError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    let walker = WalkDir::new(root).into_iter().filter_entry(|e| e.depth() == 0 || !is_hidden(e));
    for entry in walker {
        let entry = entry.map_err(|source| SuiteError::Discovery {
            root: root.to_path_buf(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if naming::is_skipped_by_discovery(&name) {
            continue;
        }
        if is_executable(&entry) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    tracing::debug!(root = %root.display(), count = found.len(), "discovered executables");
    Ok(found)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(unix)]
fn is_executable(entry: &DirEntry) -> bool {
    use std::os::unix::fs::PermissionsExt;

    entry
        .metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(entry: &DirEntry) -> bool {
    entry
        .path()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
}
