//! Locate a registered executable.
//!
//! Resolution order:
//! 1. absolute paths are used as-is;
//! 2. names containing a path separator are joined to the suite root;
//! 3. bare names are joined to the root when that file exists, otherwise looked up on `PATH`.
//!
//! When nothing is found the root-joined path is returned so the case fails (or is skipped) as missing at run time.

use std::path::{Path, PathBuf};

pub fn resolve_executable(name: &str, root: &Path) -> PathBuf {
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }

    let joined = root.join(candidate);
    if has_separator(name) || joined.exists() {
        tracing::debug!(name, path = %joined.display(), "resolved executable under root");
        return joined;
    }

    match which::which(name) {
        Ok(found) => {
            tracing::debug!(name, path = %found.display(), "resolved executable on PATH");
            found
        }
        Err(_) => {
            tracing::debug!(name, path = %joined.display(), "executable not found; keeping root path");
            joined
        }
    }
}

fn has_separator(name: &str) -> bool {
    name.contains('/') || name.contains(std::path::MAIN_SEPARATOR)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let abs = dir.path().join("tool");
        assert_eq!(resolve_executable(abs.to_str().unwrap(), Path::new("/elsewhere")), abs);
    }

    #[test]
    fn test_existing_file_under_root_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sh"), "").unwrap();
        assert_eq!(resolve_executable("sh", dir.path()), dir.path().join("sh"));
    }

    #[test]
    fn test_unknown_name_falls_back_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let name = "exetest-no-such-binary-7f3a";
        assert_eq!(resolve_executable(name, dir.path()), dir.path().join(name));
    }

    #[cfg(unix)]
    #[test]
    fn test_bare_name_found_on_path() {
        let dir = tempfile::tempdir().unwrap();
        let found = resolve_executable("sh", dir.path());
        assert!(found.is_absolute());
        assert_ne!(found, dir.path().join("sh"));
    }
}
