//! Executable suites: the registration list expanded into runnable cases.
//!
//! ## Registration
//!
//! A suite is built from a reference path and an ordered list of executable names:
//!
//! ```rust,no_run
//! use exetest::suite::ExecutableSuite;
//!
//! const EXECUTABLES: &[&str] = &["binary1", "binary2"];
//!
//! let suite = ExecutableSuite::create_executable_tests("tests/bin", Some(EXECUTABLES)).unwrap();
//! assert_eq!(suite.len(), EXECUTABLES.len());
//! ```
//!
//! Passing `None` instead of a list walks the reference directory and registers every executable file found there
//! (see [`discovery`]).
//!
//! ## Invariants
//!
//! - One case per registered name, in registration order.
//! - Case ids are unique; a collision is a [`SuiteError::DuplicateCase`].
//! - A suite is immutable once built.

pub mod discovery;
pub mod resolve;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use exetest_core::naming;

use crate::error::{SuiteError, SuiteResult};

/// One entry of a registration list: an executable name and the arguments it is run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableSpec {
    pub name: String,
    pub args: Vec<String>,
}

impl ExecutableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for ExecutableSpec {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A single generated test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableCase {
    /// Case id, `test_exe_<sanitized file name>`
    pub id: String,
    /// Name as registered (or the discovered path)
    pub name: String,
    /// Resolved location of the executable; may not exist
    pub path: PathBuf,
    pub args: Vec<String>,
}

/// An ordered, immutable set of executable cases rooted at a reference directory.
#[derive(Debug, Clone)]
pub struct ExecutableSuite {
    root: PathBuf,
    cases: Vec<ExecutableCase>,
}

impl ExecutableSuite {
    /// Expand a list of executable names into test cases.
    ///
    /// `ref_file` is either the directory holding the executables or a file inside it (typically the test source
    /// registering them). `None` for `executables` discovers them by walking that directory.
    pub fn create_executable_tests(ref_file: impl AsRef<Path>, executables: Option<&[&str]>) -> SuiteResult<Self> {
        let root = reference_dir(ref_file.as_ref())?;
        match executables {
            Some(names) => Self::from_specs(root, names.iter().map(|n| ExecutableSpec::new(*n))),
            None => Self::discover(root),
        }
    }

    /// Build a suite from explicit specs resolved against `root`.
    pub fn from_specs<I>(root: impl Into<PathBuf>, specs: I) -> SuiteResult<Self>
    where
        I: IntoIterator<Item = ExecutableSpec>,
    {
        let root = root.into();
        let mut builder = CaseBuilder::default();
        for spec in specs {
            if spec.name.trim().is_empty() {
                return Err(SuiteError::EmptyName);
            }
            let path = resolve::resolve_executable(&spec.name, &root);
            builder.push(spec.name, path, spec.args)?;
        }
        Ok(Self {
            root,
            cases: builder.cases,
        })
    }

    /// Build a suite from every executable found under `root`.
    pub fn discover(root: impl Into<PathBuf>) -> SuiteResult<Self> {
        let root = root.into();
        let found = discovery::discover_executables(&root)?;
        let mut builder = CaseBuilder::default();
        for path in found {
            let name = path.display().to_string();
            builder.push(name, path, Vec::new())?;
        }
        Ok(Self {
            root,
            cases: builder.cases,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cases(&self) -> &[ExecutableCase] {
        &self.cases
    }

    /// Number of executables registered or discovered.
    pub fn discovered(&self) -> usize {
        self.cases.len()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case ids in execution order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.cases.iter().map(|c| c.id.as_str())
    }
}

#[derive(Default)]
struct CaseBuilder {
    cases: Vec<ExecutableCase>,
    by_id: HashMap<String, usize>,
}

impl CaseBuilder {
    fn push(&mut self, name: String, path: PathBuf, args: Vec<String>) -> SuiteResult<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let id = naming::test_id_for(&file_name);

        if let Some(&existing) = self.by_id.get(&id) {
            return Err(SuiteError::DuplicateCase {
                id,
                first: self.cases[existing].name.clone(),
                second: name,
            });
        }

        self.by_id.insert(id.clone(), self.cases.len());
        self.cases.push(ExecutableCase { id, name, path, args });
        Ok(())
    }
}

/// Directory that relative executable names are resolved against.
fn reference_dir(ref_file: &Path) -> SuiteResult<PathBuf> {
    if ref_file.is_dir() {
        return Ok(ref_file.to_path_buf());
    }
    if ref_file.is_file() {
        let parent = ref_file.parent().filter(|p| !p.as_os_str().is_empty());
        return Ok(parent.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(".")));
    }
    Err(SuiteError::MissingRoot {
        path: ref_file.to_path_buf(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_one_case_per_name_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let suite = ExecutableSuite::create_executable_tests(dir.path(), Some(&["binary1", "binary2"])).unwrap();
        let ids: Vec<&str> = suite.ids().collect();
        assert_eq!(ids, vec!["test_exe_binary1", "test_exe_binary2"]);
        assert_eq!(suite.discovered(), 2);
    }

    #[test]
    fn test_relative_names_resolve_against_root() {
        let dir = tempfile::tempdir().unwrap();
        let suite = ExecutableSuite::create_executable_tests(dir.path(), Some(&["sub/tool"])).unwrap();
        assert_eq!(suite.cases()[0].path, dir.path().join("sub/tool"));
        assert_eq!(suite.cases()[0].id, "test_exe_tool");
    }

    #[test]
    fn test_reference_file_uses_its_parent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("test_executables.rs");
        std::fs::write(&file, "").unwrap();
        let suite = ExecutableSuite::create_executable_tests(&file, Some(&["binary1"])).unwrap();
        assert_eq!(suite.root(), dir.path());
    }

    #[test]
    fn test_missing_reference_is_an_error() {
        let err = ExecutableSuite::create_executable_tests("/definitely/not/here", Some(&["x"])).unwrap_err();
        assert!(matches!(err, SuiteError::MissingRoot { .. }));
    }

    #[test]
    fn test_colliding_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExecutableSuite::create_executable_tests(dir.path(), Some(&["a.b", "a-b"])).unwrap_err();
        match err {
            SuiteError::DuplicateCase { id, first, second } => {
                assert_eq!(id, "test_exe_a_b");
                assert_eq!(first, "a.b");
                assert_eq!(second, "a-b");
            }
            other => panic!("expected DuplicateCase, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExecutableSuite::create_executable_tests(dir.path(), Some(&[" "])).unwrap_err();
        assert!(matches!(err, SuiteError::EmptyName));
    }

    #[test]
    fn test_spec_args_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ExecutableSpec::new("binary2").with_args(["--quiet"]);
        let suite = ExecutableSuite::from_specs(dir.path(), [spec]).unwrap();
        assert_eq!(suite.cases()[0].args, vec!["--quiet".to_string()]);
    }

    #[test]
    fn test_empty_list_builds_empty_suite() {
        let dir = tempfile::tempdir().unwrap();
        let suite = ExecutableSuite::create_executable_tests(dir.path(), Some(&[])).unwrap();
        assert!(suite.is_empty());
    }
}
