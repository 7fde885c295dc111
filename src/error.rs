//! Errors raised while building a suite or loading its configuration.
//!
//! Failures of an individual case are not errors at this level: they are [`crate::runner::CaseFailure`] values and
//! end up in the report. A [`SuiteError`] means there is nothing sensible to run.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SuiteError {
    #[error("reference path '{}' does not exist", path.display())]
    #[diagnostic(
        code(exetest::suite::root),
        help("pass the test file itself or the directory holding the executables")
    )]
    MissingRoot { path: PathBuf },

    #[error("failed to walk '{}' for executables: {source}", root.display())]
    #[diagnostic(code(exetest::suite::discovery))]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("executables '{first}' and '{second}' both map to test case '{id}'")]
    #[diagnostic(
        code(exetest::suite::duplicate),
        help("case ids replace every non-identifier character with '_'; rename one of the executables")
    )]
    DuplicateCase { id: String, first: String, second: String },

    #[error("executable name must not be empty")]
    #[diagnostic(code(exetest::suite::empty_name))]
    EmptyName,

    #[error("failed to read manifest '{}': {source}", path.display())]
    #[diagnostic(code(exetest::config::read))]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest '{}': {source}", path.display())]
    #[diagnostic(
        code(exetest::config::parse),
        help("expected keys: root, timeout_secs, missing, executables")
    )]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to start the process runtime: {0}")]
    #[diagnostic(code(exetest::runtime))]
    Runtime(#[source] std::io::Error),

    #[error("failed to write report to '{}': {source}", path.display())]
    #[diagnostic(code(exetest::report::write))]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type SuiteResult<T> = Result<T, SuiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_names_both_executables() {
        let err = SuiteError::DuplicateCase {
            id: "test_exe_a_b".to_string(),
            first: "a.b".to_string(),
            second: "a-b".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'a.b'"));
        assert!(msg.contains("'a-b'"));
        assert!(msg.contains("test_exe_a_b"));
    }

    #[test]
    fn test_diagnostic_code_is_namespaced() {
        let err = SuiteError::EmptyName;
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("exetest::suite::empty_name"));
    }
}
