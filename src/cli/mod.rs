//! CLI module for the exetest harness
//!
//! ## Commands
//!
//! - `run [NAMES]...` - Run executables and check their exit status
//! - `list [NAMES]...` - Print the case ids a run would report
//!
//! With no names and no `--manifest`, executables are discovered under `--root`.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use exetest_core::status;

use crate::config::MissingPolicy;
use crate::error::SuiteError;
use crate::version::EXETEST_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(status::EXIT_SUCCESS);
    pub const FAILURE: ExitCode = ExitCode(status::EXIT_FAILURE);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<SuiteError> for CliError {
    fn from(err: SuiteError) -> Self {
        // Render with miette so the diagnostic code and help text reach the user.
        CliError::failure(format!("{:?}", miette::Report::new(err)))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Smoke-test registered executables
#[derive(Parser, Debug)]
#[command(name = "exetest")]
#[command(version = EXETEST_VERSION)]
#[command(about = "Run executables and check that they exit with status zero", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run executables and check their exit status
    Run {
        #[command(flatten)]
        selection: Selection,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Filter cases by keyword
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Match the -k keyword against the whole case id
        #[arg(long, requires = "filter")]
        exact: bool,
        /// Kill an executable after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// How to report an executable that cannot be found
        #[arg(long, value_enum)]
        missing: Option<MissingPolicy>,
        /// Console output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
        format: OutputFormat,
        /// Also write a JUnit XML report to this file
        #[arg(long, value_name = "FILE")]
        junit: Option<PathBuf>,
    },

    /// Print the case ids a run would report
    List {
        #[command(flatten)]
        selection: Selection,
    },
}

/// Which executables to register.
#[derive(Args, Debug, Clone, Default)]
pub struct Selection {
    /// Executable names, resolved against --root and then PATH
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,
    /// Directory holding the executables (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
    /// TOML manifest listing executables and run options
    #[arg(long, value_name = "FILE", conflicts_with = "names")]
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Run {
            selection,
            verbose,
            stop_on_fail,
            filter,
            exact,
            timeout,
            missing,
            format,
            junit,
        } => commands::run_executables(
            &selection,
            commands::RunFlags {
                verbose,
                stop_on_fail,
                filter,
                exact,
                timeout,
                missing,
                format,
                junit,
            },
        ),
        Command::List { selection } => commands::list_cases(&selection),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_names() {
        let cli = Cli::try_parse_from(["exetest", "run", "binary1", "binary2", "--root", "target/debug"]).unwrap();
        if let Command::Run { selection, .. } = cli.command {
            assert_eq!(selection.names, vec!["binary1", "binary2"]);
            assert_eq!(selection.root, Some(PathBuf::from("target/debug")));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "exetest", "run", "-v", "-x", "-k", "binary", "--timeout", "5", "--missing", "skip", "--junit", "out.xml",
        ])
        .unwrap();
        if let Command::Run {
            verbose,
            stop_on_fail,
            filter,
            timeout,
            missing,
            junit,
            format,
            ..
        } = cli.command
        {
            assert!(verbose);
            assert!(stop_on_fail);
            assert_eq!(filter.as_deref(), Some("binary"));
            assert_eq!(timeout, Some(5));
            assert_eq!(missing, Some(MissingPolicy::Skip));
            assert_eq!(junit, Some(PathBuf::from("out.xml")));
            assert_eq!(format, OutputFormat::Console);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_manifest_conflicts_with_names() {
        assert!(Cli::try_parse_from(["exetest", "list", "binary1", "--manifest", "exetest.toml"]).is_err());
    }

    #[test]
    fn test_cli_exact_requires_filter() {
        assert!(Cli::try_parse_from(["exetest", "run", "--exact"]).is_err());
    }

    #[test]
    fn test_suite_error_becomes_failure() {
        let err = CliError::from(SuiteError::EmptyName);
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("executable name must not be empty"));
    }
}
