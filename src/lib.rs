#![forbid(unsafe_code)]
//! exetest: smoke-test registered executables
//!
//! A suite is an ordered list of executable names. Each name becomes one test case that locates the executable,
//! runs it without arguments, and passes when it exits with status zero.
//!
//! ## Layout
//!
//! - [`suite`] - registration, name resolution and discovery
//! - [`runner`] - sequential execution and outcome classification
//! - [`report`] - console, JSON and JUnit reporters
//! - [`harness`] - entry point for `harness = false` test targets
//! - [`cli`] - the `exetest` command line
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod report;
pub mod runner;
pub mod suite;
pub mod version;

pub use config::{Manifest, MissingPolicy, RunConfig};
pub use error::{SuiteError, SuiteResult};
pub use harness::harness_main;
pub use runner::{Runner, TestResult, TestSummary};
pub use suite::{ExecutableCase, ExecutableSpec, ExecutableSuite};
