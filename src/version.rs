//! Harness version information.
//!
//! Taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time so the CLI and reports agree on one value.

/// The exetest version string (for example, `0.1.0`).
pub const EXETEST_VERSION: &str = env!("CARGO_PKG_VERSION");
