//! Canonical process exit codes used by the harness entry points.

/// Exit code reported when every case passed.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code reported when at least one case failed or the suite could not be built.
pub const EXIT_FAILURE: i32 = 1;
