//! Test-case ids and discovery filters.
//!
//! Every registered executable becomes one case whose id is derived from its file name, so ids are stable across
//! machines even when the executable is resolved to different absolute paths.
//!
//! ## Examples
//! ```rust
//! use exetest_core::naming::test_id_for;
//!
//! assert_eq!(test_id_for("binary1"), "test_exe_binary1");
//! assert_eq!(test_id_for("run-me.sh"), "test_exe_run_me_sh");
//! ```

/// Prefix shared by every generated executable case.
pub const TEST_ID_PREFIX: &str = "test_exe_";

/// Id of the extra case that checks at least one executable was registered.
pub const SANITY_TEST_ID: &str = "test_sanity";

/// File extensions discovery never treats as runnable test executables.
///
/// Scripts for another interpreter and shared libraries often carry the executable bit.
pub const SKIPPED_EXTENSIONS: &[&str] = &["py", "so", "dylib", "dll"];

/// Derive the case id for an executable file name.
///
/// Every character outside `[A-Za-z0-9_]` is replaced by `_`.
pub fn test_id_for(file_name: &str) -> String {
    let mut id = String::with_capacity(TEST_ID_PREFIX.len() + file_name.len());
    id.push_str(TEST_ID_PREFIX);
    id.extend(
        file_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' }),
    );
    id
}

/// Check whether `id` has the shape produced by [`test_id_for`] (or is the sanity id).
pub fn is_valid_test_id(id: &str) -> bool {
    if id == SANITY_TEST_ID {
        return true;
    }
    match id.strip_prefix(TEST_ID_PREFIX) {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
        None => false,
    }
}

/// Return `true` when discovery must ignore a file with this name.
pub fn is_skipped_by_discovery(file_name: &str) -> bool {
    if file_name.starts_with('.') {
        return true;
    }
    match file_name.rsplit_once('.') {
        Some((_, ext)) => SKIPPED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
