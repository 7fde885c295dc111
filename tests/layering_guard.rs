//! Layering guardrail: `exetest_core` is a vocabulary crate and must stay dependency-free.
//!
//! This test scans its `Cargo.toml` and fails if anything appears in a dependency table.

#[test]
fn core_crate_has_no_dependencies() {
    let manifest = include_str!("../crates/exetest_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line.ends_with("dependencies]");
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        panic!("`exetest_core` must not declare dependencies, found: {line}");
    }
}
