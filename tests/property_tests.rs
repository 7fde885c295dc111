//! Property-based tests for suite construction
//!
//! These tests use proptest to check the registration invariants across many
//! generated name lists.

use std::collections::HashSet;

use exetest::{ExecutableSuite, SuiteError};
use exetest_core::naming;
use proptest::prelude::*;

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_.-]{0,11}"
}

proptest! {
    /// Property: every generated id is a valid case id
    #[test]
    fn ids_are_valid(name in name_strategy()) {
        prop_assert!(naming::is_valid_test_id(&naming::test_id_for(&name)));
    }

    /// Property: a list either yields exactly one case per name, in order, or is rejected as a duplicate
    #[test]
    fn one_case_per_name_or_duplicate(names in prop::collection::vec(name_strategy(), 0..8)) {
        let dir = tempfile::tempdir().unwrap();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let ids: Vec<String> = names.iter().map(|n| naming::test_id_for(n)).collect();
        let unique: HashSet<&String> = ids.iter().collect();

        match ExecutableSuite::create_executable_tests(dir.path(), Some(refs.as_slice())) {
            Ok(suite) => {
                prop_assert_eq!(unique.len(), names.len());
                prop_assert_eq!(suite.len(), names.len());
                let got: Vec<&str> = suite.ids().collect();
                let want: Vec<&str> = ids.iter().map(String::as_str).collect();
                prop_assert_eq!(got, want);
            }
            Err(SuiteError::DuplicateCase { .. }) => prop_assert!(unique.len() < names.len()),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
