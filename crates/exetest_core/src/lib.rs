//! Provide the canonical naming vocabulary shared by the `exetest` harness and its tests.
//!
//! ## Notes
//!
//! - This is a vocabulary crate: **no IO**, no global state, no dependencies.
//! - Current scope: test-case ids derived from executable file names, the discovery skip list, and exit codes.

pub mod naming;
pub mod status;
