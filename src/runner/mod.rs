//! Sequential suite runner.
//!
//! ## Flow
//!
//! 1. Select cases with the configured filter.
//! 2. Report the sanity case: it fails when the suite registered no executables at all.
//! 3. For each selected case, in registration order: execute it, turn the outcome into a [`TestResult`], report it.
//! 4. Report the [`TestSummary`].
//!
//! Execution and reporting sit behind the [`CaseExecutor`] and [`TestReporter`] traits so the runner can be driven
//! without spawning processes.

pub mod executor;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use exetest_core::naming::SANITY_TEST_ID;
use exetest_core::status;

use crate::config::{MissingPolicy, RunConfig};
use crate::report::TestReporter;
use crate::suite::{ExecutableCase, ExecutableSuite};

pub use executor::{CaseExecutor, CaseFailure, CaseOutput, ProcessExecutor};

/// Identity of a reported case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInfo {
    pub id: String,
    pub path: PathBuf,
}

impl TestInfo {
    fn sanity(root: &Path) -> Self {
        Self {
            id: SANITY_TEST_ID.to_string(),
            path: root.to_path_buf(),
        }
    }
}

impl From<&ExecutableCase> for TestInfo {
    fn from(case: &ExecutableCase) -> Self {
        Self {
            id: case.id.clone(),
            path: case.path.clone(),
        }
    }
}

/// Result of running a single case
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    Passed(Duration),
    Failed(Duration, String),
    Skipped(String),
}

impl TestResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, TestResult::Failed(..))
    }

    pub fn duration(&self) -> Duration {
        match self {
            TestResult::Passed(d) | TestResult::Failed(d, _) => *d,
            TestResult::Skipped(_) => Duration::ZERO,
        }
    }
}

/// Summary of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl TestSummary {
    fn record(&mut self, result: &TestResult) {
        self.total += 1;
        match result {
            TestResult::Passed(_) => self.passed += 1,
            TestResult::Failed(..) => self.failed += 1,
            TestResult::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit code for this summary.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            status::EXIT_SUCCESS
        } else {
            status::EXIT_FAILURE
        }
    }
}

/// Message of the sanity case when nothing was registered.
pub const NO_EXECUTABLES_MESSAGE: &str = "No executables discovered";

/// Runs the cases of a suite one after another.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Cases selected by the filter, in execution order.
    pub fn selected<'a>(&self, suite: &'a ExecutableSuite) -> Vec<&'a ExecutableCase> {
        suite.cases().iter().filter(|c| self.config.selects(&c.id)).collect()
    }

    /// Ids that a run would report, sanity case first.
    pub fn planned_ids(&self, suite: &ExecutableSuite) -> Vec<String> {
        let mut ids = Vec::new();
        if self.config.selects(SANITY_TEST_ID) {
            ids.push(SANITY_TEST_ID.to_string());
        }
        ids.extend(self.selected(suite).into_iter().map(|c| c.id.clone()));
        ids
    }

    /// Run the suite and return its summary.
    pub fn run(
        &self,
        suite: &ExecutableSuite,
        executor: &dyn CaseExecutor,
        reporter: &mut dyn TestReporter,
    ) -> TestSummary {
        let start = Instant::now();
        reporter.on_discovery_start(suite.root());

        let cases = self.selected(suite);
        let run_sanity = self.config.selects(SANITY_TEST_ID);
        reporter.on_collection_complete(cases.len() + usize::from(run_sanity));

        let mut summary = TestSummary::default();

        if run_sanity {
            let info = TestInfo::sanity(suite.root());
            reporter.on_test_start(&info);
            let result = if suite.discovered() == 0 {
                TestResult::Failed(Duration::ZERO, NO_EXECUTABLES_MESSAGE.to_string())
            } else {
                TestResult::Passed(Duration::ZERO)
            };
            summary.record(&result);
            reporter.on_test_complete(&info, &result);
        }

        let stop_now = |summary: &TestSummary| self.config.stop_on_fail && summary.failed > 0;

        if !stop_now(&summary) {
            for case in cases {
                let info = TestInfo::from(case);
                reporter.on_test_start(&info);
                let result = self.run_case(case, executor);
                summary.record(&result);
                reporter.on_test_complete(&info, &result);

                if stop_now(&summary) {
                    tracing::info!(case = %case.id, "stopping after first failure");
                    break;
                }
            }
        }

        summary.duration = start.elapsed();
        tracing::info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "run complete"
        );
        reporter.on_run_complete(&summary);
        summary
    }

    fn run_case(&self, case: &ExecutableCase, executor: &dyn CaseExecutor) -> TestResult {
        let start = Instant::now();
        match executor.execute(case) {
            Ok(output) => {
                tracing::debug!(
                    case = %case.id,
                    stdout = %output.stdout,
                    stderr = %output.stderr,
                    "executable exited successfully"
                );
                TestResult::Passed(start.elapsed())
            }
            Err(failure @ CaseFailure::Missing { .. }) => {
                tracing::warn!(case = %case.id, policy = ?self.config.missing, "{}", failure);
                match self.config.missing {
                    MissingPolicy::Skip => TestResult::Skipped(failure.to_string()),
                    MissingPolicy::Fail => TestResult::Failed(start.elapsed(), failure.describe()),
                }
            }
            Err(failure) => {
                tracing::debug!(case = %case.id, "{}", failure);
                TestResult::Failed(start.elapsed(), failure.describe())
            }
        }
    }
}
