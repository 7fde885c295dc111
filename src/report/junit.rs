//! JUnit XML report, written once the run is over.
//!
//! The layout is the one CI systems accept from most runners: a single `<testsuite>` inside `<testsuites>`, one
//! `<testcase>` per reported case, with `<failure>` or `<skipped>` children.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{SuiteError, SuiteResult};
use crate::runner::{TestInfo, TestResult, TestSummary};

use super::{TestReporter, xml_escape};

pub struct JunitReporter {
    path: PathBuf,
    suite_name: String,
    cases: Vec<(TestInfo, TestResult)>,
    duration: Duration,
}

impl JunitReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            suite_name: "exetest".to_string(),
            cases: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn with_suite_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Render the report collected so far.
    pub fn render(&self) -> String {
        let failures = self.cases.iter().filter(|(_, r)| r.is_failure()).count();
        let skipped = self
            .cases
            .iter()
            .filter(|(_, r)| matches!(r, TestResult::Skipped(_)))
            .count();
        let suite = xml_escape(&self.suite_name);

        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites>\n");
        let _ = writeln!(
            xml,
            "  <testsuite name=\"{suite}\" tests=\"{}\" failures=\"{failures}\" errors=\"0\" skipped=\"{skipped}\" time=\"{:.3}\">",
            self.cases.len(),
            self.duration.as_secs_f64()
        );

        for (info, result) in &self.cases {
            let open = format!(
                "    <testcase classname=\"{suite}\" name=\"{}\" file=\"{}\" time=\"{:.3}\"",
                xml_escape(&info.id),
                xml_escape(&info.path.display().to_string()),
                result.duration().as_secs_f64()
            );
            match result {
                TestResult::Passed(_) => {
                    let _ = writeln!(xml, "{open}/>");
                }
                TestResult::Failed(_, msg) => {
                    let headline = msg.lines().next().unwrap_or_default();
                    let _ = writeln!(xml, "{open}>");
                    let _ = writeln!(
                        xml,
                        "      <failure message=\"{}\" type=\"failure\">{}</failure>",
                        xml_escape(headline),
                        xml_escape(msg)
                    );
                    let _ = writeln!(xml, "    </testcase>");
                }
                TestResult::Skipped(reason) => {
                    let _ = writeln!(xml, "{open}>");
                    let _ = writeln!(xml, "      <skipped message=\"{}\"/>", xml_escape(reason));
                    let _ = writeln!(xml, "    </testcase>");
                }
            }
        }

        xml.push_str("  </testsuite>\n</testsuites>\n");
        xml
    }
}

impl TestReporter for JunitReporter {
    fn on_collection_complete(&mut self, _test_count: usize) {}

    fn on_test_start(&mut self, _test: &TestInfo) {}

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) {
        self.cases.push((test.clone(), result.clone()));
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        self.duration = summary.duration;
    }

    fn finish(&mut self) -> SuiteResult<()> {
        let write_error = |source| SuiteError::ReportWrite {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&self.path, self.render()).map_err(write_error)?;
        tracing::debug!(path = %self.path.display(), "wrote junit report");
        Ok(())
    }
}
