//! Test reporters.
//!
//! The runner separates reporting from execution through the [`TestReporter`] trait. Implementations:
//!
//! - [`ConsoleReporter`] - pytest-style progress lines and a summary.
//! - [`JsonReporter`] - one JSON object per event, in the shape of libtest's `--format json`.
//! - [`JunitReporter`] - a JUnit XML file written when the run finishes.
//! - [`MultiReporter`] - fans events out to several reporters.

mod console;
mod json;
mod junit;

use std::path::Path;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
pub use junit::JunitReporter;

use crate::error::SuiteResult;
use crate::runner::{TestInfo, TestResult, TestSummary};

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called before cases are selected
    fn on_discovery_start(&mut self, _root: &Path) {}

    /// Called once the number of cases to run is known
    fn on_collection_complete(&mut self, test_count: usize);

    fn on_test_start(&mut self, test: &TestInfo);

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult);

    fn on_run_complete(&mut self, summary: &TestSummary);

    /// Flush anything buffered (files, for instance). Called by the entry point after the run.
    fn finish(&mut self) -> SuiteResult<()> {
        Ok(())
    }
}

/// Forwards every event to each inner reporter, in order.
#[derive(Default)]
pub struct MultiReporter {
    reporters: Vec<Box<dyn TestReporter>>,
}

impl MultiReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: impl TestReporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    pub fn push(&mut self, reporter: Box<dyn TestReporter>) {
        self.reporters.push(reporter);
    }
}

impl TestReporter for MultiReporter {
    fn on_discovery_start(&mut self, root: &Path) {
        for r in &mut self.reporters {
            r.on_discovery_start(root);
        }
    }

    fn on_collection_complete(&mut self, test_count: usize) {
        for r in &mut self.reporters {
            r.on_collection_complete(test_count);
        }
    }

    fn on_test_start(&mut self, test: &TestInfo) {
        for r in &mut self.reporters {
            r.on_test_start(test);
        }
    }

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) {
        for r in &mut self.reporters {
            r.on_test_complete(test, result);
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        for r in &mut self.reporters {
            r.on_run_complete(summary);
        }
    }

    fn finish(&mut self) -> SuiteResult<()> {
        for r in &mut self.reporters {
            r.finish()?;
        }
        Ok(())
    }
}

/// Records every event; used by runner tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub collected: Option<usize>,
    pub started: Vec<String>,
    pub completed: Vec<(TestInfo, TestResult)>,
    pub summary: Option<TestSummary>,
}

#[cfg(test)]
impl TestReporter for RecordingReporter {
    fn on_collection_complete(&mut self, test_count: usize) {
        self.collected = Some(test_count);
    }

    fn on_test_start(&mut self, test: &TestInfo) {
        self.started.push(test.id.clone());
    }

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) {
        self.completed.push((test.clone(), result.clone()));
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        self.summary = Some(summary.clone());
    }
}

/// Escape a string for use in XML text and attribute values.
pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // XML 1.0 forbids most control characters even when escaped.
            c if c.is_control() && !matches!(c, '\n' | '\r' | '\t') => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_multi_reporter_fans_out() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.xml");
        let second = dir.path().join("second.xml");
        let mut multi = MultiReporter::new().with(JunitReporter::new(&first));
        multi.push(Box::new(JunitReporter::new(&second)));

        let info = TestInfo {
            id: "test_exe_binary1".to_string(),
            path: PathBuf::from("binary1"),
        };
        multi.on_collection_complete(1);
        multi.on_test_start(&info);
        multi.on_test_complete(&info, &TestResult::Passed(Duration::ZERO));
        multi.on_run_complete(&TestSummary::default());
        assert!(multi.finish().is_ok());

        for path in [first, second] {
            let xml = std::fs::read_to_string(path).unwrap();
            assert!(xml.contains("name=\"test_exe_binary1\""), "{xml}");
        }
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(xml_escape("bell\u{7}"), "bell\u{FFFD}");
        assert_eq!(xml_escape("line\nbreak"), "line\nbreak");
    }
}
