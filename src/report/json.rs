//! Line-delimited JSON events, shaped after libtest's `--format json`.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::runner::{TestInfo, TestResult, TestSummary};

use super::TestReporter;

pub struct JsonReporter<W: Write = io::Stdout> {
    out: W,
}

impl JsonReporter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for JsonReporter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, event: Value) {
        let _ = writeln!(self.out, "{event}");
    }
}

/// Build the JSON event for a finished case.
pub(crate) fn test_event(test: &TestInfo, result: &TestResult) -> Value {
    match result {
        TestResult::Passed(d) => json!({
            "type": "test",
            "event": "ok",
            "name": test.id,
            "exec_time": d.as_secs_f64(),
        }),
        TestResult::Failed(d, msg) => json!({
            "type": "test",
            "event": "failed",
            "name": test.id,
            "exec_time": d.as_secs_f64(),
            "stdout": msg,
        }),
        TestResult::Skipped(reason) => json!({
            "type": "test",
            "event": "ignored",
            "name": test.id,
            "message": reason,
        }),
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_collection_complete(&mut self, test_count: usize) {
        self.emit(json!({ "type": "suite", "event": "started", "test_count": test_count }));
    }

    fn on_test_start(&mut self, test: &TestInfo) {
        self.emit(json!({ "type": "test", "event": "started", "name": test.id }));
    }

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) {
        self.emit(test_event(test, result));
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        self.emit(json!({
            "type": "suite",
            "event": if summary.is_success() { "ok" } else { "failed" },
            "passed": summary.passed,
            "failed": summary.failed,
            "ignored": summary.skipped,
            "exec_time": summary.duration.as_secs_f64(),
        }));
        let _ = self.out.flush();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_events_are_one_object_per_line() {
        let info = TestInfo {
            id: "test_exe_binary1".to_string(),
            path: PathBuf::from("binary1"),
        };
        let mut reporter = JsonReporter::with_writer(Vec::new());
        reporter.on_collection_complete(1);
        reporter.on_test_start(&info);
        reporter.on_test_complete(&info, &TestResult::Failed(Duration::from_millis(250), "boom".to_string()));
        reporter.on_run_complete(&TestSummary {
            total: 1,
            failed: 1,
            ..TestSummary::default()
        });

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        let events: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0]["test_count"], 1);
        assert_eq!(events[1]["event"], "started");
        assert_eq!(events[2]["event"], "failed");
        assert_eq!(events[2]["stdout"], "boom");
        assert_eq!(events[2]["exec_time"], 0.25);
        assert_eq!(events[3]["event"], "failed");
        assert_eq!(events[3]["failed"], 1);
    }

    #[test]
    fn test_skipped_maps_to_ignored() {
        let info = TestInfo {
            id: "test_exe_gone".to_string(),
            path: PathBuf::from("gone"),
        };
        let event = test_event(&info, &TestResult::Skipped("missing".to_string()));
        assert_eq!(event["event"], "ignored");
        assert_eq!(event["message"], "missing");
    }
}
