//! Default console reporter (pytest-style)

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::runner::{TestInfo, TestResult, TestSummary};

use super::TestReporter;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Writes one line per case and a summary.
///
/// Write errors are ignored: a broken console must not change the outcome of the run.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    verbose: bool,
    color: bool,
    failures: Vec<(TestInfo, String)>,
}

impl ConsoleReporter<io::Stdout> {
    /// Report to stdout, with color when stdout is a terminal.
    pub fn new(verbose: bool) -> Self {
        let color = io::stdout().is_terminal();
        Self::with_writer(io::stdout(), verbose, color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn with_writer(out: W, verbose: bool, color: bool) -> Self {
        Self {
            out,
            verbose,
            color,
            failures: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn status(&self, result: &TestResult) -> String {
        match result {
            TestResult::Passed(d) => {
                let s = self.paint(GREEN, "PASSED");
                if self.verbose { format!("{s} ({}ms)", d.as_millis()) } else { s }
            }
            TestResult::Failed(d, _) => {
                let s = self.paint(RED, "FAILED");
                if self.verbose { format!("{s} ({}ms)", d.as_millis()) } else { s }
            }
            TestResult::Skipped(reason) if reason.is_empty() => self.paint(YELLOW, "SKIPPED"),
            TestResult::Skipped(reason) => format!("{} ({})", self.paint(YELLOW, "SKIPPED"), reason),
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_discovery_start(&mut self, root: &Path) {
        if self.verbose {
            let _ = writeln!(self.out, "executables under {}", root.display());
        }
    }

    fn on_collection_complete(&mut self, test_count: usize) {
        let header = self.paint(BOLD, "=================== test session starts ===================");
        let _ = writeln!(self.out, "{header}");
        let _ = writeln!(self.out, "collected {test_count} item(s)");
        let _ = writeln!(self.out);
    }

    fn on_test_start(&mut self, _test: &TestInfo) {}

    fn on_test_complete(&mut self, test: &TestInfo, result: &TestResult) {
        let status = self.status(result);
        let _ = writeln!(self.out, "{} {}", test.id, status);
        if let TestResult::Failed(_, msg) = result {
            self.failures.push((test.clone(), msg.clone()));
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        if !self.failures.is_empty() {
            let _ = writeln!(self.out);
            let banner = self.paint(RED, "=================== FAILURES ===================");
            let _ = writeln!(self.out, "{banner}");
            for (test, msg) in std::mem::take(&mut self.failures) {
                let _ = writeln!(self.out);
                let _ = writeln!(self.out, "___________ {} ___________", test.id);
                for line in msg.lines() {
                    let _ = writeln!(self.out, "    {line}");
                }
                let _ = writeln!(self.out, "    {}", test.path.display());
            }
        }

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.skipped > 0 {
            parts.push(format!("{} skipped", summary.skipped));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        let line = format!(
            "=================== {} in {:.2}s ===================",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        let line = self.paint(if summary.is_success() { GREEN } else { RED }, &line);
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    fn info(id: &str) -> TestInfo {
        TestInfo {
            id: id.to_string(),
            path: PathBuf::from(format!("/bin/{}", id.trim_start_matches("test_exe_"))),
        }
    }

    #[test]
    fn test_plain_report() {
        let mut reporter = ConsoleReporter::with_writer(Vec::new(), false, false);
        reporter.on_collection_complete(3);
        reporter.on_test_complete(&info("test_sanity"), &TestResult::Passed(Duration::ZERO));
        reporter.on_test_complete(&info("test_exe_binary1"), &TestResult::Passed(Duration::from_millis(4)));
        reporter.on_test_complete(
            &info("test_exe_binary2"),
            &TestResult::Failed(Duration::from_millis(2), "Bad exit status from '/bin/binary2': 1".to_string()),
        );
        reporter.on_run_complete(&TestSummary {
            total: 3,
            passed: 2,
            failed: 1,
            skipped: 0,
            duration: Duration::from_millis(10),
        });

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r"
        =================== test session starts ===================
        collected 3 item(s)

        test_sanity PASSED
        test_exe_binary1 PASSED
        test_exe_binary2 FAILED

        =================== FAILURES ===================

        ___________ test_exe_binary2 ___________
            Bad exit status from '/bin/binary2': 1
            /bin/binary2

        =================== 2 passed, 1 failed in 0.01s ===================
        ");
    }

    #[test]
    fn test_verbose_shows_timings_and_skip_reason() {
        let mut reporter = ConsoleReporter::with_writer(Vec::new(), true, false);
        reporter.on_test_complete(&info("test_exe_a"), &TestResult::Passed(Duration::from_millis(7)));
        reporter.on_test_complete(&info("test_exe_b"), &TestResult::Skipped("missing".to_string()));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("test_exe_a PASSED (7ms)"));
        assert!(text.contains("test_exe_b SKIPPED (missing)"));
    }

    #[test]
    fn test_empty_run_summary() {
        let mut reporter = ConsoleReporter::with_writer(Vec::new(), false, false);
        reporter.on_run_complete(&TestSummary::default());
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("no tests ran in 0.00s"));
    }

    #[test]
    fn test_color_wraps_status() {
        let mut reporter = ConsoleReporter::with_writer(Vec::new(), false, true);
        reporter.on_test_complete(&info("test_exe_a"), &TestResult::Passed(Duration::ZERO));
        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "test_exe_a \x1b[32mPASSED\x1b[0m\n");
    }
}
