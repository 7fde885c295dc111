//! Execute a case and classify its outcome.
//!
//! [`ProcessExecutor`] is the real implementation: it spawns the executable with its arguments, no stdin, and captured
//! output, then waits for it on a private current-thread tokio runtime so an optional timeout can be enforced. A child
//! that outlives the timeout is killed when its wait future is dropped.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};

use crate::error::{SuiteError, SuiteResult};
use crate::suite::ExecutableCase;

/// Output captured from a finished executable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CaseOutput {
    fn from_process(output: &std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Why a case did not pass.
#[derive(Debug, Error)]
pub enum CaseFailure {
    #[error("Executable '{}' is unexpectedly missing", path.display())]
    Missing { path: PathBuf },

    #[error("Bad exit status from '{}': {code}", path.display())]
    ExitStatus { path: PathBuf, code: i32, output: CaseOutput },

    #[error("'{}' terminated by signal {signal}", path.display())]
    Signalled { path: PathBuf, signal: i32, output: CaseOutput },

    #[error("'{}' timed out after {:.1}s", path.display(), after.as_secs_f64())]
    TimedOut { path: PathBuf, after: Duration },

    #[error("Failed to start '{}': {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CaseFailure {
    /// Output captured before the failure, if the process ran to completion.
    pub fn output(&self) -> Option<&CaseOutput> {
        match self {
            CaseFailure::ExitStatus { output, .. } | CaseFailure::Signalled { output, .. } => Some(output),
            _ => None,
        }
    }

    /// The failure message followed by any captured output.
    pub fn describe(&self) -> String {
        let mut msg = self.to_string();
        if let Some(output) = self.output() {
            for (label, text) in [("stdout", &output.stdout), ("stderr", &output.stderr)] {
                let text = text.trim_end();
                if !text.is_empty() {
                    msg.push_str(&format!("\n---- {label} ----\n{text}"));
                }
            }
        }
        msg
    }
}

/// Execute a compiled executable and capture the outcome.
pub trait CaseExecutor {
    fn execute(&self, case: &ExecutableCase) -> Result<CaseOutput, CaseFailure>;
}

/// Spawns each case as a child process.
///
/// Must not be used from inside another tokio runtime: [`CaseExecutor::execute`] blocks on its own runtime.
pub struct ProcessExecutor {
    runtime: Runtime,
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new(timeout: Option<Duration>) -> SuiteResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SuiteError::Runtime)?;
        Ok(Self { runtime, timeout })
    }

    async fn run_child(&self, case: &ExecutableCase) -> Result<CaseOutput, CaseFailure> {
        let spawn_error = |source| CaseFailure::Spawn {
            path: case.path.clone(),
            source,
        };

        let argstr = if case.args.is_empty() {
            "no arguments".to_string()
        } else {
            format!("arguments \"{}\"", case.args.join(" "))
        };
        tracing::debug!(case = %case.id, path = %case.path.display(), "running executable with {}", argstr);

        let child = Command::new(&case.path)
            .args(&case.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        let waited = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(waited) => waited,
                Err(_) => {
                    tracing::warn!(case = %case.id, "killing executable after {:?}", limit);
                    return Err(CaseFailure::TimedOut {
                        path: case.path.clone(),
                        after: limit,
                    });
                }
            },
            None => child.wait_with_output().await,
        };
        let output = waited.map_err(spawn_error)?;
        classify(case, &output.status, CaseOutput::from_process(&output))
    }
}

impl CaseExecutor for ProcessExecutor {
    fn execute(&self, case: &ExecutableCase) -> Result<CaseOutput, CaseFailure> {
        if !case.path.exists() {
            return Err(CaseFailure::Missing { path: case.path.clone() });
        }
        self.runtime.block_on(self.run_child(case))
    }
}

fn classify(case: &ExecutableCase, status: &ExitStatus, output: CaseOutput) -> Result<CaseOutput, CaseFailure> {
    if status.success() {
        return Ok(output);
    }
    let path = case.path.clone();
    match (status.code(), terminating_signal(status)) {
        (Some(code), _) => Err(CaseFailure::ExitStatus { path, code, output }),
        (None, Some(signal)) => Err(CaseFailure::Signalled { path, signal, output }),
        (None, None) => Err(CaseFailure::ExitStatus { path, code: -1, output }),
    }
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_appends_non_empty_streams() {
        let failure = CaseFailure::ExitStatus {
            path: PathBuf::from("/bin/tool"),
            code: 2,
            output: CaseOutput {
                stdout: "hello\n".to_string(),
                stderr: String::new(),
            },
        };
        assert_eq!(
            failure.describe(),
            "Bad exit status from '/bin/tool': 2\n---- stdout ----\nhello"
        );
    }

    #[test]
    fn test_missing_has_no_output() {
        let failure = CaseFailure::Missing {
            path: PathBuf::from("binary1"),
        };
        assert!(failure.output().is_none());
        assert_eq!(failure.describe(), "Executable 'binary1' is unexpectedly missing");
    }

    #[test]
    fn test_timeout_message() {
        let failure = CaseFailure::TimedOut {
            path: PathBuf::from("slow"),
            after: Duration::from_millis(1500),
        };
        assert_eq!(failure.to_string(), "'slow' timed out after 1.5s");
    }
}
