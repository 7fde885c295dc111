//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::{Manifest, MissingPolicy, RunConfig};
use crate::report::{ConsoleReporter, JsonReporter, JunitReporter, MultiReporter, TestReporter};
use crate::runner::{ProcessExecutor, Runner};
use crate::suite::{ExecutableSpec, ExecutableSuite};

use super::{CliResult, ExitCode, OutputFormat, Selection};

/// Flags of the `run` subcommand.
#[derive(Debug, Clone)]
pub struct RunFlags {
    pub verbose: bool,
    pub stop_on_fail: bool,
    pub filter: Option<String>,
    pub exact: bool,
    pub timeout: Option<u64>,
    pub missing: Option<MissingPolicy>,
    pub format: OutputFormat,
    pub junit: Option<PathBuf>,
}

impl RunFlags {
    fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new()
            .with_verbose(self.verbose)
            .with_stop_on_fail(self.stop_on_fail)
            .with_exact(self.exact);
        if let Some(filter) = &self.filter {
            config = config.with_filter(filter.clone());
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(policy) = self.missing {
            config = config.with_missing(policy);
        }
        config
    }
}

/// Build the suite described by the selection, along with the manifest it came from (if any).
pub fn load_suite(selection: &Selection) -> CliResult<(ExecutableSuite, Option<Manifest>)> {
    if let Some(path) = &selection.manifest {
        let manifest = Manifest::load(path)?;
        let root = selection.root.clone().unwrap_or_else(|| manifest.root.clone());
        let suite = match &manifest.executables {
            Some(specs) => ExecutableSuite::from_specs(root, specs.iter().cloned())?,
            None => ExecutableSuite::discover(root)?,
        };
        return Ok((suite, Some(manifest)));
    }

    let root = selection.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let suite = if selection.names.is_empty() {
        ExecutableSuite::discover(root)?
    } else {
        ExecutableSuite::from_specs(root, selection.names.iter().map(|n| ExecutableSpec::new(n.as_str())))?
    };
    Ok((suite, None))
}

/// Run the selected executables and report the results.
pub fn run_executables(selection: &Selection, flags: RunFlags) -> CliResult<ExitCode> {
    let (suite, manifest) = load_suite(selection)?;

    let mut config = flags.run_config();
    if let Some(manifest) = &manifest {
        config = manifest.apply_defaults(config, flags.missing.is_some());
    }
    tracing::debug!(root = %suite.root().display(), cases = suite.len(), ?config, "starting run");

    let executor = ProcessExecutor::new(config.timeout)?;

    let mut reporter = MultiReporter::new();
    match flags.format {
        OutputFormat::Console => reporter.push(Box::new(ConsoleReporter::new(config.verbose))),
        OutputFormat::Json => reporter.push(Box::new(JsonReporter::new())),
    }
    if let Some(path) = &flags.junit {
        reporter.push(Box::new(JunitReporter::new(path)));
    }

    let summary = Runner::new(config).run(&suite, &executor, &mut reporter);
    reporter.finish()?;

    Ok(ExitCode(summary.exit_code()))
}

/// Print the case ids a run would report, one per line.
pub fn list_cases(selection: &Selection) -> CliResult<ExitCode> {
    let (suite, _) = load_suite(selection)?;
    let runner = Runner::default();
    for id in runner.planned_ids(&suite) {
        println!("{id}");
    }
    Ok(ExitCode::SUCCESS)
}
