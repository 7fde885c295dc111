//! Test-runner entry point for `harness = false` test targets.
//!
//! A test target registers its executables and hands the suite to [`harness_main`], which is called once per test
//! binary:
//!
//! ```rust,no_run
//! use exetest::ExecutableSuite;
//!
//! const EXECUTABLES: &[&str] = &["binary1", "binary2"];
//!
//! fn main() {
//!     exetest::harness_main(ExecutableSuite::create_executable_tests(
//!         env!("CARGO_MANIFEST_DIR"),
//!         Some(EXECUTABLES),
//!     ));
//! }
//! ```
//!
//! Arguments follow libtest closely enough for `cargo test` to drive the binary: an optional name filter,
//! `--exact`, `--skip`, `--list`, `--format`, `--quiet`. The rest of libtest's flags are declared so the arguments
//! after them still parse; flags outside that set are ignored.

use std::process;

use clap::{Parser, ValueEnum};
use exetest_core::status;

use crate::config::RunConfig;
use crate::error::SuiteResult;
use crate::report::{ConsoleReporter, JsonReporter, TestReporter};
use crate::runner::{ProcessExecutor, Runner};
use crate::suite::ExecutableSuite;

/// Output format accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum HarnessFormat {
    #[default]
    Pretty,
    Terse,
    Json,
}

/// libtest-compatible arguments.
#[derive(Parser, Debug, Default)]
#[command(name = "exetest-harness", ignore_errors = true)]
pub struct HarnessArgs {
    /// Run only cases whose id contains FILTER
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,

    /// Match FILTER and --skip patterns against the whole case id
    #[arg(long)]
    pub exact: bool,

    /// Skip cases whose id contains PATTERN (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub skip: Vec<String>,

    /// List case ids instead of running them
    #[arg(long)]
    pub list: bool,

    /// Only run ignored cases (there are none, so nothing runs)
    #[arg(long)]
    pub ignored: bool,

    #[arg(long, value_enum)]
    pub format: Option<HarnessFormat>,

    #[arg(short, long)]
    pub quiet: bool,

    /// Accepted for compatibility; output is always captured
    #[arg(long)]
    pub nocapture: bool,

    /// Accepted for compatibility; cases always run one at a time
    #[arg(long = "test-threads", value_name = "N")]
    pub test_threads: Option<usize>,

    /// Accepted for compatibility
    #[arg(long = "show-output")]
    pub show_output: bool,

    /// Accepted for compatibility
    #[arg(long, value_name = "auto|always|never")]
    pub color: Option<String>,

    /// Unstable libtest options, accepted and ignored
    #[arg(short = 'Z', value_name = "OPT", hide = true)]
    pub unstable: Vec<String>,

    /// Run ignored and non-ignored cases; there are no ignored cases
    #[arg(long = "include-ignored", hide = true)]
    pub include_ignored: bool,

    #[arg(long, hide = true)]
    pub test: bool,

    #[arg(long, hide = true)]
    pub bench: bool,

    #[arg(long = "report-time", hide = true)]
    pub report_time: bool,

    #[arg(long, hide = true)]
    pub shuffle: bool,

    #[arg(long = "shuffle-seed", value_name = "SEED", hide = true)]
    pub shuffle_seed: Option<u64>,

    #[arg(long, value_name = "PATH", hide = true)]
    pub logfile: Option<String>,
}

impl HarnessArgs {
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::new().with_exact(self.exact).with_verbose(!self.quiet);
        if let Some(filter) = &self.filter {
            config = config.with_filter(filter.clone());
        }
        for pattern in &self.skip {
            config = config.with_skip(pattern.clone());
        }
        config
    }
}

/// Run `suite` under the arguments of the current process and exit.
///
/// Exits with 0 when every case passed and 1 otherwise, including when the suite could not be built.
pub fn harness_main(suite: SuiteResult<ExecutableSuite>) -> ! {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args = HarnessArgs::parse();
    let code = match suite {
        Ok(suite) => run_harness(&suite, &args),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            status::EXIT_FAILURE
        }
    };
    process::exit(code);
}

/// Run or list `suite` according to `args` and return the process exit code.
pub fn run_harness(suite: &ExecutableSuite, args: &HarnessArgs) -> i32 {
    let runner = Runner::new(args.run_config());

    if args.list {
        let ids = if args.ignored { Vec::new() } else { runner.planned_ids(suite) };
        for id in &ids {
            println!("{id}: test");
        }
        if args.format != Some(HarnessFormat::Terse) {
            println!();
            println!("{} tests, 0 benchmarks", ids.len());
        }
        return status::EXIT_SUCCESS;
    }

    if args.ignored {
        return status::EXIT_SUCCESS;
    }

    let executor = match ProcessExecutor::new(None) {
        Ok(executor) => executor,
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            return status::EXIT_FAILURE;
        }
    };

    let mut reporter: Box<dyn TestReporter> = match args.format.unwrap_or_default() {
        HarnessFormat::Json => Box::new(JsonReporter::new()),
        HarnessFormat::Pretty | HarnessFormat::Terse => Box::new(ConsoleReporter::new(!args.quiet)),
    };
    let summary = runner.run(suite, &executor, reporter.as_mut());
    if let Err(err) = reporter.finish() {
        eprintln!("{:?}", miette::Report::new(err));
        return status::EXIT_FAILURE;
    }
    summary.exit_code()
}
