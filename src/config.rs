//! Run configuration and the optional TOML manifest.
//!
//! A manifest replaces the literal executable list when the list should live next to the binaries instead of in a
//! test target:
//!
//! ```toml
//! root = "target/debug"
//! timeout_secs = 30
//! missing = "skip"
//! executables = ["binary1", { name = "binary2", args = ["--quiet"] }]
//! ```
//!
//! Omitting `executables` selects discovery. `root` is resolved against the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{SuiteError, SuiteResult};
use crate::suite::ExecutableSpec;

/// What to do with a case whose executable cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Report the case as failed.
    #[default]
    Fail,
    /// Report the case as skipped.
    Skip,
}

/// Options controlling a single run of a suite.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Only run cases whose id contains this keyword (or equals it with `exact`)
    pub filter: Option<String>,
    /// Never run cases matching any of these
    pub skip: Vec<String>,
    /// Match `filter` and `skip` against the whole id
    pub exact: bool,
    /// Stop after the first failing case
    pub stop_on_fail: bool,
    /// Print per-case timings and captured output of passing cases
    pub verbose: bool,
    /// Kill an executable that runs longer than this
    pub timeout: Option<Duration>,
    pub missing: MissingPolicy,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_skip(mut self, pattern: impl Into<String>) -> Self {
        self.skip.push(pattern.into());
        self
    }

    pub fn with_exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn with_stop_on_fail(mut self, stop: bool) -> Self {
        self.stop_on_fail = stop;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_missing(mut self, policy: MissingPolicy) -> Self {
        self.missing = policy;
        self
    }

    /// Check whether a case id is selected by the filter and not excluded by `skip`.
    pub fn selects(&self, id: &str) -> bool {
        let matches_id = |pattern: &str| if self.exact { id == pattern } else { id.contains(pattern) };
        if self.skip.iter().any(|pattern| matches_id(pattern)) {
            return false;
        }
        self.filter.as_deref().is_none_or(matches_id)
    }
}

/// One entry of the manifest's `executables` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum ManifestEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl From<ManifestEntry> for ExecutableSpec {
    fn from(entry: ManifestEntry) -> Self {
        match entry {
            ManifestEntry::Name(name) => ExecutableSpec::new(name),
            ManifestEntry::Detailed { name, args } => ExecutableSpec::new(name).with_args(args),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    root: Option<PathBuf>,
    timeout_secs: Option<u64>,
    missing: Option<MissingPolicy>,
    executables: Option<Vec<ManifestEntry>>,
}

/// A parsed manifest with `root` already resolved.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub root: PathBuf,
    pub timeout: Option<Duration>,
    pub missing: Option<MissingPolicy>,
    /// `None` selects discovery
    pub executables: Option<Vec<ExecutableSpec>>,
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> SuiteResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| SuiteError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, manifest_dir(path)).map_err(|source| SuiteError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse manifest text, resolving a relative `root` against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let raw: RawManifest = toml::from_str(text)?;
        let root = match raw.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        };
        Ok(Self {
            root,
            timeout: raw.timeout_secs.map(Duration::from_secs),
            missing: raw.missing,
            executables: raw
                .executables
                .map(|entries| entries.into_iter().map(ExecutableSpec::from).collect()),
        })
    }

    /// Layer the manifest's run options under `config`; values already set in `config` win.
    pub fn apply_defaults(&self, mut config: RunConfig, missing_overridden: bool) -> RunConfig {
        if config.timeout.is_none() {
            config.timeout = self.timeout;
        }
        if !missing_overridden {
            if let Some(policy) = self.missing {
                config.missing = policy;
            }
        }
        config
    }
}

/// Directory a manifest's relative paths are resolved against.
fn manifest_dir(path: &Path) -> &Path {
    path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
}
