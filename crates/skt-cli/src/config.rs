//! # Run Configuration
//!
//! `speckit.yaml` names the schema, the fixture directory, the API
//! description, and the cases `skt check` runs. Every field is optional.
//! Relative paths resolve against the directory holding the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up by [`SuiteConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "speckit.yaml";

/// Default per-check timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Expected outcome of validating a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Valid,
    Invalid,
}

/// One fixture and the outcome it must produce.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CaseConfig {
    /// File name inside `fixtures_dir`.
    pub fixture: String,
    /// Whether the fixture must pass or fail.
    pub expect: Expectation,
    /// For `invalid` cases, a JSON Pointer at or below which a violation
    /// must be reported.
    #[serde(default)]
    pub expect_error_path: Option<String>,
}

/// Parsed `speckit.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    pub schema: PathBuf,
    pub fixtures_dir: PathBuf,
    pub required_fixtures: Vec<String>,
    pub api_spec: Option<PathBuf>,
    /// Per-check timeout; `0` disables it.
    pub timeout_ms: u64,
    /// Diagnostic lines containing this token are dropped from error
    /// output. Empty disables filtering.
    pub suppress_token: String,
    pub cases: Vec<CaseConfig>,

    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("schemas/user.schema.json"),
            fixtures_dir: PathBuf::from("test-data"),
            required_fixtures: vec!["sample-user.json".to_string()],
            api_spec: Some(PathBuf::from("api-specs/sample-api.yaml")),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            suppress_token: "Warning".to_string(),
            cases: vec![CaseConfig {
                fixture: "sample-user.json".to_string(),
                expect: Expectation::Valid,
                expect_error_path: None,
            }],
            base_dir: PathBuf::new(),
        }
    }
}

impl SuiteConfig {
    /// Defaults, with relative paths anchored at `base_dir`.
    pub fn defaults_at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from YAML text.
    ///
    /// Rejects cases that set `expect_error_path` on a `valid` expectation.
    pub fn from_yaml(text: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        let mut config: Self = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(text).context("invalid run configuration")?
        };
        for case in &config.cases {
            if case.expect == Expectation::Valid && case.expect_error_path.is_some() {
                bail!(
                    "case '{}': expect_error_path only applies to `expect: invalid`",
                    case.fixture
                );
            }
        }
        config.base_dir = base_dir.into();
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let config = Self::from_yaml(&text, base_dir)
            .with_context(|| format!("in {}", path.display()))?;
        tracing::debug!(config = %path.display(), cases = config.cases.len(), "loaded run configuration");
        Ok(config)
    }

    /// Walk up from `start` to the first directory holding
    /// [`CONFIG_FILE_NAME`] and load it. Falls back to defaults anchored at
    /// `start` when none is found.
    pub fn discover(start: &Path) -> Result<Self> {
        Self::discover_within(start, None)
    }

    /// Like [`Self::discover`], but never looks above `ceiling`.
    ///
    /// `ceiling` itself is searched. A `start` outside `ceiling` searches
    /// all the way up.
    pub fn discover_within(start: &Path, ceiling: Option<&Path>) -> Result<Self> {
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::load(&candidate);
            }
            if ceiling == Some(dir) {
                break;
            }
        }
        tracing::debug!(start = %start.display(), "no {CONFIG_FILE_NAME} found; using defaults");
        Ok(Self::defaults_at(start))
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a configured path against [`Self::base_dir`].
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    /// Resolve a path given on the command line.
    ///
    /// Absolute paths pass through. A relative path is taken from
    /// [`Self::base_dir`] when something exists there, and from the working
    /// directory otherwise.
    pub fn resolve_arg(&self, path: &Path) -> PathBuf {
        Some(self.resolve(path))
            .filter(|anchored| path.is_relative() && anchored.exists())
            .unwrap_or_else(|| path.to_path_buf())
    }

    pub fn schema_path(&self) -> PathBuf {
        self.resolve(&self.schema)
    }

    pub fn fixtures_path(&self) -> PathBuf {
        self.resolve(&self.fixtures_dir)
    }

    pub fn api_spec_path(&self) -> Option<PathBuf> {
        self.api_spec.as_deref().map(|p| self.resolve(p))
    }

    /// `None` when the timeout is disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }

    /// The suppression token, or `None` when filtering is off.
    pub fn suppress_token(&self) -> Option<&str> {
        Some(self.suppress_token.as_str()).filter(|t| !t.is_empty())
    }
}
