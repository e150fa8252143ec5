//! # Fixtures Subcommand
//!
//! Lists a fixture directory and checks it for consistency.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use skt_schema::check_fixture_dir;

use crate::config::SuiteConfig;
use crate::report::Reporter;

/// Arguments for the `skt fixtures` subcommand.
#[derive(Args, Debug)]
pub struct FixturesArgs {
    /// Fixture directory. Defaults to the configured one.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// File that must be present. Repeatable; defaults to the configured
    /// required fixtures.
    #[arg(long = "require", value_name = "NAME")]
    pub require: Vec<String>,
}

/// Execute the fixtures subcommand.
///
/// Returns exit code: 0 if the directory is consistent, 1 otherwise.
pub fn run_fixtures(args: &FixturesArgs, config: &SuiteConfig) -> Result<u8> {
    let dir = match &args.dir {
        Some(dir) => config.resolve_arg(dir),
        None => config.fixtures_path(),
    };
    let required = if args.require.is_empty() {
        config.required_fixtures.as_slice()
    } else {
        args.require.as_slice()
    };

    let mut reporter = Reporter::stdio(config.suppress_token());
    let consistent = report_fixture_dir(&dir, required, &mut reporter)?;
    reporter.flush()?;

    Ok(if consistent { 0 } else { 1 })
}

/// List the directory and print its problems. Returns true if consistent.
pub fn report_fixture_dir<O: Write, E: Write>(
    dir: &Path,
    required: &[String],
    reporter: &mut Reporter<O, E>,
) -> Result<bool> {
    let report = check_fixture_dir(dir, required)
        .with_context(|| format!("cannot check fixture directory {}", dir.display()))?;

    reporter.line(format!("Fixtures in {}:", dir.display()))?;
    for file in &report.files {
        reporter.line(format!("  {file}"))?;
    }
    for problem in report.problems() {
        reporter.error(format!("  FAIL: {problem}"))?;
    }
    reporter.line(format!(
        "{} file(s), {} JSON, {}",
        report.files.len(),
        report.json_count(),
        if report.is_consistent() { "consistent" } else { "inconsistent" }
    ))?;

    Ok(report.is_consistent())
}
