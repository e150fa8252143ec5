//! # API Spec Subcommand
//!
//! Checks an OpenAPI description for its top-level markers.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use skt_schema::{check_api_spec, API_SPEC_MARKERS};

use crate::config::SuiteConfig;
use crate::report::Reporter;

/// Arguments for the `skt api-spec` subcommand.
#[derive(Args, Debug)]
pub struct ApiSpecArgs {
    /// API description file. Defaults to the configured one.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Execute the api-spec subcommand.
///
/// Returns exit code: 0 if every marker is present, 1 otherwise.
pub fn run_api_spec(args: &ApiSpecArgs, config: &SuiteConfig) -> Result<u8> {
    let path = match (&args.file, config.api_spec_path()) {
        (Some(file), _) => config.resolve_arg(file),
        (None, Some(configured)) => configured,
        (None, None) => bail!("no API description given and none configured"),
    };

    let report = check_api_spec(&path)
        .with_context(|| format!("cannot check API description {}", path.display()))?;

    let mut reporter = Reporter::stdio(config.suppress_token());
    for marker in API_SPEC_MARKERS {
        if report.missing_markers.contains(&marker) {
            reporter.error(format!("  missing: {marker}"))?;
        } else {
            reporter.line(format!("  found:   {marker}"))?;
        }
    }
    reporter.line(format!(
        "{}: {}",
        path.display(),
        if report.is_complete() { "complete" } else { "incomplete" }
    ))?;
    reporter.flush()?;

    Ok(if report.is_complete() { 0 } else { 1 })
}
