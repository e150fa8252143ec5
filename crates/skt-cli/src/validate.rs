//! # Validate Subcommand
//!
//! Validates one or more JSON/YAML documents against a schema and prints
//! every violation with its field path.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use skt_schema::{load_schema, validate_file, SchemaDocument, ValidationResult};

use crate::config::SuiteConfig;
use crate::report::Reporter;

/// Arguments for the `skt validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema to validate against. Defaults to the configured schema.
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    /// Documents to validate (.json, .yaml, .yml).
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 if every document is valid, 1 otherwise. A
/// document that cannot be loaded counts as a failure; a schema that cannot
/// be loaded is an error.
pub fn run_validate(args: &ValidateArgs, config: &SuiteConfig) -> Result<u8> {
    let schema_path = match &args.schema {
        Some(path) => config.resolve_arg(path),
        None => config.schema_path(),
    };
    let schema = load_schema(&schema_path)
        .with_context(|| format!("failed to load schema {}", schema_path.display()))?;

    let mut reporter = Reporter::stdio(config.suppress_token());
    let failed = validate_files(&schema, &args.files, args.json, &mut reporter)?;
    reporter.flush()?;

    Ok(if failed == 0 { 0 } else { 1 })
}

/// Validate each file and report. Returns the number of files that failed.
pub fn validate_files<O: Write, E: Write>(
    schema: &SchemaDocument,
    files: &[PathBuf],
    json: bool,
    reporter: &mut Reporter<O, E>,
) -> Result<usize> {
    let mut failed = 0usize;
    let mut results = Vec::new();

    for file in files {
        match validate_file(schema, file) {
            Ok(result) => {
                if !result.valid {
                    failed += 1;
                }
                if !json {
                    print_result(file, &result, reporter)?;
                }
                results.push(FileResult {
                    file: file.clone(),
                    result,
                });
            }
            Err(e) => {
                failed += 1;
                reporter.error(format!("ERROR {}: {e}", file.display()))?;
            }
        }
    }

    if json {
        reporter.line(serde_json::to_string_pretty(&results)?)?;
    } else {
        reporter.line(format!(
            "Documents: {}/{} valid",
            files.len() - failed,
            files.len()
        ))?;
    }
    Ok(failed)
}

fn print_result<O: Write, E: Write>(
    file: &Path,
    result: &ValidationResult,
    reporter: &mut Reporter<O, E>,
) -> Result<()> {
    if result.valid {
        reporter.line(format!("PASS {}", file.display()))?;
    } else {
        reporter.line(format!("FAIL {}", file.display()))?;
        for violation in &result.errors {
            reporter.error(format!("  {violation}"))?;
        }
    }
    Ok(())
}
