//! # Check Subcommand
//!
//! Runs the fixture suite described by the run configuration:
//!
//! 1. the schema loads;
//! 2. every configured case validates (or fails) as expected;
//! 3. the fixture directory is consistent;
//! 4. the API description, if configured, carries its markers.
//!
//! The schema is loaded once, inside the "schema loads" check so the
//! per-check timeout covers it, and shared with the case checks. A load
//! that failed or has not finished makes every case check fail.

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::Result;
use clap::Args;

use skt_schema::{check_api_spec, check_fixture_dir, load_schema, validate_file, SchemaDocument};

use crate::config::{CaseConfig, Expectation, SuiteConfig};
use crate::report::Reporter;
use crate::suite::{Outcome, Suite, SuiteReport};

/// Arguments for the `skt check` subcommand.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when every check passed, 1 otherwise.
pub fn run_check(args: &CheckArgs, config: &SuiteConfig) -> Result<u8> {
    let mut reporter = Reporter::stdio(config.suppress_token());
    let report = build_suite(config).run(config.timeout());

    if args.json {
        reporter.line(serde_json::to_string_pretty(&report)?)?;
    } else {
        print_report(&report, &mut reporter)?;
    }
    reporter.flush()?;

    Ok(if report.all_passed() { 0 } else { 1 })
}

/// Assemble the fixture suite from a configuration.
pub fn build_suite(config: &SuiteConfig) -> Suite {
    let schema_path = config.schema_path();
    let fixtures_dir = config.fixtures_path();

    let schema: Arc<OnceLock<LoadedSchema>> = Arc::new(OnceLock::new());

    let mut suite = Suite::new(format!("fixtures ({})", schema_path.display()));

    let slot = Arc::clone(&schema);
    let path = schema_path.clone();
    suite.add(format!("schema loads: {}", schema_path.display()), move || {
        let loaded = load_schema(&path).map(Arc::new).map_err(|e| e.to_string());
        slot.get_or_init(|| loaded).as_ref().map(|_| ()).map_err(Clone::clone)
    });

    for case in &config.cases {
        let schema = Arc::clone(&schema);
        let case = case.clone();
        let path = fixtures_dir.join(&case.fixture);
        suite.add(case_name(&case), move || {
            let schema = match schema.get() {
                Some(Ok(schema)) => schema,
                Some(Err(e)) => return Err(format!("schema unavailable: {e}")),
                None => return Err("schema unavailable: not loaded".to_string()),
            };
            run_case(schema, &case, path)
        });
    }

    let required = config.required_fixtures.clone();
    let dir = fixtures_dir.clone();
    suite.add(
        format!("fixture directory is consistent: {}", fixtures_dir.display()),
        move || {
            let report = check_fixture_dir(&dir, required.as_slice()).map_err(|e| e.to_string())?;
            if report.is_consistent() {
                Ok(())
            } else {
                Err(report.problems().join("\n"))
            }
        },
    );

    if let Some(api_spec) = config.api_spec_path() {
        suite.add(
            format!("API description has structural markers: {}", api_spec.display()),
            move || {
                let report = check_api_spec(&api_spec).map_err(|e| e.to_string())?;
                if report.is_complete() {
                    Ok(())
                } else {
                    Err(format!("missing markers: {}", report.missing_markers.join(", ")))
                }
            },
        );
    }

    tracing::debug!(checks = suite.len(), "built fixture suite");
    suite
}

type LoadedSchema = Result<Arc<SchemaDocument>, String>;

fn case_name(case: &CaseConfig) -> String {
    match case.expect {
        Expectation::Valid => format!("{} is valid", case.fixture),
        Expectation::Invalid => format!("{} is rejected", case.fixture),
    }
}

fn run_case(schema: &SchemaDocument, case: &CaseConfig, path: PathBuf) -> Result<(), String> {
    let result = validate_file(schema, &path).map_err(|e| e.to_string())?;

    match case.expect {
        Expectation::Valid if result.valid => Ok(()),
        Expectation::Valid => {
            let mut lines = vec![format!("expected valid, got {} error(s):", result.errors.len())];
            lines.extend(result.errors.iter().map(|v| format!("  {v}")));
            Err(lines.join("\n"))
        }
        Expectation::Invalid if result.valid => Err("expected validation to fail, but it passed".to_string()),
        Expectation::Invalid => match &case.expect_error_path {
            Some(pointer) if !result.has_error_at(pointer) => {
                let mut lines = vec![format!("expected a violation at '{pointer}', got:")];
                lines.extend(result.errors.iter().map(|v| format!("  {v}")));
                Err(lines.join("\n"))
            }
            _ => Ok(()),
        },
    }
}

/// Print a suite report in text form.
pub fn print_report<O: Write, E: Write>(
    report: &SuiteReport,
    reporter: &mut Reporter<O, E>,
) -> Result<()> {
    reporter.line(format!("Suite: {}", report.suite))?;
    for result in &report.results {
        reporter.line(format!(
            "  {} {} ({} ms)",
            result.outcome, result.name, result.elapsed_ms
        ))?;
    }

    for result in report.failures() {
        reporter.error(format!("\n{} {}", result.outcome, result.name))?;
        match &result.outcome {
            Outcome::Failed(reason) => {
                for line in reason.lines() {
                    reporter.error(format!("    {line}"))?;
                }
            }
            Outcome::TimedOut => reporter.error("    exceeded the per-check timeout")?,
            Outcome::Passed => {}
        }
    }

    reporter.line(format!(
        "\nChecks: {}/{} passed",
        report.passed(),
        report.total()
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const USER_SCHEMA: &str = r#"{
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["id", "email", "name"],
        "properties": {
            "id": { "type": "integer" },
            "email": { "type": "string", "format": "email" },
            "name": { "type": "string", "minLength": 1 },
            "roles": { "type": "array", "items": { "enum": ["admin", "user", "moderator"] } }
        }
    }"#;

    fn workspace(root: &Path) {
        std::fs::create_dir_all(root.join("schemas")).unwrap();
        std::fs::create_dir_all(root.join("test-data")).unwrap();
        std::fs::create_dir_all(root.join("api-specs")).unwrap();
        std::fs::write(root.join("schemas/user.schema.json"), USER_SCHEMA).unwrap();
        std::fs::write(
            root.join("test-data/sample-user.json"),
            r#"{"id": 1, "email": "a@example.com", "name": "A"}"#,
        )
        .unwrap();
        std::fs::write(
            root.join("test-data/bad-role.json"),
            r#"{"id": 2, "email": "b@example.com", "name": "B", "roles": ["invalid_role"]}"#,
        )
        .unwrap();
        std::fs::write(
            root.join("api-specs/sample-api.yaml"),
            "openapi: 3.0.3\ninfo:\n  title: t\npaths: {}\n",
        )
        .unwrap();
    }

    fn config_at(root: &Path, yaml: &str) -> SuiteConfig {
        SuiteConfig::from_yaml(yaml, root).unwrap()
    }

    #[test]
    fn default_suite_passes_on_consistent_workspace() {
        let dir = tempfile::tempdir().unwrap();
        workspace(dir.path());
        let config = SuiteConfig::defaults_at(dir.path());

        let suite = build_suite(&config);
        assert_eq!(suite.len(), 4);
        let report = suite.run(config.timeout());
        assert!(report.all_passed(), "{report:#?}");
    }

    #[test]
    fn invalid_case_with_error_path() {
        let dir = tempfile::tempdir().unwrap();
        workspace(dir.path());
        let config = config_at(
            dir.path(),
            "cases:\n  - fixture: bad-role.json\n    expect: invalid\n    expect_error_path: /roles\n",
        );

        let report = build_suite(&config).run(None);
        assert!(report.all_passed(), "{report:#?}");
    }

    #[test]
    fn wrong_expectation_fails_only_that_case() {
        let dir = tempfile::tempdir().unwrap();
        workspace(dir.path());
        let config = config_at(
            dir.path(),
            "cases:\n  - fixture: bad-role.json\n    expect: valid\n  - fixture: sample-user.json\n    expect: invalid\n",
        );

        let report = build_suite(&config).run(None);
        let failed: Vec<&str> = report.failures().map(|r| r.name.as_str()).collect();
        assert_eq!(failed, vec!["bad-role.json is valid", "sample-user.json is rejected"]);

        match &report.results[1].outcome {
            Outcome::Failed(reason) => assert!(reason.contains("/roles/0"), "got: {reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn error_path_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        workspace(dir.path());
        let config = config_at(
            dir.path(),
            "cases:\n  - fixture: bad-role.json\n    expect: invalid\n    expect_error_path: /email\n",
        );

        let report = build_suite(&config).run(None);
        assert_eq!(report.passed(), report.total() - 1);
    }

    #[test]
    fn missing_schema_fails_schema_and_case_checks() {
        let dir = tempfile::tempdir().unwrap();
        workspace(dir.path());
        std::fs::remove_file(dir.path().join("schemas/user.schema.json")).unwrap();
        let config = SuiteConfig::defaults_at(dir.path());

        let report = build_suite(&config).run(None);
        assert!(!report.results[0].outcome.is_passed());
        match &report.results[1].outcome {
            Outcome::Failed(reason) => assert!(reason.starts_with("schema unavailable")),
            other => panic!("expected failure, got {other:?}"),
        }
        // Directory and API checks still run and pass.
        assert!(report.results[2].outcome.is_passed());
        assert!(report.results[3].outcome.is_passed());
    }

    #[test]
    fn schema_is_read_when_the_suite_runs() {
        let dir = tempfile::tempdir().unwrap();
        workspace(dir.path());
        let schema = dir.path().join("schemas/user.schema.json");
        std::fs::remove_file(&schema).unwrap();
        let config = SuiteConfig::defaults_at(dir.path());

        let suite = build_suite(&config);
        std::fs::write(&schema, USER_SCHEMA).unwrap();

        let report = suite.run(config.timeout());
        assert!(report.all_passed(), "{report:#?}");
    }

    #[test]
    fn missing_fixture_directory_fails_consistency_check() {
        let dir = tempfile::tempdir().unwrap();
        workspace(dir.path());
        let config = config_at(dir.path(), "fixtures_dir: nowhere\ncases: []\napi_spec: null\n");

        let report = build_suite(&config).run(None);
        assert_eq!(report.total(), 2);
        match &report.results[1].outcome {
            Outcome::Failed(reason) => assert!(reason.starts_with("not found"), "got: {reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn text_report_routes_failures_to_error_output() {
        let mut suite = Suite::new("demo");
        suite
            .add("ok", || Ok(()))
            .add("bad", || Err("/email: not an email\nWarning: noisy".to_string()));
        let report = suite.run(None);

        let mut reporter = Reporter::new(Vec::new(), Vec::new(), Some("Warning"));
        print_report(&report, &mut reporter).unwrap();
        let (out, err) = reporter.into_inner();
        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();

        assert!(out.contains("PASS ok"));
        assert!(out.contains("FAIL bad"));
        assert!(out.contains("Checks: 1/2 passed"));
        assert!(err.contains("/email: not an email"));
        assert!(!err.contains("noisy"));
    }
}
