//! Integration test: run the checked-in `speckit.yaml` suite against the
//! repository's schemas, fixtures and API description.

use std::path::PathBuf;

use skt_cli::check::build_suite;
use skt_cli::config::{Expectation, SuiteConfig, CONFIG_FILE_NAME};

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn repo_config() -> SuiteConfig {
    SuiteConfig::load(&repo_root().join(CONFIG_FILE_NAME)).expect("failed to load speckit.yaml")
}

#[test]
fn test_repository_config_is_well_formed() {
    let config = repo_config();
    assert!(config.schema_path().is_file(), "{}", config.schema_path().display());
    assert!(config.fixtures_path().is_dir(), "{}", config.fixtures_path().display());
    assert!(config
        .required_fixtures
        .iter()
        .any(|f| f == "sample-user.json"));
    assert!(config
        .cases
        .iter()
        .any(|c| c.fixture == "sample-user.json" && c.expect == Expectation::Valid));
}

#[test]
fn test_repository_suite_passes() {
    let config = repo_config();
    let report = build_suite(&config).run(config.timeout());

    let failures: Vec<String> = report
        .failures()
        .map(|r| format!("{} {}: {:?}", r.outcome, r.name, r.outcome))
        .collect();
    assert!(
        failures.is_empty(),
        "{} of {} checks failed:\n{}",
        failures.len(),
        report.total(),
        failures.join("\n")
    );
}

#[test]
fn test_discover_from_nested_directory_finds_repository_config() {
    let config = SuiteConfig::discover(&repo_root().join("crates/skt-cli/src")).unwrap();
    assert_eq!(config.base_dir(), repo_root());
}
