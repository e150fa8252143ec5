//! # skt CLI entry point
//!
//! Parses command-line arguments, loads the run configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skt_cli::api_spec::{run_api_spec, ApiSpecArgs};
use skt_cli::check::{run_check, CheckArgs};
use skt_cli::config::SuiteConfig;
use skt_cli::fixtures::{run_fixtures, FixturesArgs};
use skt_cli::validate::{run_validate, ValidateArgs};

/// SpecKit fixture checks.
///
/// Validates JSON fixtures against a JSON Schema, checks fixture
/// directories for consistency, and confirms API descriptions carry their
/// structural markers.
#[derive(Parser, Debug)]
#[command(name = "skt", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the run configuration. Defaults to the nearest speckit.yaml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every configured fixture check.
    Check(CheckArgs),

    /// Validate documents against a JSON Schema.
    Validate(ValidateArgs),

    /// List a fixture directory and check it for consistency.
    Fixtures(FixturesArgs),

    /// Check an OpenAPI description for its top-level markers.
    ApiSpec(ApiSpecArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("skt v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = load_config(cli.config.as_ref())?;
    tracing::debug!(base_dir = %config.base_dir().display(), "resolved run configuration");

    match cli.command {
        Commands::Check(args) => run_check(&args, &config),
        Commands::Validate(args) => run_validate(&args, &config),
        Commands::Fixtures(args) => run_fixtures(&args, &config),
        Commands::ApiSpec(args) => run_api_spec(&args, &config),
    }
}

fn load_config(explicit: Option<&PathBuf>) -> Result<SuiteConfig> {
    match explicit {
        Some(path) => SuiteConfig::load(path),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            SuiteConfig::discover(&cwd)
        }
    }
}
