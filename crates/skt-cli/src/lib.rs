//! # skt-cli — SpecKit Fixture Runner
//!
//! The `skt` command-line interface. It reads `speckit.yaml`, runs the
//! fixture suite with a per-check timeout, and reports pass/fail with
//! field-level diagnostics.
//!
//! ## Subcommands
//!
//! - `skt check` — run every configured check.
//! - `skt validate` — validate documents against a schema.
//! - `skt fixtures` — list and check a fixture directory.
//! - `skt api-spec` — check an OpenAPI description's markers.
//!
//! ```bash
//! skt check
//! skt validate --schema schemas/user.schema.json test-data/*.json
//! skt fixtures test-data --require sample-user.json
//! skt api-spec api-specs/sample-api.yaml
//! ```

pub mod api_spec;
pub mod check;
pub mod config;
pub mod fixtures;
pub mod report;
pub mod suite;
pub mod validate;
