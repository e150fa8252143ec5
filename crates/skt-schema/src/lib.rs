//! # skt-schema — Fixture Validation
//!
//! Loads a JSON Schema, validates candidate documents against it, and
//! checks fixture files for structural consistency. Schema semantics
//! (compilation, formats, error messages) come from the `jsonschema`
//! crate; this crate only wires files to it and shapes the results.
//!
//! ## Operations
//!
//! - [`load_schema`] — read and compile a schema file.
//! - [`validate`] — check one candidate; failure is a
//!   [`ValidationResult`], never an `Err`.
//! - [`list_fixtures`] — file names in a fixture directory.
//! - [`check_fixture_dir`] — non-empty, required samples present, every
//!   `.json` parses.
//! - [`check_api_spec`] — raw-text marker check on an OpenAPI file.
//!
//! ```no_run
//! use skt_schema::{load_document, load_schema, validate};
//!
//! let schema = load_schema("schemas/user.schema.json")?;
//! let user = load_document("test-data/sample-user.json")?;
//! let result = validate(&schema, &user);
//! assert!(result.valid, "{result}");
//! # Ok::<(), skt_schema::FixtureError>(())
//! ```

pub mod api_spec;
pub mod document;
pub mod error;
pub mod fixtures;
pub mod validate;

pub use api_spec::{check_api_spec, check_api_spec_text, ApiSpecReport, API_SPEC_MARKERS};
pub use document::load_document;
pub use error::FixtureError;
pub use fixtures::{check_fixture_dir, list_fixtures, FixtureDirReport, MalformedFixture};
pub use validate::{load_schema, validate, validate_file, SchemaDocument, ValidationResult, Violation};
