//! # Schema Validation
//!
//! Loads a JSON Schema once, compiles it, and checks candidate documents
//! against it.
//!
//! ## Determinism
//!
//! A [`SchemaDocument`] is immutable after [`load_schema`]. [`validate`]
//! borrows it and keeps no state between calls, so identical
//! (schema, candidate) pairs always produce identical
//! [`ValidationResult`]s and validations may run on any number of threads.
//!
//! ## Drafts and Formats
//!
//! A schema's own `$schema` keyword selects its draft. Without one, Draft 7
//! is assumed. `format` keywords (`email`, `uri`, `date-time`, ...) are
//! always asserted, never treated as annotations.
//!
//! ## Schema Resolution
//!
//! Cross-schema `$ref`s resolve to sibling files in the schema's own
//! directory, matched by file name. Nothing is fetched over the network;
//! an unresolvable reference is a compile error.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Draft, Retrieve, Uri, Validator};
use serde::Serialize;
use serde_json::Value;

use crate::document::{load_document, read_text};
use crate::error::FixtureError;

/// Resolves `$ref` URIs to schema files next to the root schema.
struct SiblingRetriever {
    base_dir: PathBuf,
}

impl Retrieve for SiblingRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if filename.is_empty() {
            return Err(format!("cannot resolve '{uri_str}' to a local schema file").into());
        }

        let candidate = self.base_dir.join(filename);
        let content = std::fs::read_to_string(&candidate).map_err(|e| {
            format!(
                "cannot resolve '{uri_str}' via {}: {e}",
                candidate.display()
            )
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// A loaded and compiled JSON Schema.
pub struct SchemaDocument {
    source: PathBuf,
    raw: Value,
    validator: Validator,
}

impl fmt::Debug for SchemaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDocument")
            .field("source", &self.source)
            .field("title", &self.title())
            .finish_non_exhaustive()
    }
}

impl SchemaDocument {
    /// Compile an in-memory schema value.
    ///
    /// `source` labels the schema in errors and anchors `$ref` resolution:
    /// sibling files are looked up in its parent directory.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::SchemaCompile`] if `raw` is not a valid schema.
    pub fn compile(source: impl Into<PathBuf>, raw: Value) -> Result<Self, FixtureError> {
        let source = source.into();
        let base_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let retriever = SiblingRetriever { base_dir };
        let built = if raw.get("$schema").is_some() {
            jsonschema::options()
                .should_validate_formats(true)
                .with_retriever(retriever)
                .build(&raw)
        } else {
            jsonschema::options()
                .with_draft(Draft::Draft7)
                .should_validate_formats(true)
                .with_retriever(retriever)
                .build(&raw)
        };

        let validator = built.map_err(|e| FixtureError::SchemaCompile {
            path: source.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source,
            raw,
            validator,
        })
    }

    /// Path (or label) the schema was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The schema's `title`, if any.
    pub fn title(&self) -> Option<&str> {
        self.raw.get("title").and_then(Value::as_str)
    }

    /// Validate a candidate. See [`validate`].
    pub fn validate(&self, candidate: &Value) -> ValidationResult {
        validate(self, candidate)
    }
}

/// Read, parse and compile a JSON Schema file.
///
/// # Errors
///
/// - [`FixtureError::NotFound`] if `path` does not exist.
/// - [`FixtureError::Parse`] if the file is not well-formed JSON.
/// - [`FixtureError::SchemaCompile`] if the JSON is not a valid schema.
pub fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument, FixtureError> {
    let path = path.as_ref();
    let content = read_text(path)?;
    let raw: Value = serde_json::from_str(&content).map_err(|e| FixtureError::Parse {
        path: path.to_path_buf(),
        reason: format!("invalid JSON: {e}"),
    })?;

    let schema = SchemaDocument::compile(path, raw)?;
    tracing::info!(
        schema = %path.display(),
        title = schema.title().unwrap_or("(untitled)"),
        "loaded schema"
    );
    Ok(schema)
}

/// A single violation with its location in the candidate and the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON Pointer to the offending value in the candidate; empty for the root.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Returns true if the violation is at `path` or inside it.
    ///
    /// `"/roles"` matches `/roles` and `/roles/0` but not `/rolesX`.
    pub fn is_under(&self, path: &str) -> bool {
        match self.instance_path.strip_prefix(path) {
            Some(rest) => rest.is_empty() || rest.starts_with('/') || path.is_empty(),
            None => false,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Outcome of validating one candidate.
///
/// `errors` is empty if and only if `valid` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the candidate conforms.
    pub valid: bool,
    /// Every violation found, in the validator's traversal order.
    pub errors: Vec<Violation>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<Violation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Returns true if any violation is at or below `path`.
    pub fn has_error_at(&self, path: &str) -> bool {
        self.errors.iter().any(|v| v.is_under(path))
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            return write!(f, "valid");
        }
        write!(f, "invalid ({} error(s))", self.errors.len())?;
        for v in &self.errors {
            write!(f, "\n  {v}")?;
        }
        Ok(())
    }
}

/// Check a candidate against a schema, collecting every violation.
///
/// Never fails: a non-conforming candidate yields `valid: false`.
pub fn validate(schema: &SchemaDocument, candidate: &Value) -> ValidationResult {
    let errors: Vec<Violation> = schema
        .validator
        .iter_errors(candidate)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    tracing::trace!(
        schema = %schema.source.display(),
        error_count = errors.len(),
        "validated candidate"
    );
    ValidationResult::from_errors(errors)
}

/// Load a JSON or YAML document from disk and validate it.
///
/// # Errors
///
/// Only loading fails; see [`load_document`].
pub fn validate_file(
    schema: &SchemaDocument,
    path: impl AsRef<Path>,
) -> Result<ValidationResult, FixtureError> {
    let candidate = load_document(path)?;
    Ok(validate(schema, &candidate))
}
