//! # Document Loading
//!
//! Reads candidate documents and schemas from disk into the JSON value
//! model. JSON is the default; files ending in `.yaml` or `.yml` are read
//! as YAML straight into the same model, so YAML fixtures validate exactly
//! like their JSON equivalents.

use std::path::Path;

use serde_json::Value;

use crate::error::FixtureError;

/// Read a file to a string, distinguishing a missing path from other IO
/// failures.
pub(crate) fn read_text(path: &Path) -> Result<String, FixtureError> {
    std::fs::read_to_string(path).map_err(|e| FixtureError::from_io(path, e))
}

/// Returns true if the path has a `.yaml` or `.yml` extension.
pub fn is_yaml_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Load a JSON or YAML document into a [`serde_json::Value`].
///
/// # Errors
///
/// - [`FixtureError::NotFound`] if `path` does not exist.
/// - [`FixtureError::Parse`] if the content is not well-formed.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value, FixtureError> {
    let path = path.as_ref();
    let content = read_text(path)?;

    let value = if is_yaml_path(path) {
        parse_yaml(path, &content)?
    } else {
        serde_json::from_str(&content).map_err(|e| FixtureError::Parse {
            path: path.to_path_buf(),
            reason: format!("invalid JSON: {e}"),
        })?
    };

    tracing::debug!(path = %path.display(), "loaded document");
    Ok(value)
}

fn parse_yaml(path: &Path, content: &str) -> Result<Value, FixtureError> {
    serde_yaml::from_str(content).map_err(|e| FixtureError::Parse {
        path: path.to_path_buf(),
        reason: format!("invalid YAML: {e}"),
    })
}
