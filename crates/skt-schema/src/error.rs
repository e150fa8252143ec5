//! # Error Types
//!
//! Failures that stop an operation from producing a result. A document
//! that does not conform to its schema is *not* an error: that outcome is
//! carried as data in [`crate::ValidationResult`].

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error loading a schema, a candidate document, or a fixture directory.
#[derive(Error, Debug)]
pub enum FixtureError {
    /// The file or directory does not exist.
    #[error("not found: {}", .path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The content is not well-formed JSON (or YAML, for `.yaml` files).
    #[error("parse error in '{}': {reason}", .path.display())]
    Parse {
        /// Path of the malformed document.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// The document parsed but is not a usable JSON Schema.
    #[error("schema compile error for '{}': {reason}", .path.display())]
    SchemaCompile {
        /// Path of the schema file.
        path: PathBuf,
        /// Compiler message.
        reason: String,
    },

    /// Any other filesystem failure.
    #[error("io error on '{}': {source}", .path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl FixtureError {
    /// Map an IO error to `NotFound` when the kind says so, `Io` otherwise.
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FixtureError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FixtureError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Returns true for [`FixtureError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, FixtureError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = FixtureError::from_io(
            Path::new("missing.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "not found: missing.json");
    }

    #[test]
    fn other_io_kinds_stay_io() {
        let err = FixtureError::from_io(
            Path::new("locked.json"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, FixtureError::Io { .. }));
        assert!(err.to_string().starts_with("io error on 'locked.json'"));
    }

    #[test]
    fn parse_error_display_includes_reason() {
        let err = FixtureError::Parse {
            path: PathBuf::from("bad.json"),
            reason: "expected value at line 1 column 1".to_string(),
        };
        assert!(err.to_string().contains("bad.json"));
        assert!(err.to_string().contains("line 1 column 1"));
    }
}
