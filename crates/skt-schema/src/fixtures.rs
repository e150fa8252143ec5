//! # Fixture Directories
//!
//! Enumerates fixture files and checks that a fixture directory is
//! structurally consistent: it is not empty, it holds every required
//! sample, and each `.json` file in it parses.

use std::path::Path;

use serde::Serialize;

use crate::document::read_text;
use crate::error::FixtureError;

/// List the file names in a fixture directory, sorted.
///
/// Only regular files are returned; subdirectories are skipped and
/// symlinks count as whatever they point at. Names are bare file names,
/// not paths. Names that are not valid UTF-8 are skipped with a warning.
///
/// # Errors
///
/// - [`FixtureError::NotFound`] if `dir` does not exist.
/// - [`FixtureError::Io`] if it cannot be read.
pub fn list_fixtures(dir: impl AsRef<Path>) -> Result<Vec<String>, FixtureError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| FixtureError::from_io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FixtureError::from_io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| FixtureError::from_io(dir, e))?;
        let is_file = if file_type.is_symlink() {
            // Dangling links are not fixtures.
            std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file())
        } else {
            file_type.is_file()
        };
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => {
                tracing::warn!(dir = %dir.display(), name = ?raw, "skipping fixture with non-UTF-8 name");
            }
        }
    }
    names.sort();

    tracing::debug!(dir = %dir.display(), count = names.len(), "listed fixtures");
    Ok(names)
}

/// A `.json` fixture that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedFixture {
    /// File name within the fixture directory.
    pub file: String,
    /// Parser message.
    pub reason: String,
}

/// Result of [`check_fixture_dir`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureDirReport {
    /// Every file found, sorted.
    pub files: Vec<String>,
    /// Required names that were not present.
    pub missing: Vec<String>,
    /// `.json` files that did not parse.
    pub malformed: Vec<MalformedFixture>,
}

impl FixtureDirReport {
    /// True if the directory has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of `.json` files checked.
    pub fn json_count(&self) -> usize {
        self.files.iter().filter(|f| f.ends_with(".json")).count()
    }

    /// Non-empty, nothing missing, nothing malformed.
    pub fn is_consistent(&self) -> bool {
        !self.is_empty() && self.missing.is_empty() && self.malformed.is_empty()
    }

    /// One line per problem, empty when consistent.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.is_empty() {
            out.push("fixture directory is empty".to_string());
        }
        for name in &self.missing {
            out.push(format!("missing required fixture '{name}'"));
        }
        for m in &self.malformed {
            out.push(format!("{}: {}", m.file, m.reason));
        }
        out
    }
}

/// Check a fixture directory for consistency.
///
/// Every name in `required` must be present. Every file ending in `.json`
/// must parse as JSON; other files are listed but not parsed.
///
/// # Errors
///
/// Fails only when the directory itself cannot be listed (see
/// [`list_fixtures`]). Problems with individual files are reported in the
/// returned [`FixtureDirReport`].
pub fn check_fixture_dir<S: AsRef<str>>(
    dir: impl AsRef<Path>,
    required: &[S],
) -> Result<FixtureDirReport, FixtureError> {
    let dir = dir.as_ref();
    let files = list_fixtures(dir)?;

    let mut missing = Vec::new();
    for name in required {
        let name: &str = name.as_ref();
        if !files.iter().any(|f| f == name) {
            missing.push(name.to_string());
        }
    }

    let mut malformed = Vec::new();
    for file in files.iter().filter(|f| f.ends_with(".json")) {
        let path = dir.join(file);
        let reason = match read_text(&path) {
            Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
                Ok(_) => continue,
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };
        tracing::warn!(fixture = %path.display(), %reason, "malformed fixture");
        malformed.push(MalformedFixture {
            file: file.clone(),
            reason,
        });
    }

    Ok(FixtureDirReport {
        files,
        missing,
        malformed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_sorted_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_fixtures(dir.path()).unwrap();
        assert_eq!(files, vec!["a.json", "b.json", "notes.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_fixtures_are_listed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let shared = tempfile::tempdir().unwrap();
        std::fs::write(shared.path().join("user.json"), "{}").unwrap();
        symlink(shared.path().join("user.json"), dir.path().join("sample-user.json")).unwrap();
        symlink(shared.path(), dir.path().join("linked-dir")).unwrap();
        symlink(dir.path().join("gone.json"), dir.path().join("dangling.json")).unwrap();

        assert_eq!(list_fixtures(dir.path()).unwrap(), vec!["sample-user.json"]);

        let report = check_fixture_dir(dir.path(), &["sample-user.json"]).unwrap();
        assert!(report.is_consistent(), "problems: {:?}", report.problems());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"bad-\xff.json"));
        if std::fs::write(&odd, "{}").is_err() {
            // Some filesystems refuse non-UTF-8 names outright.
            return;
        }

        assert_eq!(list_fixtures(dir.path()).unwrap(), vec!["a.json"]);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_fixtures(dir.path().join("test-data")).unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
    }

    #[test]
    fn consistent_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sample-user.json"), r#"{"id": 1}"#).unwrap();
        std::fs::write(dir.path().join("README.md"), "# fixtures").unwrap();

        let report = check_fixture_dir(dir.path(), &["sample-user.json"]).unwrap();
        assert!(report.is_consistent(), "problems: {:?}", report.problems());
        assert_eq!(report.json_count(), 1);
        assert!(report.problems().is_empty());
    }

    #[test]
    fn empty_directory_is_inconsistent() {
        let dir = tempfile::tempdir().unwrap();
        let report = check_fixture_dir(dir.path(), &[] as &[&str]).unwrap();
        assert!(report.is_empty());
        assert!(!report.is_consistent());
        assert_eq!(report.problems(), vec!["fixture directory is empty"]);
    }

    #[test]
    fn reports_missing_required_fixture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("other.json"), "{}").unwrap();

        let report = check_fixture_dir(dir.path(), &["sample-user.json"]).unwrap();
        assert_eq!(report.missing, vec!["sample-user.json"]);
        assert!(!report.is_consistent());
    }

    #[test]
    fn reports_malformed_json_but_ignores_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sample-user.json"), "{}").unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ \"id\": ").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "{ not json either").unwrap();

        let report = check_fixture_dir(dir.path(), &["sample-user.json"]).unwrap();
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.malformed[0].file, "broken.json");
        assert!(!report.is_consistent());
    }
}
