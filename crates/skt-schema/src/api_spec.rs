//! # API Description Check
//!
//! Confirms that an OpenAPI description file carries its top-level
//! structural markers. The file is inspected as raw text; it is not
//! parsed.

use std::path::Path;

use serde::Serialize;

use crate::document::read_text;
use crate::error::FixtureError;

/// Markers every API description must contain.
pub const API_SPEC_MARKERS: [&str; 3] = ["openapi:", "info:", "paths:"];

/// Result of [`check_api_spec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiSpecReport {
    /// Markers that were not found, in [`API_SPEC_MARKERS`] order.
    pub missing_markers: Vec<&'static str>,
}

impl ApiSpecReport {
    /// True when every marker is present.
    pub fn is_complete(&self) -> bool {
        self.missing_markers.is_empty()
    }
}

/// Check raw text for the API description markers.
pub fn check_api_spec_text(text: &str) -> ApiSpecReport {
    ApiSpecReport {
        missing_markers: API_SPEC_MARKERS
            .into_iter()
            .filter(|marker| !text.contains(marker))
            .collect(),
    }
}

/// Read an API description file and check its markers.
///
/// # Errors
///
/// [`FixtureError::NotFound`] if the file does not exist.
pub fn check_api_spec(path: impl AsRef<Path>) -> Result<ApiSpecReport, FixtureError> {
    let path = path.as_ref();
    let report = check_api_spec_text(&read_text(path)?);
    tracing::debug!(
        path = %path.display(),
        missing = report.missing_markers.len(),
        "checked API description"
    );
    Ok(report)
}
