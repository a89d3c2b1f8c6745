//! JSON output types for machine-readable CLI output.
//!
//! These back the `--json` flag on `compare`, `install` and `info`.

use redlines_engine::{ArtifactRef, EngineError, Platform};
use serde::{Deserialize, Serialize};

/// Error codes for CLI-level failures.
///
/// Engine failures pass through their own `REDLINES_xxx` codes.
pub mod error_codes {
    /// Result document could not be written
    pub const OUTPUT_WRITE: &str = "CLI_001";
    /// JSON serialization error
    pub const JSON_SERIALIZE: &str = "CLI_002";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "REDLINES_002", "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category (platform, artifact, input, process, io)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            category: None,
        }
    }
}

impl From<&EngineError> for JsonError {
    fn from(err: &EngineError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            category: Some(err.category().to_string()),
        }
    }
}

/// Output of `redline compare --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompareOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CompareResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// A successful comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompareResult {
    /// Where the redlined document was written
    pub output: String,
    /// Size of the redlined document in bytes
    pub bytes: usize,
    /// Revision count reported by the engine, if it printed one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revisions: Option<usize>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl CompareOutput {
    pub fn success(result: CompareResult) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: JsonError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Output of `redline install --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_path: Option<String>,
    /// Whether this run extracted the archive (false when it was cached)
    pub extracted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonError>,
}

/// Output of `redline info --json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoOutput {
    pub version: String,
    pub platform: Platform,
    pub artifact: ArtifactRef,
    pub bundle_dir: String,
    pub archive_path: String,
    pub archive_present: bool,
    pub target_dir: String,
    pub binary_path: String,
    pub binary_present: bool,
}
