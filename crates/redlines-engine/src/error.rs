//! Error types for the redline engine adapter.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while preparing or driving the native redline engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Host operating system or architecture has no bundled artifact.
    #[error("Unsupported platform: os '{os}', arch '{arch}'. Supported: linux, windows, macos on x64 or arm64")]
    UnsupportedPlatform { os: String, arch: String },

    /// The expected archive is not in the bundle directory, or extracting it
    /// left no binary at the expected path. `path` names whichever is missing.
    #[error("Redlines artifact not found: {path}")]
    ArtifactNotFound { path: PathBuf },

    /// Failed to extract the bundled archive.
    #[error("Failed to extract {archive}: {source}")]
    Extract {
        archive: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Zip archive could not be read.
    #[error("Invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A document reference or the attribution label was rejected.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Failed to write a byte payload to its staging file.
    #[error("Failed to stage document: {0}")]
    Stage(#[source] std::io::Error),

    /// Failed to spawn the redlines process.
    #[error("Failed to spawn redlines process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The redlines process did not finish before the configured deadline.
    #[error("Redlines process timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// The redlines process exited with non-zero status.
    #[error("Redlines process exited with status {}: {}", display_code(.exit_code), diagnostics(.stdout, .stderr))]
    ProcessFailed {
        exit_code: Option<i32>,
        stdout: Option<String>,
        stderr: Option<String>,
    },

    /// The process exited cleanly but left the result file empty.
    #[error("Redlines produced no output document: {}", diagnostics(.stdout, .stderr))]
    OutputMissing {
        stdout: Option<String>,
        stderr: Option<String>,
    },

    /// Failed to read the result file back.
    #[error("Failed to read redline output from {path}: {source}")]
    ReadOutputFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

fn diagnostics(stdout: &Option<String>, stderr: &Option<String>) -> String {
    match (stdout.as_deref(), stderr.as_deref()) {
        (_, Some(err)) => err.trim().to_string(),
        (Some(out), None) => out.trim().to_string(),
        (None, None) => "no diagnostic output".to_string(),
    }
}

impl EngineError {
    /// Creates a new invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a new unsupported platform error.
    pub fn unsupported_platform(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::UnsupportedPlatform { .. } => "REDLINES_001",
            EngineError::ArtifactNotFound { .. } => "REDLINES_002",
            EngineError::Extract { .. } => "REDLINES_003",
            EngineError::Zip(_) => "REDLINES_004",
            EngineError::InvalidInput { .. } => "REDLINES_005",
            EngineError::Stage(_) => "REDLINES_006",
            EngineError::SpawnFailed(_) => "REDLINES_007",
            EngineError::Timeout { .. } => "REDLINES_008",
            EngineError::ProcessFailed { .. } => "REDLINES_009",
            EngineError::OutputMissing { .. } => "REDLINES_010",
            EngineError::ReadOutputFailed { .. } => "REDLINES_011",
            EngineError::Io(_) => "REDLINES_012",
        }
    }

    /// Error category for grouping related errors.
    pub fn category(&self) -> &'static str {
        match self {
            EngineError::UnsupportedPlatform { .. } => "platform",
            EngineError::ArtifactNotFound { .. }
            | EngineError::Extract { .. }
            | EngineError::Zip(_) => "artifact",
            EngineError::InvalidInput { .. } => "input",
            EngineError::SpawnFailed(_)
            | EngineError::Timeout { .. }
            | EngineError::ProcessFailed { .. }
            | EngineError::OutputMissing { .. } => "process",
            EngineError::Stage(_) | EngineError::ReadOutputFailed { .. } | EngineError::Io(_) => {
                "io"
            }
        }
    }

    /// Returns true if the error happened while preparing the engine rather than running it.
    pub fn is_setup_error(&self) -> bool {
        matches!(self.category(), "platform" | "artifact")
    }
}
