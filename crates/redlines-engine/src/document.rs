//! Document inputs accepted by [`Engine::run_redline`](crate::Engine::run_redline).

use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};
use crate::transient::TransientFiles;

/// A document handed to the redline engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentInput {
    /// In-memory document, staged to a temporary file before the run.
    Bytes(Vec<u8>),
    /// Existing file, passed to the engine as-is and never deleted.
    Path(PathBuf),
}

impl DocumentInput {
    pub fn is_bytes(&self) -> bool {
        matches!(self, DocumentInput::Bytes(_))
    }

    /// Checks the input without touching the filesystem beyond a metadata read.
    pub fn validate(&self, role: &str) -> EngineResult<()> {
        match self {
            DocumentInput::Bytes(_) => Ok(()),
            DocumentInput::Path(path) => {
                if path.is_file() {
                    Ok(())
                } else {
                    Err(EngineError::invalid_input(format!(
                        "{role} document is not an existing file: {}",
                        path.display()
                    )))
                }
            }
        }
    }

    /// Returns a path the engine can read, staging bytes through `transient`.
    pub fn stage(&self, transient: &mut TransientFiles) -> EngineResult<PathBuf> {
        match self {
            DocumentInput::Bytes(bytes) => transient.stage_bytes(bytes),
            DocumentInput::Path(path) => Ok(path.clone()),
        }
    }
}

impl From<Vec<u8>> for DocumentInput {
    fn from(bytes: Vec<u8>) -> Self {
        DocumentInput::Bytes(bytes)
    }
}

impl From<&[u8]> for DocumentInput {
    fn from(bytes: &[u8]) -> Self {
        DocumentInput::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for DocumentInput {
    fn from(bytes: &[u8; N]) -> Self {
        DocumentInput::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for DocumentInput {
    fn from(path: PathBuf) -> Self {
        DocumentInput::Path(path)
    }
}

impl From<&Path> for DocumentInput {
    fn from(path: &Path) -> Self {
        DocumentInput::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for DocumentInput {
    fn from(path: &PathBuf) -> Self {
        DocumentInput::Path(path.clone())
    }
}
