//! Files created for a single invocation.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{EngineError, EngineResult};

const INPUT_PREFIX: &str = "redline-input-";
const OUTPUT_PREFIX: &str = "redline-output-";
const DOCUMENT_SUFFIX: &str = ".docx";

/// Paths one invocation created and must remove before returning.
///
/// [`TransientFiles::cleanup`] runs on the normal path; `Drop` removes
/// whatever is left if the invocation unwinds.
#[derive(Debug)]
pub struct TransientFiles {
    scratch_dir: PathBuf,
    paths: Vec<PathBuf>,
}

impl TransientFiles {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            paths: Vec::new(),
        }
    }

    /// Writes `bytes` to a fresh, uniquely named file and tracks it.
    pub fn stage_bytes(&mut self, bytes: &[u8]) -> EngineResult<PathBuf> {
        let mut file = self.create(INPUT_PREFIX)?;
        file.write_all(bytes).map_err(EngineError::Stage)?;
        file.flush().map_err(EngineError::Stage)?;
        self.keep(file)
    }

    /// Allocates a fresh, uniquely named path for the result document.
    pub fn allocate_output(&mut self) -> EngineResult<PathBuf> {
        let file = self.create(OUTPUT_PREFIX)?;
        self.keep(file)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Removes every tracked path. Failures are logged, never returned.
    ///
    /// Returns the number of paths that could not be removed.
    pub fn cleanup(&mut self) -> usize {
        let mut failed = 0;
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed transient file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Error deleting temp file {}: {}", path.display(), e);
                    failed += 1;
                }
            }
        }
        failed
    }

    fn create(&self, prefix: &str) -> EngineResult<tempfile::NamedTempFile> {
        tempfile::Builder::new()
            .prefix(prefix)
            .suffix(DOCUMENT_SUFFIX)
            .tempfile_in(&self.scratch_dir)
            .map_err(EngineError::Stage)
    }

    fn keep(&mut self, file: tempfile::NamedTempFile) -> EngineResult<PathBuf> {
        // Keeping hands deletion over to cleanup() so failures get logged.
        let (_, path) = file.keep().map_err(|e| EngineError::Stage(e.error))?;
        self.paths.push(path.clone());
        Ok(path)
    }
}

impl Drop for TransientFiles {
    fn drop(&mut self) {
        self.cleanup();
    }
}
