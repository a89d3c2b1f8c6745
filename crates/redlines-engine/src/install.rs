//! Materializing the native binary on local storage.
//!
//! The target directory is the cache: if the expected binary is already
//! there, nothing is extracted.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::artifact::ArtifactRef;
use crate::error::{EngineError, EngineResult};
use crate::extract::{ensure_executable, extract_archive};

/// What [`ensure_binary`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Absolute path of the ready-to-run binary.
    pub binary_path: PathBuf,
    /// Whether the archive was extracted during this call.
    pub extracted: bool,
}

/// Ensures the binary described by `artifact` exists under `target_dir`.
///
/// Extracts `{bundle_dir}/{archive_name}` when the binary is absent, or
/// always when `force` is set.
pub fn ensure_binary(
    artifact: &ArtifactRef,
    bundle_dir: &Path,
    target_dir: &Path,
    force: bool,
) -> EngineResult<InstallOutcome> {
    fs::create_dir_all(target_dir)?;

    let binary = artifact.binary_path(target_dir);
    if !force && binary.is_file() {
        debug!("Redlines binary already present at {}", binary.display());
        return Ok(InstallOutcome {
            binary_path: absolute(&binary)?,
            extracted: false,
        });
    }

    let archive = artifact.archive_path(bundle_dir);
    if !archive.is_file() {
        return Err(EngineError::ArtifactNotFound { path: archive });
    }

    info!(
        "Extracting {} into {}",
        archive.display(),
        target_dir.display()
    );
    let entries = extract_archive(&archive, artifact.kind, target_dir)?;
    debug!("Extracted {entries} entries from {}", artifact.archive_name);

    if !binary.is_file() {
        return Err(EngineError::ArtifactNotFound { path: binary });
    }
    ensure_executable(&binary).map_err(|source| EngineError::Extract { archive, source })?;

    Ok(InstallOutcome {
        binary_path: absolute(&binary)?,
        extracted: true,
    })
}

fn absolute(path: &Path) -> EngineResult<PathBuf> {
    Ok(fs::canonicalize(path)?)
}
