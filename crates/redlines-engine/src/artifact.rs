//! Artifact naming.
//!
//! Maps a [`Platform`] and version string to the archive the release
//! pipeline bundles and the binary path inside it. Everything here is pure.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Basename of the native executable, without platform suffix.
pub const BINARY_BASENAME: &str = "redlines";

/// Compression format of a bundled archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchiveKind {
    /// Gzip-compressed tar (`.tar.gz`).
    TarGz,
    /// Deflate-compressed zip (`.zip`).
    Zip,
}

impl ArchiveKind {
    /// Archive kind the release pipeline uses for a platform.
    pub fn for_platform(platform: &Platform) -> Self {
        if platform.is_windows() {
            ArchiveKind::Zip
        } else {
            ArchiveKind::TarGz
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveKind::TarGz => "tar.gz",
            ArchiveKind::Zip => "zip",
        }
    }
}

/// Where a platform's binary comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Archive file name, e.g. `linux-x64-0.1.0.tar.gz`.
    pub archive_name: String,
    /// Binary path relative to the extraction root, e.g. `linux-x64/redlines`.
    pub binary_relative_path: PathBuf,
    pub kind: ArchiveKind,
}

impl ArtifactRef {
    pub fn resolve(platform: &Platform, version: &str) -> Self {
        let kind = ArchiveKind::for_platform(platform);
        let slug = platform.slug();
        let basename = if platform.is_windows() {
            format!("{BINARY_BASENAME}.exe")
        } else {
            BINARY_BASENAME.to_string()
        };

        Self {
            archive_name: format!("{slug}-{version}.{}", kind.extension()),
            binary_relative_path: Path::new(&slug).join(basename),
            kind,
        }
    }

    /// Location of the archive inside a bundle directory.
    pub fn archive_path(&self, bundle_dir: &Path) -> PathBuf {
        bundle_dir.join(&self.archive_name)
    }

    /// Expected on-disk location of the binary after extraction.
    pub fn binary_path(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(&self.binary_relative_path)
    }
}
