//! Shared fixtures for engine integration tests.
//!
//! Bundles are built on the fly around a small shell script that honours the
//! redlines command-line contract, so these tests only run on unix hosts.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use redlines_engine::{EngineConfig, HostTriple};
use tempfile::TempDir;
use zip::write::{FileOptions, ZipWriter};

pub const VERSION: &str = "0.0.0-test";

/// Stand-in for the native binary.
///
/// The attribution label selects a behaviour so tests can exercise each
/// outcome without a real document engine.
pub const FAKE_REDLINES: &str = r#"#!/bin/sh
if [ "$#" -ne 4 ]; then
    echo "Usage: redlines <author_tag> <original_path.docx> <modified_path.docx> <redline_path.docx>"
    exit 2
fi
case "$1" in
    fail)
        echo "Error: comparison failed" 1>&2
        exit 3
        ;;
    silent)
        cat "$2" "$3" > "$4"
        exit 0
        ;;
    warn)
        echo "deprecated option" 1>&2
        cat "$2" "$3" > "$4"
        exit 0
        ;;
    no-output)
        echo "Error: One or both files do not exist."
        exit 0
        ;;
    args)
        printf '%s\n' "$@" > "$4"
        exit 0
        ;;
    squat)
        cat "$2" "$3" > "$4"
        rm -f "$2"
        mkdir "$2"
        : > "$2/held"
        exit 0
        ;;
esac
echo "Revisions found: 9"
{ printf 'author=%s\n' "$1"; cat "$2"; printf '\n--\n'; cat "$3"; } > "$4"
"#;

/// Temporary bundle, target and scratch directories for one test.
pub struct Fixture {
    pub root: TempDir,
    pub bundle_dir: PathBuf,
    pub target_dir: PathBuf,
    pub scratch_dir: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create fixture root");
        let bundle_dir = root.path().join("dist");
        let target_dir = root.path().join("bin");
        let scratch_dir = root.path().join("scratch");
        fs::create_dir_all(&bundle_dir).unwrap();
        fs::create_dir_all(&scratch_dir).unwrap();
        Self {
            root,
            bundle_dir,
            target_dir,
            scratch_dir,
        }
    }

    /// Fixture with a linux-x64 `.tar.gz` bundle in place.
    pub fn linux() -> Self {
        let fixture = Self::new();
        write_tar_bundle(&fixture.bundle_dir, "linux-x64", VERSION, FAKE_REDLINES);
        fixture
    }

    /// Engine config pointed at this fixture, pretending to run on linux-x64.
    pub fn config(&self) -> EngineConfig {
        EngineConfig::with_target_dir(&self.target_dir)
            .bundle_dir(&self.bundle_dir)
            .scratch_dir(&self.scratch_dir)
            .version(VERSION)
            .host(HostTriple::new("linux", "x86_64"))
    }

    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.bundle_dir.join(name)
    }

    /// Files currently in the scratch directory.
    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.scratch_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    /// Writes a caller-owned document outside the scratch directory.
    pub fn caller_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }
}

/// Writes `{slug}-{version}.tar.gz` holding `{slug}/redlines`.
pub fn write_tar_bundle(bundle_dir: &Path, slug: &str, version: &str, script: &str) {
    let archive = bundle_dir.join(format!("{slug}-{version}.tar.gz"));
    let file = File::create(archive).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    let mut header = tar::Header::new_gnu();
    header.set_path(format!("{slug}/redlines")).unwrap();
    header.set_size(script.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder.append(&header, script.as_bytes()).unwrap();

    builder.into_inner().unwrap().finish().unwrap();
}

/// Writes `{slug}-{version}.zip` holding `{slug}/redlines.exe`.
pub fn write_zip_bundle(bundle_dir: &Path, slug: &str, version: &str, script: &str) {
    let archive = bundle_dir.join(format!("{slug}-{version}.zip"));
    let mut zip = ZipWriter::new(File::create(archive).unwrap());
    let options: FileOptions<()> = FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o755);

    zip.start_file(format!("{slug}/redlines.exe"), options)
        .unwrap();
    zip.write_all(script.as_bytes()).unwrap();
    zip.finish().unwrap();
}
