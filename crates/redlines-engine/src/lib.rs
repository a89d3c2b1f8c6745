//! Redlines Engine
//!
//! This crate packages and drives the native `redlines` executable, which
//! compares two office documents and writes a third one with the differences
//! recorded as tracked changes.
//!
//! # Overview
//!
//! The diffing itself happens in a pre-built binary shipped as one archive
//! per platform. This crate:
//!
//! 1. **Resolves** which archive matches the host (`linux`, `win`, `osx` on
//!    `x64` or `arm64`)
//! 2. **Extracts** it once into a target directory, reusing the binary on
//!    later runs
//! 3. **Runs** the binary with a fixed argument contract and returns the
//!    result document plus any diagnostic text
//!
//! # Bundle Layout
//!
//! | Platform | Archive | Binary |
//! |----------|---------|--------|
//! | Linux | `linux-{arch}-{version}.tar.gz` | `linux-{arch}/redlines` |
//! | Windows | `win-{arch}-{version}.zip` | `win-{arch}/redlines.exe` |
//! | macOS | `osx-{arch}-{version}.tar.gz` | `osx-{arch}/redlines` |
//!
//! # Example
//!
//! ```no_run
//! use redlines_engine::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::with_target_dir("/var/cache/redlines"))?;
//! let original = std::fs::read("original.docx")?;
//! let output = engine.run_redline("Reviewer", original, std::path::Path::new("modified.docx"))?;
//!
//! std::fs::write("redline.docx", &output.redline)?;
//! if let Some(stdout) = &output.stdout {
//!     println!("{stdout}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`engine`] - Engine configuration and redline invocation
//! - [`platform`] - Host OS/architecture detection
//! - [`artifact`] - Archive and binary naming
//! - [`install`] - Extract-once binary cache
//! - [`extract`] - `.tar.gz` and `.zip` extraction
//! - [`document`] - Byte and path document inputs
//! - [`transient`] - Per-call temporary files
//! - [`process`] - Subprocess capture
//! - [`error`] - Error types

pub mod artifact;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod install;
pub mod platform;
pub mod process;
pub mod transient;

pub use artifact::{ArchiveKind, ArtifactRef, BINARY_BASENAME};
pub use document::DocumentInput;
pub use engine::{Engine, EngineConfig, RedlineOutput, ENGINE_VERSION};
pub use error::{EngineError, EngineResult};
pub use install::{ensure_binary, InstallOutcome};
pub use platform::{Arch, HostTriple, OsFamily, Platform};
