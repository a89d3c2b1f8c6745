//! The redline engine adapter.
//!
//! [`Engine::new`] resolves the platform artifact and makes sure the native
//! binary is extracted. [`Engine::run_redline`] then drives that binary:
//!
//! ```text
//! redlines <attribution> <original> <modified> <output>
//! ```
//!
//! Inputs given as bytes are staged to temporary files. The output document
//! is written by the binary to a temporary path, read back, and every file
//! the adapter created is removed before the call returns.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::{debug, warn};

use crate::artifact::ArtifactRef;
use crate::document::DocumentInput;
use crate::error::{EngineError, EngineResult};
use crate::install::ensure_binary;
use crate::platform::{HostTriple, Platform};
use crate::process::{non_empty, run_captured};
use crate::transient::TransientFiles;

/// Version baked into artifact names.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the extraction target directory.
pub const TARGET_DIR_ENV: &str = "REDLINES_TARGET_DIR";

/// Environment variable overriding the bundled archive directory.
pub const BUNDLE_DIR_ENV: &str = "REDLINES_BUNDLE_DIR";

/// Default extraction directory, relative to the install location.
pub const DEFAULT_TARGET_SUBDIR: &str = "bin";

/// Default archive directory, relative to the install location.
pub const DEFAULT_BUNDLE_SUBDIR: &str = "dist";

/// Configuration for [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Where the archive is extracted. Falls back to `REDLINES_TARGET_DIR`,
    /// then `<install dir>/bin`.
    pub target_dir: Option<PathBuf>,
    /// Where the bundled archives live. Falls back to `REDLINES_BUNDLE_DIR`,
    /// then `<install dir>/dist`.
    pub bundle_dir: Option<PathBuf>,
    /// Version string used in the archive name.
    pub version: String,
    /// Host description; the running host when unset.
    pub host: Option<HostTriple>,
    /// Extract even if the binary is already present.
    pub force_extract: bool,
    /// Directory for staged inputs and output; the system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
    /// Kill the binary if it runs longer than this. Unset waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            target_dir: None,
            bundle_dir: None,
            version: ENGINE_VERSION.to_string(),
            host: None,
            force_extract: false,
            scratch_dir: None,
            timeout: None,
        }
    }
}

impl EngineConfig {
    /// Creates a config extracting into `target_dir`.
    pub fn with_target_dir(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: Some(target_dir.into()),
            ..Default::default()
        }
    }

    pub fn target_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(path.into());
        self
    }

    pub fn bundle_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundle_dir = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn host(mut self, host: HostTriple) -> Self {
        self.host = Some(host);
        self
    }

    pub fn force_extract(mut self, force: bool) -> Self {
        self.force_extract = force;
        self
    }

    pub fn scratch_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Resolves the extraction directory: config, then env, then install dir.
    pub fn resolve_target_dir(&self) -> EngineResult<PathBuf> {
        resolve_dir(
            self.target_dir.as_deref(),
            TARGET_DIR_ENV,
            DEFAULT_TARGET_SUBDIR,
        )
    }

    /// Resolves the bundle directory: config, then env, then install dir.
    pub fn resolve_bundle_dir(&self) -> EngineResult<PathBuf> {
        resolve_dir(
            self.bundle_dir.as_deref(),
            BUNDLE_DIR_ENV,
            DEFAULT_BUNDLE_SUBDIR,
        )
    }

    /// Resolves the platform from the configured or running host.
    pub fn resolve_platform(&self) -> EngineResult<Platform> {
        match &self.host {
            Some(host) => Platform::from_host(host),
            None => Platform::detect(),
        }
    }
}

fn resolve_dir(configured: Option<&Path>, env_var: &str, subdir: &str) -> EngineResult<PathBuf> {
    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(env_var).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(install_dir()?.join(subdir))
}

/// Directory containing the running executable.
fn install_dir() -> EngineResult<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| io::Error::other("executable path has no parent directory").into())
}

/// Output of one redline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedlineOutput {
    /// The redlined document.
    pub redline: Vec<u8>,
    /// Standard output of the binary, if it wrote any.
    pub stdout: Option<String>,
    /// Standard error of the binary, if it wrote any.
    pub stderr: Option<String>,
}

impl RedlineOutput {
    pub fn into_parts(self) -> (Vec<u8>, Option<String>, Option<String>) {
        (self.redline, self.stdout, self.stderr)
    }

    /// Parses the `Revisions found: N` line the binary prints, if present.
    pub fn revision_count(&self) -> Option<usize> {
        self.stdout.as_deref()?.lines().find_map(|line| {
            line.trim()
                .strip_prefix("Revisions found:")
                .and_then(|n| n.trim().parse().ok())
        })
    }
}

/// Adapter around the bundled native redlines executable.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    platform: Platform,
    artifact: ArtifactRef,
    binary_path: PathBuf,
    scratch_dir: PathBuf,
    extracted: bool,
}

impl Engine {
    /// Resolves the platform artifact and ensures the binary is extracted.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let platform = config.resolve_platform()?;
        let artifact = ArtifactRef::resolve(&platform, &config.version);
        debug!(
            "Resolved redlines artifact {} for {}",
            artifact.archive_name, platform
        );

        let target_dir = config.resolve_target_dir()?;
        let bundle_dir = config.resolve_bundle_dir()?;
        debug!(
            "Redlines target dir: {}, bundle dir: {}",
            target_dir.display(),
            bundle_dir.display()
        );

        let outcome = ensure_binary(&artifact, &bundle_dir, &target_dir, config.force_extract)?;
        let scratch_dir = config
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            config,
            platform,
            artifact,
            binary_path: outcome.binary_path,
            scratch_dir,
            extracted: outcome.extracted,
        })
    }

    /// Creates an engine with default configuration.
    pub fn with_defaults() -> EngineResult<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn artifact(&self) -> &ArtifactRef {
        &self.artifact
    }

    /// Absolute path of the extracted binary.
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Whether constructing this engine extracted the archive.
    pub fn extracted(&self) -> bool {
        self.extracted
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Redlines `modified` against `original`, attributing changes to `attribution`.
    ///
    /// Returns the redlined document plus whatever the binary printed. Files
    /// created for this call are removed before it returns, whether it
    /// succeeded or not. Paths passed in by the caller are left alone.
    pub fn run_redline(
        &self,
        attribution: &str,
        original: impl Into<DocumentInput>,
        modified: impl Into<DocumentInput>,
    ) -> EngineResult<RedlineOutput> {
        let original = original.into();
        let modified = modified.into();

        if attribution.is_empty() {
            return Err(EngineError::invalid_input(
                "attribution label must not be empty",
            ));
        }
        original.validate("original")?;
        modified.validate("modified")?;

        let mut transient = TransientFiles::new(&self.scratch_dir);
        let result = self.run_staged(attribution, &original, &modified, &mut transient);

        let failed = transient.cleanup();
        if failed > 0 {
            warn!("{failed} transient file(s) could not be removed");
        }

        result
    }

    fn run_staged(
        &self,
        attribution: &str,
        original: &DocumentInput,
        modified: &DocumentInput,
        transient: &mut TransientFiles,
    ) -> EngineResult<RedlineOutput> {
        let output_path = transient.allocate_output()?;
        let original_path = original.stage(transient)?;
        let modified_path = modified.stage(transient)?;

        let mut cmd = Command::new(&self.binary_path);
        cmd.arg(attribution)
            .arg(&original_path)
            .arg(&modified_path)
            .arg(&output_path);

        debug!(
            "Running {} for {}",
            self.binary_path.display(),
            output_path.display()
        );
        let captured = run_captured(cmd, self.config.timeout)?;

        let stdout = non_empty(captured.stdout);
        let stderr = non_empty(captured.stderr);

        if !captured.status.success() {
            return Err(EngineError::ProcessFailed {
                exit_code: captured.status.code(),
                stdout,
                stderr,
            });
        }

        let redline =
            std::fs::read(&output_path).map_err(|source| EngineError::ReadOutputFailed {
                path: output_path.clone(),
                source,
            })?;

        if redline.is_empty() {
            return Err(EngineError::OutputMissing { stdout, stderr });
        }

        Ok(RedlineOutput {
            redline,
            stdout,
            stderr,
        })
    }
}
