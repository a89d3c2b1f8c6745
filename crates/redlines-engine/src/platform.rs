//! Host platform detection.
//!
//! The bundled artifacts are built per (operating system, architecture) pair.
//! This module turns the names a host reports into the closed set of pairs
//! the release pipeline produces.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Operating system family with a bundled artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Linux,
    Windows,
    MacOs,
}

impl OsFamily {
    /// Identifier used by the release pipeline in archive and directory names.
    pub fn artifact_id(&self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::Windows => "win",
            OsFamily::MacOs => "osx",
        }
    }

    /// Parses a host-reported OS name, ignoring case.
    pub fn from_host_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Some(OsFamily::Linux),
            "windows" => Some(OsFamily::Windows),
            "macos" | "darwin" | "osx" => Some(OsFamily::MacOs),
            _ => None,
        }
    }
}

/// CPU architecture with a bundled artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    X64,
    Arm64,
}

impl Arch {
    /// Returns the normalized architecture name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }

    /// Parses a host-reported architecture name, ignoring case.
    pub fn from_host_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" | "x64" => Some(Arch::X64),
            "arm64" | "aarch64" => Some(Arch::Arm64),
            _ => None,
        }
    }
}

/// Raw OS and architecture names as reported by a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostTriple {
    pub os: String,
    pub arch: String,
}

impl HostTriple {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The host this crate was compiled for.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }
}

/// A supported (OS, architecture) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub os: OsFamily,
    pub arch: Arch,
}

impl Platform {
    pub const fn new(os: OsFamily, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Resolves a host description into a supported platform.
    pub fn from_host(host: &HostTriple) -> EngineResult<Self> {
        let os = OsFamily::from_host_name(&host.os);
        let arch = Arch::from_host_name(&host.arch);
        match (os, arch) {
            (Some(os), Some(arch)) => Ok(Self { os, arch }),
            _ => Err(EngineError::unsupported_platform(&host.os, &host.arch)),
        }
    }

    /// Resolves the platform of the running host.
    pub fn detect() -> EngineResult<Self> {
        Self::from_host(&HostTriple::current())
    }

    /// Directory name used inside the archive, e.g. `linux-x64`.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.os.artifact_id(), self.arch.as_str())
    }

    pub fn is_windows(&self) -> bool {
        self.os == OsFamily::Windows
    }

    /// Every pair the release pipeline builds for.
    pub fn all() -> [Platform; 6] {
        [
            Platform::new(OsFamily::Linux, Arch::X64),
            Platform::new(OsFamily::Linux, Arch::Arm64),
            Platform::new(OsFamily::Windows, Arch::X64),
            Platform::new(OsFamily::Windows, Arch::Arm64),
            Platform::new(OsFamily::MacOs, Arch::X64),
            Platform::new(OsFamily::MacOs, Arch::Arm64),
        ]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}
