//! Platform detection and Hugo release asset names.

use crate::error::{ResolveError, Result};
use crate::version::ResolvedVersion;

/// Host platform using the registry's naming (`linux`, `darwin`, `amd64`, `arm64`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        Self::from_rust_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map Rust's `target_os`/`target_arch` names to the registry's names.
    pub fn from_rust_target(os: &str, arch: &str) -> Self {
        let os = match os {
            "macos" => "darwin",
            other => other,
        };
        let arch = match arch {
            "x86_64" => "amd64",
            "x86" => "386",
            "aarch64" => "arm64",
            other => other,
        };
        Self::new(os, arch)
    }

    pub fn os(&self) -> &str {
        &self.os
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    fn unsupported(&self) -> ResolveError {
        ResolveError::UnsupportedPlatform {
            os: self.os.clone(),
            arch: self.arch.clone(),
        }
    }

    fn os_label(&self) -> Result<&'static str> {
        let label = match self.os.as_str() {
            "linux" => "Linux",
            "darwin" => "macOS",
            "windows" => "Windows",
            "freebsd" => "FreeBSD",
            "openbsd" => "OpenBSD",
            "netbsd" => "NetBSD",
            "dragonfly" => "DragonFlyBSD",
            _ => return Err(self.unsupported()),
        };
        Ok(label)
    }

    fn arch_label(&self) -> Result<&'static str> {
        let label = match self.arch.as_str() {
            "386" => "32bit",
            "amd64" => "64bit",
            "arm" => "ARM",
            "arm64" => "ARM64",
            _ => return Err(self.unsupported()),
        };
        Ok(label)
    }

    /// Archive extension of the published builds.
    pub fn archive_extension(&self) -> &'static str {
        if self.is_windows() {
            ".zip"
        } else {
            ".tar.gz"
        }
    }

    /// File name of the Hugo executable inside the archive.
    pub fn binary_name(&self) -> &'static str {
        if self.is_windows() {
            "hugo.exe"
        } else {
            "hugo"
        }
    }
}

/// Name of the archive published for `version` on `platform`,
/// e.g. `hugo_extended_0.73.0_Linux-64bit.tar.gz` or `hugo_0.53_Windows-32bit.zip`.
pub fn asset_name(version: &ResolvedVersion, platform: &Platform) -> Result<String> {
    let os = platform.os_label()?;
    let arch = platform.arch_label()?;

    let mut name = String::from("hugo_");
    if version.extended() {
        name.push_str("extended_");
    }
    name.push_str(&version.core().label());
    name.push_str(&format!("_{os}-{arch}{}", platform.archive_extension()));
    Ok(name)
}

/// Name of the SHA-256 checksums file published alongside the archives.
pub fn checksums_asset_name(version: &ResolvedVersion) -> String {
    format!("hugo_{}_checksums.txt", version.core().label())
}
