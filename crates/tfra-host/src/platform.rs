//! Resolved host platform.
//!
//! Folds the OS kind and architecture into the handful of cases the
//! build configuration distinguishes.

use std::fmt;

use serde::Serialize;

use crate::environment::{Arch, HostEnvironment, OsKind};
use crate::error::Result;

/// The build host, resolved once at startup.
///
/// Serializes to the same short name as `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HostPlatform {
    /// macOS on Intel.
    #[serde(rename = "macos-x86_64")]
    MacOs,
    /// macOS on Apple silicon.
    #[serde(rename = "macos-arm64")]
    MacOsArm64,
    #[serde(rename = "windows")]
    Windows,
    /// Linux on x86-64 or any architecture without special handling,
    /// `aarch64` included.
    #[serde(rename = "linux-x86_64")]
    Linux,
    /// Linux on a 32-bit ARMv7 board (Raspberry Pi).
    #[serde(rename = "linux-armv7l")]
    RaspberryPi,
}

impl HostPlatform {
    /// Resolve a platform from its OS kind and architecture.
    pub fn resolve(os: OsKind, arch: &Arch) -> Self {
        match (os, arch) {
            (OsKind::MacOs, Arch::Arm64) => HostPlatform::MacOsArm64,
            (OsKind::MacOs, _) => HostPlatform::MacOs,
            (OsKind::Windows, _) => HostPlatform::Windows,
            (OsKind::Linux, Arch::Armv7l) => HostPlatform::RaspberryPi,
            (OsKind::Linux, _) => HostPlatform::Linux,
        }
    }

    /// Detect the platform of the running host.
    pub fn detect() -> Result<Self> {
        let env = HostEnvironment::detect()?;
        let platform = Self::from_environment(&env);
        log::debug!("resolved host platform: {platform}");
        Ok(platform)
    }

    /// Resolve a platform from an already-read environment.
    pub fn from_environment(env: &HostEnvironment) -> Self {
        Self::resolve(env.os, &env.arch)
    }

    /// Short platform name (e.g., "linux-x86_64", "macos-arm64").
    pub fn name(&self) -> &'static str {
        match self {
            HostPlatform::MacOs => "macos-x86_64",
            HostPlatform::MacOsArm64 => "macos-arm64",
            HostPlatform::Windows => "windows",
            HostPlatform::Linux => "linux-x86_64",
            HostPlatform::RaspberryPi => "linux-armv7l",
        }
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
