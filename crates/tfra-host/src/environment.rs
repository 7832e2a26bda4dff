//! Raw host environment.
//!
//! Reads the operating system kind and the machine (CPU architecture)
//! name the same way `uname` reports them.

use std::process::Command;

use serde::Serialize;

use crate::error::{HostError, Result};

/// Operating system family of the build host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OsKind {
    MacOs,
    Windows,
    Linux,
}

impl OsKind {
    /// Map a system name to an OS kind.
    ///
    /// Accepts both the `uname -s` spelling ("Darwin", "Linux") and the
    /// Rust target spelling ("macos", "linux").
    pub fn from_system(system: &str) -> Result<Self> {
        match system.to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Ok(OsKind::MacOs),
            "windows" => Ok(OsKind::Windows),
            "linux" => Ok(OsKind::Linux),
            _ => Err(HostError::UnsupportedOs {
                system: system.to_string(),
            }),
        }
    }

    /// Display name as used in log and doctor output.
    pub fn name(&self) -> &'static str {
        match self {
            OsKind::MacOs => "macOS",
            OsKind::Windows => "Windows",
            OsKind::Linux => "Linux",
        }
    }
}

/// CPU architecture of the build host, as far as the build cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Arch {
    /// 64-bit ARM as macOS reports it (`arm64`). Linux `aarch64` is not
    /// special-cased.
    Arm64,
    /// 32-bit ARMv7, as found on Raspberry Pi boards.
    Armv7l,
    /// Anything else, with the reported machine name.
    Other(String),
}

impl Arch {
    /// Classify a machine name such as "x86_64", "arm64" or "armv7l".
    ///
    /// Names are matched exactly, as `uname -m` prints them.
    pub fn from_machine(machine: &str) -> Self {
        match machine {
            "arm64" => Arch::Arm64,
            "armv7l" => Arch::Armv7l,
            _ => Arch::Other(machine.to_string()),
        }
    }
}

/// The raw OS and machine information read from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostEnvironment {
    /// Operating system family.
    pub os: OsKind,
    /// Classified CPU architecture.
    pub arch: Arch,
    /// The machine name exactly as reported.
    pub machine: String,
}

impl HostEnvironment {
    /// Build an environment from a system name and a machine name.
    pub fn new(system: &str, machine: &str) -> Result<Self> {
        Ok(Self {
            os: OsKind::from_system(system)?,
            arch: Arch::from_machine(machine),
            machine: machine.to_string(),
        })
    }

    /// Read the environment of the running host.
    pub fn detect() -> Result<Self> {
        let machine = machine_name();
        log::debug!("host system '{}', machine '{machine}'", std::env::consts::OS);
        Self::new(std::env::consts::OS, &machine)
    }
}

/// The host's machine name.
///
/// Prefers `uname -m` so a 32-bit userland on a 64-bit kernel (or an
/// emulated binary) still reports the real hardware. Falls back to the
/// architecture this binary was compiled for.
fn machine_name() -> String {
    if cfg!(windows) {
        if let Ok(arch) = std::env::var("PROCESSOR_ARCHITECTURE") {
            return arch;
        }
        return std::env::consts::ARCH.to_string();
    }

    match Command::new("uname").arg("-m").output() {
        Ok(output) if output.status.success() => {
            let machine = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if machine.is_empty() {
                std::env::consts::ARCH.to_string()
            } else {
                machine
            }
        }
        _ => {
            log::debug!("uname -m unavailable, using compile-time architecture");
            std::env::consts::ARCH.to_string()
        }
    }
}
