//! Bazel version requirements.
//!
//! Each TensorFlow generation builds with one pinned Bazel release; macOS
//! on Apple silicon only needs a floor, since older Bazel releases lack
//! the platform entirely.

use serde::Serialize;
use tfra_framework::TfVersion;
use tfra_host::HostPlatform;

use crate::error::{BazelError, Result};

/// A parsed Bazel version.
pub type Version = semver::Version;

/// Oldest Bazel that supports macOS arm64.
pub const MACOS_ARM64_FLOOR: Version = Version::new(4, 1, 0);
/// Bazel pinned for TensorFlow releases before 2.0.0.
pub const LEGACY_BAZEL: Version = Version::new(0, 26, 1);
/// Bazel pinned for TensorFlow 2.x, compatible with `rules_foreign_cc`.
pub const CURRENT_BAZEL: Version = Version::new(4, 2, 1);

/// How the installed Bazel is compared against the requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionCheck {
    /// Installed must equal the requirement.
    Exact,
    /// Installed must be at least the requirement.
    AtLeast,
    /// Not checked on this host.
    Skip,
}

impl VersionCheck {
    /// The check applied on a host.
    pub fn for_host(host: HostPlatform) -> Self {
        match host {
            HostPlatform::Linux | HostPlatform::RaspberryPi => VersionCheck::Exact,
            HostPlatform::MacOsArm64 => VersionCheck::AtLeast,
            HostPlatform::MacOs | HostPlatform::Windows => VersionCheck::Skip,
        }
    }
}

/// The Bazel version required to build against a framework version.
///
/// Versions are ordered as numeric triples, so the `< 2.0.0` / `>= 2.0.0`
/// split covers every release and selection cannot fail.
pub fn select_required_version(host: HostPlatform, tf: &TfVersion) -> Version {
    if host == HostPlatform::MacOsArm64 {
        log::warn!(
            "Only Bazel version greater than {MACOS_ARM64_FLOOR} supports macOS arm64 platform."
        );
        return MACOS_ARM64_FLOOR;
    }

    if *tf < TfVersion::new(2, 0, 0) {
        log::warn!(
            "There is only limited support for TensorFlow under version 2.0.0 because of its \
             Bazel version; Bazel scripts may need manual changes, see the commit before the \
             Bazel {CURRENT_BAZEL} upgrade."
        );
        LEGACY_BAZEL
    } else {
        log::info!(
            "To ensure code compatibility with the Bazel rules_foreign_cc component, Bazel \
             {CURRENT_BAZEL} is required for TensorFlow 2.0.0 and later."
        );
        CURRENT_BAZEL
    }
}

/// Compare an installed Bazel version against the requirement.
pub fn check_version(installed: &str, required: &Version, check: VersionCheck) -> Result<()> {
    match check {
        VersionCheck::Skip => Ok(()),
        VersionCheck::Exact => {
            if installed == required.to_string() {
                Ok(())
            } else {
                Err(BazelError::VersionMismatch {
                    installed: installed.to_string(),
                    expected: required.to_string(),
                })
            }
        }
        VersionCheck::AtLeast => {
            let parsed = Version::parse(installed).map_err(|source| BazelError::InvalidVersion {
                version: installed.to_string(),
                source,
            })?;
            if parsed >= *required {
                Ok(())
            } else {
                Err(BazelError::VersionMismatch {
                    installed: installed.to_string(),
                    expected: format!("at least {required}"),
                })
            }
        }
    }
}
