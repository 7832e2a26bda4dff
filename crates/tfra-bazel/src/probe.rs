//! Installed Bazel version probe.

use std::process::Command;

use crate::error::{BazelError, Result};

/// Bazel binary used when neither a flag nor the manifest names one.
pub const DEFAULT_BAZEL: &str = "bazel";

/// A source of the installed Bazel version.
pub trait BazelProbe {
    /// The installed Bazel version, e.g. "4.2.1".
    fn installed_version(&self) -> Result<String>;
}

/// Queries a Bazel binary with `bazel version`.
#[derive(Debug, Clone)]
pub struct BazelBinary {
    path: String,
}

impl BazelBinary {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The binary this probe runs.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Default for BazelBinary {
    fn default() -> Self {
        Self::new(DEFAULT_BAZEL)
    }
}

impl BazelProbe for BazelBinary {
    fn installed_version(&self) -> Result<String> {
        log::debug!("running '{} version'", self.path);
        let output = Command::new(&self.path)
            .arg("version")
            .output()
            .map_err(|e| BazelError::ProbeFailed {
                binary: self.path.clone(),
                detail: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_version_output(&stdout).ok_or_else(|| BazelError::ProbeFailed {
            binary: self.path.clone(),
            detail: format!("no build label in output ({})", output.status),
        })
    }
}

/// Extract the version from `bazel version` output.
///
/// Reads the first line mentioning `label`, e.g. `Build label: 4.2.1`.
pub fn parse_version_output(stdout: &str) -> Option<String> {
    let line = stdout.lines().find(|l| l.contains("label"))?;
    let (_, version) = line.split_once(':')?;
    let version = version.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
