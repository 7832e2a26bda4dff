//! `configure.toml` manifest parsing and run settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tfra_bazel::probe::DEFAULT_BAZEL;
use tfra_bazel::BAZELRC;
use tfra_framework::PythonProbe;

/// Manifest file name, searched upward from the working directory.
pub const MANIFEST_FILE: &str = "configure.toml";

/// Optional project-level defaults for the configurator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigureManifest {
    /// Tool locations.
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Tools used for probing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Python interpreter that has TensorFlow installed.
    #[serde(default)]
    pub python: Option<String>,
    /// Bazel binary.
    #[serde(default)]
    pub bazel: Option<String>,
}

/// Output section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Configuration file, relative to the manifest directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl ConfigureManifest {
    /// Search upward from `start_dir` for a `configure.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: ConfigureManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                log::debug!("loaded {}", candidate.display());
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing configure.toml")
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub python: Option<String>,
    pub bazel: Option<String>,
    pub output: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Python interpreter for introspection.
    pub python: String,
    /// Bazel binary.
    pub bazel: String,
    /// Configuration file to write.
    pub output: PathBuf,
    /// Repository root holding `build_deps/`.
    pub source_root: PathBuf,
    /// Where the manifest was found, if any.
    pub manifest_dir: Option<PathBuf>,
}

impl Settings {
    /// Resolve settings: command line, then manifest, then defaults.
    pub fn resolve(
        overrides: Overrides,
        manifest: Option<(&ConfigureManifest, &Path)>,
        cwd: &Path,
    ) -> Self {
        let manifest_dir = manifest.map(|(_, dir)| dir.to_path_buf());
        let root = manifest_dir.clone().unwrap_or_else(|| cwd.to_path_buf());
        let probe = manifest.map(|(m, _)| &m.probe);

        let python = overrides
            .python
            .or_else(|| probe.and_then(|p| p.python.clone()))
            .unwrap_or_else(|| PythonProbe::from_env().interpreter().to_string());
        let bazel = overrides
            .bazel
            .or_else(|| probe.and_then(|p| p.bazel.clone()))
            .unwrap_or_else(|| DEFAULT_BAZEL.to_string());
        let output = match overrides.output {
            Some(path) => cwd.join(path),
            None => root.join(
                manifest
                    .and_then(|(m, _)| m.output.path.clone())
                    .unwrap_or_else(|| PathBuf::from(BAZELRC)),
            ),
        };
        let source_root = overrides
            .source_root
            .map(|p| cwd.join(p))
            .unwrap_or(root);

        Self {
            python,
            bazel,
            output,
            source_root,
            manifest_dir,
        }
    }

    /// Load the manifest above `cwd` and resolve settings.
    pub fn load(overrides: Overrides, cwd: &Path) -> Result<Self> {
        let manifest = ConfigureManifest::find_and_load(cwd)?;
        Ok(Self::resolve(
            overrides,
            manifest.as_ref().map(|(m, dir)| (m, dir.as_path())),
            cwd,
        ))
    }
}
