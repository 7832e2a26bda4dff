//! Bundled headers for TensorFlow releases older than 2.0.
//!
//! Those wheels do not ship a usable include tree, so the repository
//! carries one archive per supported release:
//!
//! ```text
//! <source root>/build_deps/tf_header/<version>.tar.gz
//!     → <source root>/build_deps/tf_header/<version>/tensorflow
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{FrameworkError, Result};

/// Directory of the header archives, relative to the source root.
pub const HEADER_ARCHIVE_DIR: &str = "build_deps/tf_header";

/// Location of one release's bundled headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledHeaders {
    archive_dir: PathBuf,
    version: String,
}

impl BundledHeaders {
    /// Headers for `version` under `source_root`.
    pub fn new(source_root: &Path, version: &str) -> Self {
        Self {
            archive_dir: source_root.join(HEADER_ARCHIVE_DIR),
            version: version.to_string(),
        }
    }

    /// Directory the archive is unpacked into.
    pub fn output_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// The `.tar.gz` archive for this release.
    pub fn archive(&self) -> PathBuf {
        self.archive_dir.join(format!("{}.tar.gz", self.version))
    }

    /// The header directory handed to the build.
    pub fn header_dir(&self) -> PathBuf {
        self.archive_dir.join(&self.version).join("tensorflow")
    }

    /// Unpack the archive with the host's `tar`.
    pub fn extract(&self) -> Result<()> {
        let archive = self.archive();
        log::debug!(
            "extracting {} into {}",
            archive.display(),
            self.archive_dir.display()
        );

        let output = Command::new("tar")
            .arg("-zxf")
            .arg(&archive)
            .arg("--directory")
            .arg(&self.archive_dir)
            .output()
            .map_err(|e| FrameworkError::ExtractionFailed {
                archive: archive.clone(),
                detail: format!("could not run tar: {e}"),
            })?;

        if !output.status.success() {
            return Err(FrameworkError::ExtractionFailed {
                archive,
                detail: format!(
                    "tar {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(())
    }
}
