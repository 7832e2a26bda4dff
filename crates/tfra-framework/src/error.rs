//! Error types for framework introspection.

use std::path::PathBuf;

/// Errors that can occur while querying the installed framework.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// TensorFlow could not be imported by the interpreter.
    #[error(
        "TensorFlow is not installed for '{interpreter}': {detail}\n\
         Please install TensorFlow on the compiling machine; the build needs its \
         version and C++ headers."
    )]
    NotInstalled {
        /// Interpreter that was asked to import TensorFlow.
        interpreter: String,
        /// Message reported by the interpreter.
        detail: String,
    },

    /// The interpreter could not be run or failed unexpectedly.
    #[error("introspection with '{interpreter}' failed: {detail}")]
    ProbeFailed {
        /// Interpreter that was run.
        interpreter: String,
        /// What went wrong.
        detail: String,
    },

    /// The framework version is not `major.minor.patch` with the expected digit counts.
    #[error("got wrong TensorFlow version '{version}': {reason}")]
    MalformedVersion {
        /// The version string as reported.
        version: String,
        /// Which constraint was violated.
        reason: String,
    },

    /// The encoded version integer is not exactly 4 digits.
    #[error(
        "TensorFlow version flag must be 4 digits long (major: 1, minor: 2, patch: 1), \
         but got {value} for version {version}"
    )]
    VersionIntegerLength {
        /// The version string.
        version: String,
        /// The encoded integer.
        value: u32,
    },

    /// A flag list was shorter than expected.
    #[error("{kind} flags have no entry at position {index}")]
    MissingFlag {
        /// "compile" or "link".
        kind: &'static str,
        /// Zero-based position that was requested.
        index: usize,
    },

    /// A flag did not carry the expected marker.
    #[error("unexpected flag '{flag}': expected {expected}")]
    UnexpectedFlag {
        /// The flag as reported.
        flag: String,
        /// Description of the expected shape.
        expected: String,
    },

    /// The bundled header archive could not be unpacked.
    #[error("error decompressing TensorFlow headers archive {}: {detail}", archive.display())]
    ExtractionFailed {
        /// The archive that was being extracted.
        archive: PathBuf,
        /// What went wrong.
        detail: String,
    },

    /// Introspection output was not valid JSON.
    #[error("invalid introspection output: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for framework operations.
pub type Result<T> = std::result::Result<T, FrameworkError>;
