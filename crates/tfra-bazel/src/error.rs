//! Error types for Bazel checks and configuration output.

/// Errors that can occur while checking Bazel or writing its configuration.
#[derive(Debug, thiserror::Error)]
pub enum BazelError {
    /// The installed Bazel does not satisfy the requirement.
    #[error("Bazel version is {installed}, but {expected} is needed")]
    VersionMismatch {
        /// Version reported by the installed Bazel.
        installed: String,
        /// Description of the accepted versions (e.g., "4.2.1", "at least 4.1.0").
        expected: String,
    },

    /// The installed Bazel reported a version that cannot be ordered.
    #[error("cannot compare Bazel version '{version}': {source}")]
    InvalidVersion {
        /// The reported version.
        version: String,
        /// Parse failure.
        source: semver::Error,
    },

    /// Bazel could not be run or did not report a version.
    #[error("could not determine the installed Bazel version with '{binary}': {detail}")]
    ProbeFailed {
        /// Bazel binary that was run.
        binary: String,
        /// What went wrong.
        detail: String,
    },

    /// Framework introspection error.
    #[error(transparent)]
    Framework(#[from] tfra_framework::FrameworkError),

    /// I/O error writing the configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Bazel operations.
pub type Result<T> = std::result::Result<T, BazelError>;
