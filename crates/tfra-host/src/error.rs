//! Error types for host detection.

/// Errors that can occur while detecting the host platform.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The operating system is not one the build supports.
    #[error("unsupported host operating system: '{system}' (expected macOS, Windows or Linux)")]
    UnsupportedOs {
        /// The system name as reported by the host.
        system: String,
    },
}

/// Result type for host detection.
pub type Result<T> = std::result::Result<T, HostError>;
