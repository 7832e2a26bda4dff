//! TensorFlow install introspection for the TFRA build configurator.
//!
//! Queries the installed framework through the Python interpreter and
//! resolves everything the native build needs from it:
//!
//! - **Version:** parsed `major.minor.patch` and its 4-digit integer form
//! - **Headers:** compiled header directory, or the bundled legacy headers
//! - **Shared library:** directory and file name, per host platform
//! - **ABI:** the C++11 ABI flag the framework was built with

pub mod error;
pub mod flags;
pub mod headers;
pub mod install;
pub mod sysconfig;
pub mod version;

pub use error::{FrameworkError, Result};
pub use headers::BundledHeaders;
pub use install::{
    resolve_header_dir, resolve_shared_lib_dir, resolve_shared_lib_name, FrameworkInstallInfo,
};
pub use sysconfig::{Introspect, PythonProbe, Sysconfig};
pub use version::TfVersion;
