//! Bazel configuration for the TFRA native build.
//!
//! Checks that the installed Bazel matches the release the detected
//! TensorFlow needs, then generates the `.bazelrc` directives that point
//! the build at the framework's headers and library and select the GPU
//! backend:
//!
//! 1. **Requirement:** required Bazel version per host and framework version
//! 2. **Check:** installed Bazel version against the requirement
//! 3. **Generate:** ordered directive list, built fully in memory
//! 4. **Write:** one write of the rendered list to the output file

pub mod env;
pub mod error;
pub mod generate;
pub mod gpu;
pub mod pipeline;
pub mod probe;
pub mod rc;
pub mod version;

pub use env::BuildEnv;
pub use error::{BazelError, Result};
pub use generate::generate;
pub use gpu::{CudaConfig, GpuBackend, RocmConfig};
pub use pipeline::{configure, ConfigureOptions, ConfigureOutput};
pub use probe::{BazelBinary, BazelProbe};
pub use rc::{Bazelrc, Directive, RcCommand, BAZELRC};
pub use version::{check_version, select_required_version, VersionCheck};
