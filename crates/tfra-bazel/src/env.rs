//! Build settings read from environment variables.

use serde::Serialize;

use crate::gpu::{CudaConfig, GpuBackend, RocmConfig};

pub const FOR_TF_SERVING: &str = "FOR_TF_SERVING";
pub const TF_NEED_CUDA: &str = "TF_NEED_CUDA";
pub const TF_NEED_ROCM: &str = "TF_NEED_ROCM";
pub const CUDA_TOOLKIT_PATH: &str = "CUDA_TOOLKIT_PATH";
pub const CUDNN_INSTALL_PATH: &str = "CUDNN_INSTALL_PATH";
pub const TF_CUDA_VERSION: &str = "TF_CUDA_VERSION";
pub const TF_CUDNN_VERSION: &str = "TF_CUDNN_VERSION";
pub const ROCM_PATH: &str = "ROCM_PATH";

/// Environment-driven build settings, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEnv {
    /// `FOR_TF_SERVING`, passed through verbatim.
    pub for_tf_serving: String,
    /// `TF_NEED_CUDA` is `1`.
    pub need_cuda: bool,
    /// `TF_NEED_ROCM` is `1`.
    pub need_rocm: bool,
    pub cuda: CudaConfig,
    pub rocm: RocmConfig,
}

impl BuildEnv {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through a lookup function.
    ///
    /// A variable that is set, even to an empty string, overrides its default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Self {
            for_tf_serving: var(FOR_TF_SERVING, "0"),
            need_cuda: var(TF_NEED_CUDA, "0") == "1",
            need_rocm: var(TF_NEED_ROCM, "0") == "1",
            cuda: CudaConfig {
                toolkit_path: var(CUDA_TOOLKIT_PATH, "/usr/local/cuda"),
                cudnn_install_path: var(CUDNN_INSTALL_PATH, "/usr/lib/x86_64-linux-gnu"),
                cuda_version: var(TF_CUDA_VERSION, "11.0"),
                cudnn_version: var(TF_CUDNN_VERSION, "8.0"),
            },
            rocm: RocmConfig {
                rocm_path: var(ROCM_PATH, "/opt/rocm"),
            },
        }
    }

    /// The GPU backend requested. CUDA takes precedence over ROCm.
    pub fn gpu_backend(&self) -> GpuBackend {
        if self.need_cuda {
            GpuBackend::Cuda(self.cuda.clone())
        } else if self.need_rocm {
            GpuBackend::Rocm(self.rocm.clone())
        } else {
            GpuBackend::Cpu
        }
    }
}

impl Default for BuildEnv {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
