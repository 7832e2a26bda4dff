//! GPU backend configuration blocks.

use serde::Serialize;

use crate::rc::Bazelrc;

/// CUDA toolchain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CudaConfig {
    pub toolkit_path: String,
    pub cudnn_install_path: String,
    pub cuda_version: String,
    pub cudnn_version: String,
}

/// ROCm toolchain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RocmConfig {
    pub rocm_path: String,
}

/// Which ops get built besides the CPU ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "backend")]
pub enum GpuBackend {
    Cpu,
    Cuda(CudaConfig),
    Rocm(RocmConfig),
}

impl GpuBackend {
    /// Progress line shown to the user.
    pub fn description(&self) -> &'static str {
        match self {
            GpuBackend::Cpu => "> Building only CPU ops",
            GpuBackend::Cuda(_) => "> Building CUDA GPU & CPU ops",
            GpuBackend::Rocm(_) => "> Building ROCM GPU & CPU ops",
        }
    }

    /// Append this backend's block. The CPU backend adds nothing.
    pub fn append_to(&self, rc: &mut Bazelrc) {
        match self {
            GpuBackend::Cpu => {}
            GpuBackend::Cuda(cuda) => {
                rc.action_env("TF_NEED_CUDA", "1")
                    .action_env("CUDA_TOOLKIT_PATH", &cuda.toolkit_path)
                    .action_env("CUDNN_INSTALL_PATH", &cuda.cudnn_install_path)
                    .action_env("TF_CUDA_VERSION", &cuda.cuda_version)
                    .action_env("TF_CUDNN_VERSION", &cuda.cudnn_version)
                    .test("--config=cuda")
                    .build("--config=cuda")
                    .build_config(
                        "cuda",
                        "--define=using_cuda=true --define=using_cuda_nvcc=true",
                    )
                    .build_config(
                        "cuda",
                        "--crosstool_top=@local_config_cuda//crosstool:toolchain",
                    );
            }
            GpuBackend::Rocm(rocm) => {
                rc.action_env("TF_NEED_ROCM", "1")
                    .action_env("ROCM_PATH", &rocm.rocm_path)
                    .test("--config=rocm")
                    .build("--config=rocm")
                    .build_config("rocm", "--define=using_rocm_hipcc=true")
                    .build_config("rocm", "--define=tensorflow_mkldnn_contraction_kernel=0")
                    .build_config("rocm", "--repo_env TF_NEED_ROCM=1")
                    .build_config(
                        "rocm",
                        "--crosstool_top=@local_config_rocm//crosstool:toolchain",
                    );
            }
        }
    }
}
