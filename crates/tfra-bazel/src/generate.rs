//! `.bazelrc` generation.

use tfra_framework::FrameworkInstallInfo;
use tfra_host::HostPlatform;

use crate::env::BuildEnv;
use crate::rc::Bazelrc;

/// Build the full configuration for a host and framework install.
///
/// Order: framework action envs, build strategy, platform codegen flags,
/// then the GPU backend block.
pub fn generate(host: HostPlatform, info: &FrameworkInstallInfo, env: &BuildEnv) -> Bazelrc {
    let mut rc = Bazelrc::new();

    rc.action_env("TF_HEADER_DIR", &info.header_dir)
        .action_env("TF_SHARED_LIBRARY_DIR", &info.shared_lib_dir)
        .action_env("TF_SHARED_LIBRARY_NAME", &info.shared_lib_name)
        .action_env("TF_CXX11_ABI_FLAG", info.cxx11_abi_flag)
        .action_env("TF_VERSION_INTEGER", info.version_integer)
        .action_env("FOR_TF_SERVING", &env.for_tf_serving);

    rc.build("--spawn_strategy=standalone")
        .build("--strategy=Genrule=standalone")
        .build("-c opt");

    match host {
        HostPlatform::Windows => {
            rc.build("--config=windows")
                .build_config("windows", "--enable_runfiles")
                .build_config("windows", "--copt=/experimental:preprocessor")
                .build_config("windows", "--host_copt=/experimental:preprocessor")
                .build_config("windows", "--copt=/arch=AVX");
        }
        // armv7l is not arm64, so the Pi gets the AVX flag too.
        HostPlatform::MacOs | HostPlatform::Linux | HostPlatform::RaspberryPi => {
            rc.build("--copt=-mavx");
        }
        HostPlatform::MacOsArm64 => {}
    }

    env.gpu_backend().append_to(&mut rc);
    rc
}
