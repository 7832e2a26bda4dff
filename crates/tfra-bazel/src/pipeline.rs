//! Configuration pipeline orchestrator.

use std::path::PathBuf;

use tfra_framework::{BundledHeaders, FrameworkInstallInfo, Introspect};
use tfra_host::HostPlatform;

use crate::env::BuildEnv;
use crate::error::Result;
use crate::generate::generate;
use crate::gpu::GpuBackend;
use crate::probe::BazelProbe;
use crate::rc::Bazelrc;
use crate::version::{check_version, select_required_version, Version, VersionCheck};

/// Inputs of a configuration run.
#[derive(Debug, Clone)]
pub struct ConfigureOptions {
    /// Resolved build host.
    pub host: HostPlatform,
    /// Repository root holding `build_deps/`.
    pub source_root: PathBuf,
    /// Environment-driven settings.
    pub env: BuildEnv,
    /// Whether to compare the installed Bazel against the requirement.
    pub check_bazel: bool,
    /// Whether to unpack bundled headers for pre-2.0 releases.
    pub extract_headers: bool,
}

/// Result of a successful configuration run.
#[derive(Debug, Clone)]
pub struct ConfigureOutput {
    /// Resolved framework metadata.
    pub info: FrameworkInstallInfo,
    /// Bazel version the build requires.
    pub required_bazel: Version,
    /// Installed Bazel version, when it was checked.
    pub installed_bazel: Option<String>,
    /// Selected GPU backend.
    pub backend: GpuBackend,
    /// The generated configuration, not yet written.
    pub bazelrc: Bazelrc,
}

/// Run the configuration pipeline:
/// introspect -> bazel requirement + check -> resolve install -> headers -> generate.
pub fn configure(
    options: &ConfigureOptions,
    framework: &dyn Introspect,
    bazel: &dyn BazelProbe,
) -> Result<ConfigureOutput> {
    // Stage 1: Introspect the framework
    let sysconfig = framework.sysconfig()?;
    let version = sysconfig.parsed_version()?;

    // Stage 2: Bazel requirement and check
    let required_bazel = select_required_version(options.host, &version);
    let check = VersionCheck::for_host(options.host);
    let installed_bazel = if !options.check_bazel {
        log::warn!("skipping Bazel version check (Bazel {required_bazel} is expected)");
        None
    } else if check == VersionCheck::Skip {
        log::info!("Bazel version is not checked on {}", options.host);
        None
    } else {
        let installed = bazel.installed_version()?;
        check_version(&installed, &required_bazel, check)?;
        Some(installed)
    };

    // Stage 3: Resolve headers and shared library
    let info = FrameworkInstallInfo::resolve(&sysconfig, options.host, &options.source_root)?;

    // Stage 4: Unpack bundled headers for legacy releases
    if info.uses_bundled_headers() && options.extract_headers {
        BundledHeaders::new(&options.source_root, info.version.as_str()).extract()?;
    }

    // Stage 5: Generate directives
    let backend = options.env.gpu_backend();
    let bazelrc = generate(options.host, &info, &options.env);

    Ok(ConfigureOutput {
        info,
        required_bazel,
        installed_bazel,
        backend,
        bazelrc,
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::Path;
    use std::process::Command;

    use tfra_framework::{FrameworkError, Sysconfig};

    use super::*;
    use crate::error::BazelError;

    struct FixedBazel {
        version: &'static str,
        calls: Cell<usize>,
    }

    impl FixedBazel {
        fn new(version: &'static str) -> Self {
            Self {
                version,
                calls: Cell::new(0),
            }
        }
    }

    impl BazelProbe for FixedBazel {
        fn installed_version(&self) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.version.to_string())
        }
    }

    struct NotInstalled;

    impl Introspect for NotInstalled {
        fn sysconfig(&self) -> tfra_framework::Result<Sysconfig> {
            Err(FrameworkError::NotInstalled {
                interpreter: "python3".into(),
                detail: "No module named 'tensorflow'".into(),
            })
        }
    }

    fn sysconfig(version: &str) -> Sysconfig {
        Sysconfig {
            version: version.into(),
            compile_flags: vec!["-I/py/tensorflow/include".into()],
            link_flags: vec![
                "-L/py/tensorflow".into(),
                "-l:libtensorflow_framework.so.2".into(),
            ],
            cxx11_abi_flag: 1,
        }
    }

    fn run(
        host: HostPlatform,
        framework: &dyn Introspect,
        bazel: &dyn BazelProbe,
    ) -> Result<ConfigureOutput> {
        configure(&options(host), framework, bazel)
    }

    fn options(host: HostPlatform) -> ConfigureOptions {
        ConfigureOptions {
            host,
            source_root: PathBuf::from("/src/tfra"),
            env: BuildEnv::default(),
            check_bazel: true,
            extract_headers: false,
        }
    }

    #[test]
    fn linux_run_checks_bazel() {
        let bazel = FixedBazel::new("4.2.1");
        let out = run(HostPlatform::Linux, &sysconfig("2.5.1"), &bazel).unwrap();
        assert_eq!(bazel.calls.get(), 1);
        assert_eq!(out.required_bazel, Version::new(4, 2, 1));
        assert_eq!(out.installed_bazel.as_deref(), Some("4.2.1"));
        assert_eq!(out.info.version_integer, 2051);
        assert_eq!(out.backend, GpuBackend::Cpu);
        assert!(out.bazelrc.contains_line("build --action_env TF_VERSION_INTEGER=\"2051\""));
    }

    #[test]
    fn linux_bazel_mismatch_aborts() {
        let bazel = FixedBazel::new("5.0.0");
        let err = run(HostPlatform::Linux, &sysconfig("2.5.1"), &bazel).unwrap_err();
        assert!(matches!(err, BazelError::VersionMismatch { .. }));
        assert!(err.to_string().contains("5.0.0"));
    }

    #[test]
    fn macos_arm64_accepts_newer_bazel() {
        let bazel = FixedBazel::new("5.3.0");
        let out = run(HostPlatform::MacOsArm64, &sysconfig("2.5.1"), &bazel).unwrap();
        assert_eq!(out.required_bazel, Version::new(4, 1, 0));
    }

    #[test]
    fn windows_skips_bazel_probe() {
        let bazel = FixedBazel::new("0.0.1");
        let sc = Sysconfig {
            compile_flags: vec![r"-IC:\py\tensorflow\include".into()],
            ..sysconfig("2.5.1")
        };
        let out = run(HostPlatform::Windows, &sc, &bazel).unwrap();
        assert_eq!(bazel.calls.get(), 0);
        assert!(out.installed_bazel.is_none());
        assert!(out.bazelrc.contains_line("build:windows --copt=/arch=AVX"));
    }

    #[test]
    fn disabled_check_skips_probe() {
        let bazel = FixedBazel::new("0.0.1");
        let mut opts = options(HostPlatform::Linux);
        opts.check_bazel = false;
        configure(&opts, &sysconfig("2.5.1"), &bazel).unwrap();
        assert_eq!(bazel.calls.get(), 0);
    }

    #[test]
    fn missing_framework_is_reported() {
        let bazel = FixedBazel::new("4.2.1");
        let err = run(HostPlatform::Linux, &NotInstalled, &bazel).unwrap_err();
        assert!(matches!(
            err,
            BazelError::Framework(FrameworkError::NotInstalled { .. })
        ));
    }

    #[test]
    fn malformed_version_is_reported() {
        let bazel = FixedBazel::new("4.2.1");
        let err = run(HostPlatform::Linux, &sysconfig("10.0.0"), &bazel).unwrap_err();
        assert!(matches!(
            err,
            BazelError::Framework(FrameworkError::MalformedVersion { .. })
        ));
    }

    #[test]
    fn legacy_release_without_extraction() {
        let bazel = FixedBazel::new("0.26.1");
        let out = run(HostPlatform::Linux, &sysconfig("1.15.2"), &bazel).unwrap();
        assert_eq!(out.required_bazel, Version::new(0, 26, 1));
        assert!(out.info.uses_bundled_headers());
        assert!(out.bazelrc.contains_line(
            "build --action_env TF_HEADER_DIR=\"/src/tfra/build_deps/tf_header/1.15.2/tensorflow\""
        ));
    }

    #[test]
    fn legacy_release_extraction_failure_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(HostPlatform::Linux);
        opts.source_root = dir.path().to_path_buf();
        opts.extract_headers = true;
        let err = configure(&opts, &sysconfig("1.15.2"), &FixedBazel::new("0.26.1")).unwrap_err();
        assert!(matches!(
            err,
            BazelError::Framework(FrameworkError::ExtractionFailed { .. })
        ));
    }

    #[test]
    fn pre_1_0_release_checks_bazel_then_fails_on_version_integer() {
        let bazel = FixedBazel::new("0.26.1");
        let err = run(HostPlatform::Linux, &sysconfig("0.12.1"), &bazel).unwrap_err();
        assert_eq!(bazel.calls.get(), 1);
        assert!(matches!(
            err,
            BazelError::Framework(FrameworkError::VersionIntegerLength { .. })
        ));
    }

    fn pack_headers(source_root: &Path, version: &str) {
        let archive_dir = source_root.join("build_deps/tf_header");
        let include = archive_dir.join(version).join("tensorflow/core/public");
        std::fs::create_dir_all(&include).unwrap();
        std::fs::write(include.join("version.h"), "#define TF_MAJOR_VERSION 1\n").unwrap();
        let status = Command::new("tar")
            .arg("-zcf")
            .arg(format!("{version}.tar.gz"))
            .arg(version)
            .current_dir(&archive_dir)
            .status()
            .unwrap();
        assert!(status.success());
        std::fs::remove_dir_all(archive_dir.join(version)).unwrap();
    }

    #[test]
    fn legacy_release_extracts_bundled_headers() {
        let dir = tempfile::tempdir().unwrap();
        pack_headers(dir.path(), "1.15.2");
        let mut opts = options(HostPlatform::Linux);
        opts.source_root = dir.path().to_path_buf();
        opts.extract_headers = true;

        let out = configure(&opts, &sysconfig("1.15.2"), &FixedBazel::new("0.26.1")).unwrap();
        let header_dir = dir.path().join("build_deps/tf_header/1.15.2/tensorflow");
        assert!(header_dir.join("core/public/version.h").is_file());
        assert_eq!(out.info.header_dir, header_dir.display().to_string());
    }
}
