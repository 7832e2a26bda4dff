//! `tfra-configure doctor` — environment diagnostics.

use anyhow::Result;
use serde::Serialize;
use tfra_bazel::{
    select_required_version, BazelBinary, BazelProbe, BuildEnv, GpuBackend, VersionCheck,
};
use tfra_framework::{FrameworkInstallInfo, Introspect, PythonProbe};
use tfra_host::{HostEnvironment, HostPlatform};

use crate::manifest::Settings;

/// Everything the doctor found. Probe failures are recorded, not raised.
#[derive(Debug, Serialize)]
struct DoctorReport {
    tool_version: &'static str,
    settings: Settings,
    host: Option<HostEnvironment>,
    platform: Option<HostPlatform>,
    host_error: Option<String>,
    framework: Option<FrameworkInstallInfo>,
    framework_error: Option<String>,
    required_bazel: Option<String>,
    bazel_check: Option<VersionCheck>,
    installed_bazel: Option<String>,
    bazel_error: Option<String>,
    env: BuildEnv,
    gpu: GpuBackend,
}

impl DoctorReport {
    fn collect(settings: &Settings, framework: &dyn Introspect, bazel: &dyn BazelProbe) -> Self {
        let env = BuildEnv::from_env();
        let mut report = DoctorReport {
            tool_version: env!("CARGO_PKG_VERSION"),
            settings: settings.clone(),
            host: None,
            platform: None,
            host_error: None,
            framework: None,
            framework_error: None,
            required_bazel: None,
            bazel_check: None,
            installed_bazel: None,
            bazel_error: None,
            gpu: env.gpu_backend(),
            env,
        };

        match HostEnvironment::detect() {
            Ok(host) => {
                report.platform = Some(HostPlatform::from_environment(&host));
                report.host = Some(host);
            }
            Err(e) => report.host_error = Some(e.to_string()),
        }

        match bazel.installed_version() {
            Ok(version) => report.installed_bazel = Some(version),
            Err(e) => report.bazel_error = Some(e.to_string()),
        }

        let Some(platform) = report.platform else {
            return report;
        };
        report.bazel_check = Some(VersionCheck::for_host(platform));

        let info = framework.sysconfig().and_then(|sc| {
            FrameworkInstallInfo::resolve(&sc, platform, &settings.source_root)
        });
        match info {
            Ok(info) => {
                report.required_bazel =
                    Some(select_required_version(platform, &info.version).to_string());
                report.framework = Some(info);
            }
            Err(e) => report.framework_error = Some(e.to_string()),
        }

        report
    }

    fn print(&self) {
        println!("=== TFRA Configure Doctor ===");
        println!();
        println!("tfra-configure version: {}", self.tool_version);
        println!();

        println!("--- Host ---");
        match (&self.host, &self.platform) {
            (Some(host), Some(platform)) => {
                println!("  OS:        {}", host.os.name());
                println!("  Machine:   {}", host.machine);
                println!("  Platform:  {platform}");
            }
            _ => println!(
                "  error: {}",
                self.host_error.as_deref().unwrap_or("unknown")
            ),
        }
        println!();

        println!("--- TensorFlow ({}) ---", self.settings.python);
        match &self.framework {
            Some(info) => {
                println!("  Version:         {}", info.version);
                println!("  Version integer: {}", info.version_integer);
                println!("  Header dir:      {}", info.header_dir);
                println!("  Library dir:     {}", info.shared_lib_dir);
                println!("  Library name:    {}", info.shared_lib_name);
                println!("  CXX11 ABI flag:  {}", info.cxx11_abi_flag);
                if info.uses_bundled_headers() {
                    println!("  Headers:         bundled archive (pre-2.0 release)");
                }
            }
            None => println!(
                "  not found: {}",
                self.framework_error.as_deref().unwrap_or("host unknown")
            ),
        }
        println!();

        println!("--- Bazel ({}) ---", self.settings.bazel);
        println!(
            "  Installed: {}",
            self.installed_bazel.as_deref().unwrap_or("not found")
        );
        if let Some(required) = &self.required_bazel {
            println!("  Required:  {required}");
        }
        if let Some(check) = self.bazel_check {
            let rule = match check {
                VersionCheck::Exact => "exact match",
                VersionCheck::AtLeast => "minimum version",
                VersionCheck::Skip => "not checked on this host",
            };
            println!("  Check:     {rule}");
        }
        if let Some(e) = &self.bazel_error {
            println!("  error: {e}");
        }
        println!();

        println!("--- Build Settings ---");
        println!("  GPU:            {}", self.gpu.description());
        println!("  FOR_TF_SERVING: {}", self.env.for_tf_serving);
        println!("  Output:         {}", self.settings.output.display());
        match &self.settings.manifest_dir {
            Some(dir) => println!("  configure.toml: found at {}", dir.display()),
            None => println!("  configure.toml: not found"),
        }
    }
}

/// Print diagnostic information. Never fails on a missing tool.
pub fn run(settings: &Settings, json: bool) -> Result<()> {
    let report = DoctorReport::collect(
        settings,
        &PythonProbe::new(&settings.python),
        &BazelBinary::new(&settings.bazel),
    );
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}
