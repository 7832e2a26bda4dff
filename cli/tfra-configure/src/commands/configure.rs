//! `tfra-configure configure` — write the build configuration.

use std::fs;

use anyhow::{Context, Result};
use tfra_bazel::rc::remove_stale;
use tfra_bazel::{configure, BazelBinary, BazelProbe, BuildEnv, ConfigureOptions};
use tfra_framework::{Introspect, PythonProbe};
use tfra_host::HostPlatform;

use crate::manifest::Settings;

/// Probe the host and write the configuration file.
pub fn run(settings: &Settings, skip_bazel_check: bool) -> Result<()> {
    let host = HostPlatform::detect()?;
    write_config(
        settings,
        host,
        BuildEnv::from_env(),
        &PythonProbe::new(&settings.python),
        &BazelBinary::new(&settings.bazel),
        !skip_bazel_check,
    )
}

/// Print the configuration a run would write.
pub fn show(settings: &Settings) -> Result<()> {
    let host = HostPlatform::detect()?;
    let options = ConfigureOptions {
        host,
        source_root: settings.source_root.clone(),
        env: BuildEnv::from_env(),
        check_bazel: true,
        extract_headers: false,
    };
    let output = configure(
        &options,
        &PythonProbe::new(&settings.python),
        &BazelBinary::new(&settings.bazel),
    )
    .context("generating build configuration")?;
    print!("{}", output.bazelrc.render());
    Ok(())
}

/// Generate and write the configuration for an already-detected host.
///
/// The previous file is deleted before anything is checked, so a failed
/// run leaves no configuration behind.
pub fn write_config(
    settings: &Settings,
    host: HostPlatform,
    env: BuildEnv,
    framework: &dyn Introspect,
    bazel: &dyn BazelProbe,
    check_bazel: bool,
) -> Result<()> {
    println!();
    println!("Configuring TensorFlow Recommenders-Addons to be built from source...");

    remove_stale(&settings.output)
        .with_context(|| format!("removing {}", settings.output.display()))?;

    let options = ConfigureOptions {
        host,
        source_root: settings.source_root.clone(),
        env,
        check_bazel,
        extract_headers: true,
    };
    let output = configure(&options, framework, bazel).context("generating build configuration")?;
    println!("{}", output.backend.description());

    output
        .bazelrc
        .write_to(&settings.output)
        .with_context(|| format!("writing {}", settings.output.display()))?;

    println!();
    println!(
        "Build configurations successfully written to {} :",
        settings.output.display()
    );
    println!();
    let written = fs::read_to_string(&settings.output)
        .with_context(|| format!("reading {}", settings.output.display()))?;
    print!("{written}");
    Ok(())
}
