//! TFRA configure: writes the `.bazelrc` for building TensorFlow
//! Recommenders-Addons from source.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use manifest::{Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "tfra-configure",
    version,
    about = "Configure TensorFlow Recommenders-Addons to be built from source"
)]
struct Cli {
    /// Print debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Python interpreter with TensorFlow installed (default: $PYTHON_BIN_PATH or python3)
    #[arg(long, global = true)]
    python: Option<String>,
    /// Bazel binary whose version is checked (default: bazel)
    #[arg(long, global = true)]
    bazel: Option<String>,
    /// Configuration file to write (default: .bazelrc)
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Repository root holding build_deps/ (default: manifest directory or cwd)
    #[arg(long, global = true)]
    source_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the host and TensorFlow, check Bazel and write the configuration (default)
    Configure {
        /// Do not compare the installed Bazel version against the required one
        #[arg(long)]
        skip_bazel_check: bool,
    },
    /// Print the configuration that would be written, without touching any file
    Show,
    /// Report host, TensorFlow, Bazel and GPU settings
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove the generated configuration file
    Clean,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
    } else {
        let level = if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let overrides = Overrides {
        python: cli.python,
        bazel: cli.bazel,
        output: cli.output,
        source_root: cli.source_root,
    };
    let settings = Settings::load(overrides, &cwd)?;

    match cli.command.unwrap_or(Commands::Configure {
        skip_bazel_check: false,
    }) {
        Commands::Configure { skip_bazel_check } => {
            commands::configure::run(&settings, skip_bazel_check)
        }
        Commands::Show => commands::configure::show(&settings),
        Commands::Doctor { json } => commands::doctor::run(&settings, json),
        Commands::Clean => commands::clean::run(&settings.output),
    }
}
