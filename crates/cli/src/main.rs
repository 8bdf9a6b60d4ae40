use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

use jargo_lib::consts::DEFAULT_MANIFEST_FILE;
use output::OutputFormat;

/// jargo - dependency-aware build and test pipeline for mixed
/// Groovy/Java projects
#[derive(Parser)]
#[command(name = "jargo")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the project manifest
  #[arg(short, long, global = true, default_value = DEFAULT_MANIFEST_FILE)]
  manifest: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Resolve the project and show the emitted action plans
  Plan {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Build a target and its dependencies (or the whole project)
  Build {
    /// Target to build; everything when omitted
    target: Option<String>,
  },

  /// Build a test target, then run its generated script
  Test {
    /// Test target to run
    target: String,
  },

  /// Show toolchain configuration and produced artifacts
  Status,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Plan { format } => cmd::cmd_plan(&cli.manifest, format),
    Commands::Build { target } => cmd::cmd_build(&cli.manifest, target.as_deref()),
    Commands::Test { target } => cmd::cmd_test(&cli.manifest, &target),
    Commands::Status => cmd::cmd_status(&cli.manifest),
  }
}
