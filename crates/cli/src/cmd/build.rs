//! Implementation of the `jargo build` command.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};

use jargo_lib::config::Config;
use jargo_lib::execute;
use jargo_lib::manifest::ProjectManifest;
use jargo_lib::project::Project;

use crate::output::{self, format_duration};

pub fn cmd_build(manifest_path: &Path, target: Option<&str>) -> Result<()> {
  let started = Instant::now();

  let manifest = ProjectManifest::load(manifest_path)
    .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

  let config = Config::from_env();
  let project = Project::resolve(&manifest, &config).context("Failed to resolve project")?;

  let plans = match target {
    Some(name) => project
      .plans_for(name)
      .ok_or_else(|| anyhow!("unknown target: {name}"))?,
    None => project.all_plans(),
  };

  tracing::debug!(plans = plans.len(), "resolved build set");

  if plans.is_empty() {
    output::print_success("Nothing to build");
    return Ok(());
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt
    .block_on(execute::run_plans(&plans, &config))
    .context("Build failed")?;

  output::print_success(&format!(
    "Built {} artifact(s) in {}",
    report.artifact_count(),
    format_duration(started.elapsed())
  ));

  Ok(())
}
