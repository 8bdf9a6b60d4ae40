//! Implementation of the `jargo plan` command.
//!
//! Resolves the project manifest and prints the action plans that a build
//! would execute, without running anything.

use std::path::Path;

use anyhow::{Context, Result};

use jargo_lib::config::Config;
use jargo_lib::manifest::ProjectManifest;
use jargo_lib::project::Project;
use jargo_lib::util::hash::Hashable;

use crate::output::{self, OutputFormat, symbols, truncate_hash};

pub fn cmd_plan(manifest_path: &Path, format: OutputFormat) -> Result<()> {
  let manifest = ProjectManifest::load(manifest_path)
    .with_context(|| format!("Failed to load manifest: {}", manifest_path.display()))?;

  let config = Config::from_env();
  let project = Project::resolve(&manifest, &config).context("Failed to resolve project")?;

  let plans = project.all_plans();

  if format.is_json() {
    return output::print_json(&plans);
  }

  println!("Manifest: {}", manifest_path.display());
  println!("Libraries: {}", project.libraries.len());
  println!("Tests: {}", project.tests.len());
  println!("Plans: {}", plans.len());

  for plan in plans {
    let fingerprint = plan.compute_hash().context("Failed to fingerprint plan")?;
    let outputs = plan
      .outputs
      .iter()
      .map(|p| p.display().to_string())
      .collect::<Vec<_>>()
      .join(", ");
    println!(
      "  {}  {}  {} step(s) {} {}",
      plan.unit,
      truncate_hash(&fingerprint.0),
      plan.steps.len(),
      symbols::ARROW,
      outputs
    );
  }

  Ok(())
}
