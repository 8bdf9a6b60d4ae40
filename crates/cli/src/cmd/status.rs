//! Implementation of the `jargo status` command.

use std::path::Path;

use anyhow::Result;

use jargo_lib::config::Config;
use jargo_lib::store;

use crate::output::{format_bytes, print_stat};

pub fn cmd_status(manifest_path: &Path) -> Result<()> {
  let config = Config::from_env();

  println!("jargo v{}", env!("CARGO_PKG_VERSION"));
  println!();
  print_stat("Manifest", &manifest_path.display().to_string());
  print_stat("Out root", &config.out_root.display().to_string());
  print_stat("javac", &config.javac.display().to_string());
  print_stat("groovyc", &config.groovyc.display().to_string());
  print_stat("jar", &config.jar.display().to_string());
  print_stat("Test root", &config.test_source_root);

  let artifacts = store::list_artifacts(&config.out_root);
  println!();
  println!("Artifacts: {}", artifacts.len());
  for artifact in artifacts {
    print_stat(&artifact.path.display().to_string(), &format_bytes(artifact.bytes));
  }

  Ok(())
}
