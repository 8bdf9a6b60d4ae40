//! Test class-identity inference and runner-script generation.
//!
//! A test class's fully-qualified name is never declared; it is derived
//! from the source path's position under the conventional test-source
//! root. Inference is a pure function kept separate from script emission
//! so it can be checked without touching a compiler.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::action::{ActionPlan, Step};
use crate::closure::DependencyClosure;
use crate::config::Config;
use crate::consts::{GROOVY_EXT, TEST_RUNNER_MAIN};

/// Configuration-time failures raised before any build action is planned.
#[derive(Debug, Error, PartialEq)]
pub enum TestGenError {
  #[error("no test sources provided")]
  NoTestSources,

  #[error("test source {path} does not contain the test source root `{root}`")]
  OutsideTestRoot { path: PathBuf, root: String },
}

/// Derive a fully-qualified class name from a test source path.
///
/// The path must contain `root`; the identity is the segment between the
/// end of `root` and the `.groovy` extension, with path separators turned
/// into package separators.
pub fn infer_class_name(path: &Path, root: &str) -> Result<String, TestGenError> {
  let normalized = path.to_string_lossy().replace('\\', "/");
  let idx = normalized.find(root).ok_or_else(|| TestGenError::OutsideTestRoot {
    path: path.to_path_buf(),
    root: root.to_string(),
  })?;

  let rel = &normalized[idx + root.len()..];
  let rel = rel.strip_suffix(&format!(".{}", GROOVY_EXT)).unwrap_or(rel);
  Ok(rel.trim_start_matches('/').replace('/', "."))
}

/// A generated, runnable test target.
///
/// `runfiles` is the script's runtime-environment contract: every listed
/// file must be on disk at its embedded relative path for the script to
/// execute. It is returned alongside the script, not embedded in it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestScript {
  pub path: PathBuf,
  pub body: String,
  pub classes: Vec<String>,
  pub runfiles: BTreeSet<PathBuf>,
}

/// Generate the runner script for a set of entry-point sources.
///
/// The closure must already include the test-framework archives; the
/// generator only serializes it. Fails before emitting any plan if the
/// source list is empty or any path escapes the test-source root.
pub fn generate(
  name: &str,
  entry_points: &[PathBuf],
  closure: &DependencyClosure,
  jvm_flags: &[String],
  data: &[PathBuf],
  config: &Config,
) -> Result<(TestScript, ActionPlan), TestGenError> {
  if entry_points.is_empty() {
    return Err(TestGenError::NoTestSources);
  }

  let classes = entry_points
    .iter()
    .map(|p| infer_class_name(p, &config.test_source_root))
    .collect::<Result<Vec<_>, _>>()?;

  let flags = if jvm_flags.is_empty() {
    String::new()
  } else {
    format!(" {}", jvm_flags.join(" "))
  };
  let body = format!(
    "java{} -cp {} {} {}\n",
    flags,
    closure.classpath(),
    TEST_RUNNER_MAIN,
    classes.join(" "),
  );

  let mut runfiles: BTreeSet<PathBuf> = closure.iter().cloned().collect();
  runfiles.extend(data.iter().cloned());

  let path = crate::store::unit_out_dir(&config.out_root, name).join(name);
  debug!(unit = name, classes = classes.len(), "generated test script");

  let mut plan = ActionPlan::new(name);
  plan.push(Step::EmitScript {
    path: path.clone(),
    body: body.clone(),
  });
  plan.publish(path.clone());

  let script = TestScript {
    path,
    body,
    classes,
    runfiles,
  };
  Ok((script, plan))
}
