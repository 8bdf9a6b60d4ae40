//! Compiler-stage planning.
//!
//! Each stage compiles a homogeneous source set against a resolved closure
//! into one archive, through a private scratch directory: prepare, compile,
//! archive, cleanup. The scratch directory name is derived from the output
//! artifact path, so concurrent actions never share one.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::action::{ActionPlan, Step, Tool};
use crate::closure::DependencyClosure;

/// Scratch directory for an artifact: the artifact path with `.tmp` appended.
pub fn scratch_dir(artifact: &Path) -> PathBuf {
  PathBuf::from(format!("{}.tmp", artifact.display()))
}

/// Plan the Groovy (scripting) compilation stage.
pub fn groovy_stage(unit: &str, sources: &[PathBuf], closure: &DependencyClosure, jar: &Path) -> ActionPlan {
  stage(Tool::Groovyc, unit, sources, closure, jar)
}

/// Plan the Java (compiled) compilation stage.
pub fn java_stage(unit: &str, sources: &[PathBuf], closure: &DependencyClosure, jar: &Path) -> ActionPlan {
  stage(Tool::Javac, unit, sources, closure, jar)
}

fn stage(tool: Tool, unit: &str, sources: &[PathBuf], closure: &DependencyClosure, jar: &Path) -> ActionPlan {
  debug!(unit, tool = tool.name(), sources = sources.len(), "planning compile stage");

  let scratch = scratch_dir(jar);
  let mut plan = ActionPlan::new(unit);

  plan.push(Step::PrepareScratch { dir: scratch.clone() });
  plan.push(Step::Compile {
    tool,
    classpath: closure.to_vec(),
    out_dir: scratch.clone(),
    sources: sources.to_vec(),
  });
  plan.push(Step::Archive {
    archive: jar.to_path_buf(),
    tree: scratch.clone(),
  });
  plan.push(Step::Cleanup { dir: scratch });
  plan.publish(jar.to_path_buf());

  plan
}
