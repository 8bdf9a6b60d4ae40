//! Typed build actions.
//!
//! A plan is an explicit ordered list of steps rather than one opaque
//! command string, so each step can be dispatched, logged, and tested on
//! its own. Plans are data: pure planning functions produce them, and the
//! executor carries them out with fail-fast semantics.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::util::hash::Hashable;

/// Which external compiler a [`Step::Compile`] invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
  Javac,
  Groovyc,
}

impl Tool {
  pub fn name(self) -> &'static str {
    match self {
      Tool::Javac => "javac",
      Tool::Groovyc => "groovyc",
    }
  }
}

/// A file copied into a scratch tree before archiving, with the path it
/// takes inside the archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
  pub src: PathBuf,
  pub rel: PathBuf,
}

/// One step of a build action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
  /// Create an empty scratch directory, replacing any stale leftover.
  PrepareScratch { dir: PathBuf },

  /// Copy files into a scratch tree at their archive-relative paths.
  Stage { dest: PathBuf, files: Vec<StagedFile> },

  /// Invoke a compiler: `<tool> -cp <classpath> -d <out_dir> <sources...>`.
  Compile {
    tool: Tool,
    classpath: Vec<PathBuf>,
    out_dir: PathBuf,
    sources: Vec<PathBuf>,
  },

  /// Package a directory tree into one archive: `jar cf <archive> -C <tree> .`.
  Archive { archive: PathBuf, tree: PathBuf },

  /// Write an executable script with the given body.
  EmitScript { path: PathBuf, body: String },

  /// Remove a scratch directory.
  Cleanup { dir: PathBuf },
}

/// The ordered steps realizing one unit's outputs.
///
/// `outputs` lists every artifact the plan publishes; after a successful
/// run each of them must exist on disk. Steps abort on first failure, so a
/// failed plan publishes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
  pub unit: String,
  pub outputs: Vec<PathBuf>,
  pub steps: Vec<Step>,
}

impl Hashable for ActionPlan {}

impl ActionPlan {
  pub fn new(unit: impl Into<String>) -> Self {
    Self {
      unit: unit.into(),
      outputs: Vec::new(),
      steps: Vec::new(),
    }
  }

  pub fn push(&mut self, step: Step) {
    self.steps.push(step);
  }

  pub fn publish(&mut self, output: PathBuf) {
    self.outputs.push(output);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plan(cp: &[&str]) -> ActionPlan {
    let mut plan = ActionPlan::new("core");
    plan.push(Step::Compile {
      tool: Tool::Groovyc,
      classpath: cp.iter().map(PathBuf::from).collect(),
      out_dir: PathBuf::from("out/core/libcore-groovy.jar.tmp"),
      sources: vec![PathBuf::from("src/main/groovy/Core.groovy")],
    });
    plan.publish(PathBuf::from("out/core/libcore-groovy.jar"));
    plan
  }

  #[test]
  fn fingerprint_is_deterministic() {
    let a = plan(&["a.jar"]);
    let b = plan(&["a.jar"]);

    assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
  }

  #[test]
  fn fingerprint_changes_with_classpath() {
    let a = plan(&["a.jar"]);
    let b = plan(&["a.jar", "b.jar"]);

    assert_ne!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
  }

  #[test]
  fn fingerprint_changes_with_step_order() {
    let mut a = ActionPlan::new("core");
    a.push(Step::PrepareScratch { dir: PathBuf::from("x") });
    a.push(Step::Cleanup { dir: PathBuf::from("x") });

    let mut b = ActionPlan::new("core");
    b.push(Step::Cleanup { dir: PathBuf::from("x") });
    b.push(Step::PrepareScratch { dir: PathBuf::from("x") });

    assert_ne!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
  }
}
