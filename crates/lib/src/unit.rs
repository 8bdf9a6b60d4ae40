//! Core build-node types: units, stages, artifacts, and dependencies.
//!
//! A `Unit` is a named build node declared once by the caller and never
//! mutated afterwards. Libraries produce a `LibraryRef` describing the
//! archives they publish plus the transitive runtime closure downstream
//! consumers need.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::util::hash::Hashable;

/// What kind of build node a unit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
  Library,
  Test,
}

/// A declared build node.
///
/// `visibility` and `testonly` are passed through from the declaration
/// unmodified; the pipeline itself does not interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
  pub name: String,
  pub kind: UnitKind,
  #[serde(default)]
  pub visibility: Vec<String>,
  #[serde(default)]
  pub testonly: bool,
}

/// Compilation stage an archive was produced by.
///
/// The derived ordering is the precedence order in which a composite
/// library's archives are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
  Java,
  Groovy,
  Resources,
}

impl Stage {
  /// Token embedded in the archive filename for this stage.
  pub fn token(self) -> &'static str {
    match self {
      Stage::Java => "java",
      Stage::Groovy => "groovy",
      Stage::Resources => "resources",
    }
  }
}

/// A single produced archive.
///
/// The path is deterministic: `<out_root>/<unit>/lib<unit>-<stage>.jar`.
/// Produced exactly once per build, consumed any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  pub stage: Stage,
  pub path: PathBuf,
}

impl Artifact {
  pub fn for_unit(out_root: &Path, unit: &str, stage: Stage) -> Self {
    let file = format!("lib{}-{}.jar", unit, stage.token());
    Artifact {
      stage,
      path: crate::store::unit_out_dir(out_root, unit).join(file),
    }
  }
}

/// A built library exposed as one importable unit.
///
/// Archives are kept in stage precedence order (java, groovy, resources;
/// any subset may be present). The runtime closure is recorded at construction time so
/// dependents can union it in without re-walking the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryRef {
  pub unit: Unit,
  pub artifacts: Vec<Artifact>,
  pub runtime_closure: BTreeSet<PathBuf>,
}

impl Hashable for LibraryRef {}

impl LibraryRef {
  /// The archive produced by a given stage, if that stage ran.
  pub fn artifact(&self, stage: Stage) -> Option<&Artifact> {
    self.artifacts.iter().find(|a| a.stage == stage)
  }

  pub fn artifact_paths(&self) -> impl Iterator<Item = &PathBuf> {
    self.artifacts.iter().map(|a| &a.path)
  }
}

/// A direct dependency of a unit.
///
/// Either a pre-built archive sitting on disk, or a library built by this
/// pipeline (which carries its own recorded closure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dep {
  Archive(PathBuf),
  Library(LibraryRef),
}
