//! Library composition.
//!
//! Composes a mixed Groovy/Java source set, dependencies, and optional
//! resources into one importable unit. Compilation is two-stage: the Java
//! stage sees only the caller's declared dependencies, and the Groovy stage
//! additionally sees the Java stage's archive. The reverse direction never
//! happens, which is what keeps the layering one-directional.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::action::{ActionPlan, StagedFile, Step};
use crate::closure::DependencyClosure;
use crate::compile;
use crate::config::Config;
use crate::source;
use crate::unit::{Artifact, Dep, LibraryRef, Stage, Unit, UnitKind};

/// Declaration of a library unit.
#[derive(Debug, Clone, Default)]
pub struct LibraryDef {
  pub name: String,
  pub srcs: Vec<PathBuf>,
  pub deps: Vec<Dep>,
  pub resources: Vec<PathBuf>,
  pub visibility: Vec<String>,
  pub testonly: bool,
}

/// Compose a library: partition sources, plan the per-stage builds, and
/// merge whichever archives exist into one composite unit.
///
/// A declaration with no recognized sources and no resources is permitted
/// and yields an empty composite: a unit that only re-exports its
/// dependencies' closures.
pub fn compose(def: &LibraryDef, config: &Config) -> (LibraryRef, Vec<ActionPlan>) {
  let part = source::partition(&def.srcs);
  for skipped in &part.skipped {
    debug!(unit = %def.name, path = %skipped.display(), "ignoring unrecognized source");
  }

  let direct = DependencyClosure::resolve(&def.deps);
  let mut artifacts: Vec<Artifact> = Vec::new();
  let mut plans = Vec::new();

  if !part.java.is_empty() {
    let jar = Artifact::for_unit(&config.out_root, &def.name, Stage::Java);
    plans.push(compile::java_stage(&def.name, &part.java, &direct, &jar.path));
    artifacts.push(jar);
  }

  if !part.groovy.is_empty() {
    // The scripting stage compiles against the compiled stage's output,
    // never the other way around.
    let mut closure = direct.clone();
    if let Some(java) = artifacts.iter().find(|a| a.stage == Stage::Java) {
      closure.insert(java.path.clone());
    }
    let jar = Artifact::for_unit(&config.out_root, &def.name, Stage::Groovy);
    plans.push(compile::groovy_stage(&def.name, &part.groovy, &closure, &jar.path));
    artifacts.push(jar);
  }

  if !def.resources.is_empty() {
    let jar = Artifact::for_unit(&config.out_root, &def.name, Stage::Resources);
    plans.push(resource_plan(&def.name, &def.resources, &jar.path));
    artifacts.push(jar);
  }

  let mut runtime_closure: BTreeSet<PathBuf> = direct.iter().cloned().collect();
  runtime_closure.extend(artifacts.iter().map(|a| a.path.clone()));

  let library = LibraryRef {
    unit: Unit {
      name: def.name.clone(),
      kind: UnitKind::Library,
      visibility: def.visibility.clone(),
      testonly: def.testonly,
    },
    artifacts,
    runtime_closure,
  };

  debug!(unit = %def.name, archives = library.artifacts.len(), "composed library");
  (library, plans)
}

/// Plan the resource-only archive: stage files into a scratch tree at
/// their archive-relative paths, then archive the tree.
fn resource_plan(unit: &str, resources: &[PathBuf], jar: &Path) -> ActionPlan {
  let scratch = compile::scratch_dir(jar);
  let files = resources
    .iter()
    .map(|src| StagedFile {
      src: src.clone(),
      rel: resource_rel(src),
    })
    .collect();

  let mut plan = ActionPlan::new(unit);
  plan.push(Step::PrepareScratch { dir: scratch.clone() });
  plan.push(Step::Stage {
    dest: scratch.clone(),
    files,
  });
  plan.push(Step::Archive {
    archive: jar.to_path_buf(),
    tree: scratch.clone(),
  });
  plan.push(Step::Cleanup { dir: scratch });
  plan.publish(jar.to_path_buf());
  plan
}

/// Archive-relative path for a resource file: everything after the last
/// `resources/` segment, or the bare filename when the convention is absent.
fn resource_rel(path: &Path) -> PathBuf {
  let normalized = path.to_string_lossy().replace('\\', "/");
  match normalized.rfind("resources/") {
    Some(idx) => PathBuf::from(&normalized[idx + "resources/".len()..]),
    None => path.file_name().map(PathBuf::from).unwrap_or_default(),
  }
}
