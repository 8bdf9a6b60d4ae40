//! Test target composition.
//!
//! Two rule flavors build runnable test targets from a combined source
//! set. They differ only in the entry-point filename suffix convention
//! (`*Spec.groovy` for Spock specifications, `*Test.groovy` for
//! JUnit-style tests) and in whether resource files are threaded into the
//! helper library. Everything else is shared: augment dependencies with
//! the configured test framework, compile non-entry-point sources into an
//! intermediate library, then generate the runner script.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::action::ActionPlan;
use crate::closure::DependencyClosure;
use crate::config::Config;
use crate::consts::{JUNIT_SUFFIX, SPOCK_SUFFIX};
use crate::library::{self, LibraryDef};
use crate::source;
use crate::testgen::{self, TestGenError, TestScript};
use crate::unit::{Dep, Unit, UnitKind};

/// Configuration failures raised before any build action is planned.
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
  #[error("no test entry points found: expected at least one `*{suffix}.groovy` source")]
  NoEntryPoints { suffix: String },

  #[error(transparent)]
  TestGen(#[from] TestGenError),
}

/// Declaration of a test unit.
///
/// `size` and `tags` are execution metadata passed through unmodified.
#[derive(Debug, Clone, Default)]
pub struct TestDef {
  pub name: String,
  pub srcs: Vec<PathBuf>,
  pub deps: Vec<Dep>,
  pub resources: Vec<PathBuf>,
  pub data: Vec<PathBuf>,
  pub jvm_flags: Vec<String>,
  pub size: Option<String>,
  pub tags: Vec<String>,
}

/// A composed, runnable test target.
#[derive(Debug, Clone, PartialEq)]
pub struct TestTarget {
  pub unit: Unit,
  pub script: TestScript,
  pub size: Option<String>,
  pub tags: Vec<String>,
}

/// Compose a Spock test target from `*Spec.groovy` entry points.
pub fn spock_test(def: &TestDef, config: &Config) -> Result<(TestTarget, Vec<ActionPlan>), RuleError> {
  compose_test(def, SPOCK_SUFFIX, false, config)
}

/// Compose a JUnit-style test target from `*Test.groovy` entry points,
/// threading resources and runtime data through.
pub fn groovy_test(def: &TestDef, config: &Config) -> Result<(TestTarget, Vec<ActionPlan>), RuleError> {
  compose_test(def, JUNIT_SUFFIX, true, config)
}

fn compose_test(
  def: &TestDef,
  suffix: &str,
  thread_resources: bool,
  config: &Config,
) -> Result<(TestTarget, Vec<ActionPlan>), RuleError> {
  let mut deps = def.deps.clone();
  deps.extend(config.test_framework.iter().cloned().map(Dep::Archive));

  let (entry_points, helpers): (Vec<PathBuf>, Vec<PathBuf>) = def
    .srcs
    .iter()
    .cloned()
    .partition(|src| source::is_entry_point(src, suffix));

  if entry_points.is_empty() {
    return Err(RuleError::NoEntryPoints {
      suffix: suffix.to_string(),
    });
  }

  let mut plans = Vec::new();
  if !helpers.is_empty() {
    let helper_def = LibraryDef {
      name: format!("{}-lib", def.name),
      srcs: helpers,
      deps: deps.clone(),
      resources: if thread_resources { def.resources.clone() } else { Vec::new() },
      visibility: Vec::new(),
      testonly: true,
    };
    let (helper_lib, helper_plans) = library::compose(&helper_def, config);
    debug!(unit = %def.name, helper = %helper_lib.unit.name, "built intermediate test library");
    plans.extend(helper_plans);
    deps.push(Dep::Library(helper_lib));
  }

  let closure = DependencyClosure::resolve(&deps);
  let (script, script_plan) = testgen::generate(
    &def.name,
    &entry_points,
    &closure,
    &def.jvm_flags,
    &def.data,
    config,
  )?;
  plans.push(script_plan);

  let target = TestTarget {
    unit: Unit {
      name: def.name.clone(),
      kind: UnitKind::Test,
      visibility: Vec::new(),
      testonly: true,
    },
    script,
    size: def.size.clone(),
    tags: def.tags.clone(),
  };
  Ok((target, plans))
}
