//! Whole-project resolution.
//!
//! Walks the declared units in dependency order, composes each library and
//! test, and collects their action plans. Resolution is pure: it only
//! reads the manifest and emits plans; nothing touches the filesystem
//! until a plan is executed.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::info;

use crate::action::ActionPlan;
use crate::config::Config;
use crate::dag::TargetDag;
use crate::library::{self, LibraryDef};
use crate::manifest::{DepEntry, ManifestError, ProjectManifest, parse_dep};
use crate::rules::{self, RuleError, TestDef, TestTarget};
use crate::unit::{Dep, LibraryRef};

#[derive(Debug, Error)]
pub enum ProjectError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error("target `{unit}`: {source}")]
  Rule {
    unit: String,
    #[source]
    source: RuleError,
  },
}

/// A fully resolved project: every unit composed, every plan emitted.
#[derive(Debug)]
pub struct Project {
  pub libraries: BTreeMap<String, LibraryRef>,
  pub tests: BTreeMap<String, TestTarget>,
  /// Declared unit names in construction order.
  pub order: Vec<String>,
  /// Plans per declared unit (a test's entry includes its helper-library
  /// plans), keyed by declared name.
  pub plans: BTreeMap<String, Vec<ActionPlan>>,
  dag: TargetDag,
}

impl Project {
  /// Resolve a manifest into composed units and ordered action plans.
  pub fn resolve(manifest: &ProjectManifest, config: &Config) -> Result<Self, ProjectError> {
    let dag = TargetDag::from_manifest(manifest)?;
    let order = dag.construction_order()?;

    let libraries_by_name: BTreeMap<&str, &crate::manifest::LibraryDecl> =
      manifest.library.iter().map(|l| (l.name.as_str(), l)).collect();
    let spock_by_name: BTreeMap<&str, &crate::manifest::SpockTestDecl> =
      manifest.spock_test.iter().map(|t| (t.name.as_str(), t)).collect();
    let junit_by_name: BTreeMap<&str, &crate::manifest::GroovyTestDecl> =
      manifest.groovy_test.iter().map(|t| (t.name.as_str(), t)).collect();

    let mut libraries = BTreeMap::new();
    let mut tests = BTreeMap::new();
    let mut plans: BTreeMap<String, Vec<ActionPlan>> = BTreeMap::new();

    for name in &order {
      if let Some(decl) = libraries_by_name.get(name.as_str()) {
        let def = LibraryDef {
          name: decl.name.clone(),
          srcs: decl.srcs.clone(),
          deps: resolve_deps(&decl.name, &decl.deps, &libraries)?,
          resources: decl.resources.clone(),
          visibility: decl.visibility.clone(),
          testonly: decl.testonly,
        };
        let (library, unit_plans) = library::compose(&def, config);
        libraries.insert(decl.name.clone(), library);
        plans.insert(decl.name.clone(), unit_plans);
      } else if let Some(decl) = spock_by_name.get(name.as_str()) {
        let def = TestDef {
          name: decl.name.clone(),
          srcs: decl.srcs.clone(),
          deps: resolve_deps(&decl.name, &decl.deps, &libraries)?,
          jvm_flags: decl.jvm_flags.clone(),
          size: decl.size.clone(),
          tags: decl.tags.clone(),
          ..TestDef::default()
        };
        let (target, unit_plans) = rules::spock_test(&def, config).map_err(|source| ProjectError::Rule {
          unit: decl.name.clone(),
          source,
        })?;
        tests.insert(decl.name.clone(), target);
        plans.insert(decl.name.clone(), unit_plans);
      } else if let Some(decl) = junit_by_name.get(name.as_str()) {
        let def = TestDef {
          name: decl.name.clone(),
          srcs: decl.srcs.clone(),
          deps: resolve_deps(&decl.name, &decl.deps, &libraries)?,
          resources: decl.resources.clone(),
          data: decl.data.clone(),
          jvm_flags: decl.jvm_flags.clone(),
          size: decl.size.clone(),
          tags: decl.tags.clone(),
        };
        let (target, unit_plans) = rules::groovy_test(&def, config).map_err(|source| ProjectError::Rule {
          unit: decl.name.clone(),
          source,
        })?;
        tests.insert(decl.name.clone(), target);
        plans.insert(decl.name.clone(), unit_plans);
      }
    }

    info!(
      libraries = libraries.len(),
      tests = tests.len(),
      "resolved project"
    );

    Ok(Self {
      libraries,
      tests,
      order,
      plans,
      dag,
    })
  }

  /// All plans in construction order.
  pub fn all_plans(&self) -> Vec<&ActionPlan> {
    self
      .order
      .iter()
      .filter_map(|name| self.plans.get(name))
      .flatten()
      .collect()
  }

  /// Plans for one target and everything it depends on, in construction
  /// order. `None` for an undeclared target.
  pub fn plans_for(&self, target: &str) -> Option<Vec<&ActionPlan>> {
    let cone = self.dag.dependency_cone(target)?;
    Some(
      self
        .order
        .iter()
        .filter(|name| cone.contains(*name))
        .filter_map(|name| self.plans.get(name))
        .flatten()
        .collect(),
    )
  }
}

fn resolve_deps(
  unit: &str,
  deps: &[String],
  libraries: &BTreeMap<String, LibraryRef>,
) -> Result<Vec<Dep>, ProjectError> {
  deps
    .iter()
    .map(|raw| match parse_dep(raw) {
      DepEntry::Archive(path) => Ok(Dep::Archive(path)),
      DepEntry::Unit(name) => libraries
        .get(&name)
        .map(|lib| Dep::Library(lib.clone()))
        .ok_or_else(|| {
          ProjectError::Manifest(ManifestError::UnknownReference {
            unit: unit.to_string(),
            reference: name,
          })
        }),
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  const EXAMPLE: &str = r#"
    [[library]]
    name = "core"
    srcs = ["src/main/groovy/com/example/Core.groovy"]
    deps = ["third_party/guava.jar"]

    [[library]]
    name = "app"
    srcs = ["src/main/groovy/com/example/App.groovy"]
    deps = [":core"]

    [[spock_test]]
    name = "app-spec"
    srcs = ["src/test/groovy/com/example/AppSpec.groovy"]
    deps = [":app"]
  "#;

  fn resolve(content: &str) -> Result<Project, ProjectError> {
    let manifest = ProjectManifest::parse(content, Path::new("jargo.toml")).unwrap();
    Project::resolve(&manifest, &Config::default().with_out_root("out"))
  }

  #[test]
  fn resolves_libraries_before_dependent_tests() {
    let project = resolve(EXAMPLE).unwrap();

    assert_eq!(project.libraries.len(), 2);
    assert_eq!(project.tests.len(), 1);

    // `app`'s closure reaches through `core` to the pre-built archive.
    let app = &project.libraries["app"];
    assert!(app.runtime_closure.contains(Path::new("third_party/guava.jar")));
    assert!(app.runtime_closure.contains(Path::new("out/core/libcore-groovy.jar")));
  }

  #[test]
  fn all_plans_follow_construction_order() {
    let project = resolve(EXAMPLE).unwrap();

    let units: Vec<&str> = project.all_plans().iter().map(|p| p.unit.as_str()).collect();
    let pos = |name: &str| units.iter().position(|u| *u == name).unwrap();

    assert!(pos("core") < pos("app"));
    assert!(pos("app") < pos("app-spec"));
  }

  #[test]
  fn plans_for_limits_to_the_dependency_cone() {
    let content = format!("{EXAMPLE}\n[[library]]\nname = \"unrelated\"\nsrcs = [\"src/main/groovy/U.groovy\"]\n");
    let project = resolve(&content).unwrap();

    let units: Vec<&str> = project
      .plans_for("app-spec")
      .unwrap()
      .iter()
      .map(|p| p.unit.as_str())
      .collect();

    assert!(units.contains(&"core"));
    assert!(units.contains(&"app"));
    assert!(units.contains(&"app-spec"));
    assert!(!units.contains(&"unrelated"));
    assert!(project.plans_for("missing").is_none());
  }

  #[test]
  fn rule_errors_name_the_failing_unit() {
    let content = r#"
      [[spock_test]]
      name = "empty-spec"
      srcs = ["src/test/groovy/Helper.groovy"]
    "#;

    let err = resolve(content).unwrap_err();
    assert!(matches!(err, ProjectError::Rule { unit, .. } if unit == "empty-spec"));
  }
}
