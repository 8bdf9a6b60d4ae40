//! Target dependency graph.
//!
//! Declared units form a DAG: edges run from a dependency to its
//! dependents. The graph validates `:name` references (they must exist and
//! must be libraries; tests cannot be depended on), rejects duplicate
//! names and cycles, and yields the bottom-up construction order the
//! resolver walks.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::manifest::{DepEntry, ManifestError, ProjectManifest, parse_dep};

#[derive(Debug)]
pub struct TargetDag {
  graph: DiGraph<String, ()>,
  nodes: HashMap<String, NodeIndex>,
}

impl TargetDag {
  /// Build and validate the graph for a manifest.
  pub fn from_manifest(manifest: &ProjectManifest) -> Result<Self, ManifestError> {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<String, NodeIndex> = HashMap::new();

    for name in manifest.unit_names() {
      if nodes.contains_key(name) {
        return Err(ManifestError::DuplicateUnit(name.to_string()));
      }
      let idx = graph.add_node(name.to_string());
      nodes.insert(name.to_string(), idx);
    }

    for (unit, deps) in manifest.unit_deps() {
      let dependent = nodes[unit];
      for raw in deps {
        let DepEntry::Unit(reference) = parse_dep(raw) else {
          continue;
        };
        let Some(&dep_idx) = nodes.get(reference.as_str()) else {
          return Err(ManifestError::UnknownReference {
            unit: unit.to_string(),
            reference,
          });
        };
        if !manifest.is_library(&reference) {
          return Err(ManifestError::NotALibrary {
            unit: unit.to_string(),
            reference,
          });
        }
        graph.add_edge(dep_idx, dependent, ());
      }
    }

    let dag = Self { graph, nodes };
    dag.construction_order()?;
    Ok(dag)
  }

  /// All declared units in an order where dependencies come before
  /// dependents.
  pub fn construction_order(&self) -> Result<Vec<String>, ManifestError> {
    let sorted = toposort(&self.graph, None).map_err(|_| ManifestError::DependencyCycle)?;
    Ok(sorted.into_iter().map(|idx| self.graph[idx].clone()).collect())
  }

  /// The target plus every declared unit it transitively depends on.
  ///
  /// Returns `None` for an undeclared target.
  pub fn dependency_cone(&self, target: &str) -> Option<BTreeSet<String>> {
    let &start = self.nodes.get(target)?;

    let mut cone = BTreeSet::new();
    let mut stack = vec![start];
    while let Some(idx) = stack.pop() {
      if !cone.insert(self.graph[idx].clone()) {
        continue;
      }
      stack.extend(self.graph.neighbors_directed(idx, Direction::Incoming));
    }
    Some(cone)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  fn manifest(content: &str) -> ProjectManifest {
    ProjectManifest::parse(content, Path::new("jargo.toml")).unwrap()
  }

  #[test]
  fn construction_order_respects_dependencies() {
    let manifest = manifest(
      r#"
      [[library]]
      name = "app"
      deps = [":core"]

      [[library]]
      name = "core"

      [[spock_test]]
      name = "app-spec"
      deps = [":app"]
      "#,
    );

    let dag = TargetDag::from_manifest(&manifest).unwrap();
    let order = dag.construction_order().unwrap();

    let pos = |name: &str| order.iter().position(|n| n == name).unwrap();
    assert!(pos("core") < pos("app"));
    assert!(pos("app") < pos("app-spec"));
  }

  #[test]
  fn duplicate_names_are_rejected() {
    let manifest = manifest(
      r#"
      [[library]]
      name = "core"

      [[spock_test]]
      name = "core"
      "#,
    );

    let err = TargetDag::from_manifest(&manifest).unwrap_err();
    assert!(matches!(err, ManifestError::DuplicateUnit(name) if name == "core"));
  }

  #[test]
  fn unknown_references_are_rejected() {
    let manifest = manifest(
      r#"
      [[library]]
      name = "app"
      deps = [":nope"]
      "#,
    );

    let err = TargetDag::from_manifest(&manifest).unwrap_err();
    assert!(matches!(err, ManifestError::UnknownReference { reference, .. } if reference == "nope"));
  }

  #[test]
  fn depending_on_a_test_is_rejected() {
    let manifest = manifest(
      r#"
      [[library]]
      name = "app"
      deps = [":suite"]

      [[spock_test]]
      name = "suite"
      "#,
    );

    let err = TargetDag::from_manifest(&manifest).unwrap_err();
    assert!(matches!(err, ManifestError::NotALibrary { reference, .. } if reference == "suite"));
  }

  #[test]
  fn cycles_are_rejected() {
    let manifest = manifest(
      r#"
      [[library]]
      name = "a"
      deps = [":b"]

      [[library]]
      name = "b"
      deps = [":a"]
      "#,
    );

    let err = TargetDag::from_manifest(&manifest).unwrap_err();
    assert!(matches!(err, ManifestError::DependencyCycle));
  }

  #[test]
  fn dependency_cone_includes_transitive_units() {
    let manifest = manifest(
      r#"
      [[library]]
      name = "base"

      [[library]]
      name = "core"
      deps = [":base"]

      [[library]]
      name = "unrelated"

      [[spock_test]]
      name = "core-spec"
      deps = [":core"]
      "#,
    );

    let dag = TargetDag::from_manifest(&manifest).unwrap();
    let cone = dag.dependency_cone("core-spec").unwrap();

    assert_eq!(
      cone,
      BTreeSet::from(["base".to_string(), "core".to_string(), "core-spec".to_string()])
    );
    assert!(dag.dependency_cone("missing").is_none());
  }
}
