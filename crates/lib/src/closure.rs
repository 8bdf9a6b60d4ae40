//! Dependency closure resolution.
//!
//! A closure is the full set of archives needed to compile or run a unit.
//! Resolution is single-level: each library records its own transitive
//! runtime closure at construction time, so resolving a dependency list
//! only unions direct artifacts with those recorded sets. Closures compose
//! associatively because the graph is built bottom-up; cyclic declarations
//! are caught by the target graph, not here.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::CLASSPATH_SEP;
use crate::unit::Dep;

/// The set of archives required to compile or run a unit.
///
/// Represented as an ordered set: membership is what matters for
/// correctness, while the sorted iteration order makes the serialized
/// classpath reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyClosure(BTreeSet<PathBuf>);

impl DependencyClosure {
  pub fn new() -> Self {
    Self::default()
  }

  /// Resolve the closure for a list of direct dependencies.
  ///
  /// Pre-built archives contribute themselves. Libraries contribute their
  /// published archives plus the runtime closure they recorded when they
  /// were composed.
  pub fn resolve(deps: &[Dep]) -> Self {
    let mut set = BTreeSet::new();
    for dep in deps {
      match dep {
        Dep::Archive(path) => {
          set.insert(path.clone());
        }
        Dep::Library(lib) => {
          set.extend(lib.artifact_paths().cloned());
          set.extend(lib.runtime_closure.iter().cloned());
        }
      }
    }
    Self(set)
  }

  pub fn insert(&mut self, path: PathBuf) {
    self.0.insert(path);
  }

  pub fn contains(&self, path: &Path) -> bool {
    self.0.contains(path)
  }

  pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
    self.0.iter()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn to_vec(&self) -> Vec<PathBuf> {
    self.0.iter().cloned().collect()
  }

  pub fn union(&self, other: &Self) -> Self {
    Self(self.0.union(&other.0).cloned().collect())
  }

  /// Serialize into a single classpath string: sorted, normalized,
  /// separator-joined entries.
  pub fn classpath(&self) -> String {
    join_classpath(self.0.iter())
  }
}

impl Extend<PathBuf> for DependencyClosure {
  fn extend<T: IntoIterator<Item = PathBuf>>(&mut self, iter: T) {
    self.0.extend(iter);
  }
}

impl FromIterator<PathBuf> for DependencyClosure {
  fn from_iter<T: IntoIterator<Item = PathBuf>>(iter: T) -> Self {
    Self(iter.into_iter().collect())
  }
}

/// Join archive paths into a classpath string with the platform separator.
pub fn join_classpath<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> String {
  paths
    .into_iter()
    .map(|p| dunce::simplified(p).to_string_lossy().into_owned())
    .collect::<Vec<_>>()
    .join(CLASSPATH_SEP)
}
