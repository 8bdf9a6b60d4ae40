//! Project manifest loading.
//!
//! A project declares its units in a TOML manifest (`jargo.toml` by
//! default): `[[library]]`, `[[spock_test]]`, and `[[groovy_test]]`
//! tables. Dependency entries starting with `:` reference a sibling unit
//! by name; anything else is the path of a pre-built archive.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {path}: {message}")]
  Read { path: PathBuf, message: String },

  #[error("failed to parse manifest {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: Box<toml::de::Error>,
  },

  #[error("duplicate unit name: {0}")]
  DuplicateUnit(String),

  #[error("unit `{unit}` depends on unknown unit `{reference}`")]
  UnknownReference { unit: String, reference: String },

  #[error("unit `{unit}` depends on `{reference}`, which is not a library")]
  NotALibrary { unit: String, reference: String },

  #[error("dependency cycle between declared units")]
  DependencyCycle,
}

/// A dependency entry as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepEntry {
  /// `:name`, a sibling unit declared in the same manifest.
  Unit(String),
  /// A pre-built archive path.
  Archive(PathBuf),
}

/// Parse a raw dependency string into its entry form.
pub fn parse_dep(raw: &str) -> DepEntry {
  match raw.strip_prefix(':') {
    Some(name) => DepEntry::Unit(name.to_string()),
    None => DepEntry::Archive(PathBuf::from(raw)),
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryDecl {
  pub name: String,
  #[serde(default)]
  pub srcs: Vec<PathBuf>,
  #[serde(default)]
  pub deps: Vec<String>,
  #[serde(default)]
  pub resources: Vec<PathBuf>,
  #[serde(default)]
  pub visibility: Vec<String>,
  #[serde(default)]
  pub testonly: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpockTestDecl {
  pub name: String,
  #[serde(default)]
  pub srcs: Vec<PathBuf>,
  #[serde(default)]
  pub deps: Vec<String>,
  #[serde(default)]
  pub jvm_flags: Vec<String>,
  #[serde(default)]
  pub size: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroovyTestDecl {
  pub name: String,
  #[serde(default)]
  pub srcs: Vec<PathBuf>,
  #[serde(default)]
  pub deps: Vec<String>,
  #[serde(default)]
  pub resources: Vec<PathBuf>,
  #[serde(default)]
  pub data: Vec<PathBuf>,
  #[serde(default)]
  pub jvm_flags: Vec<String>,
  #[serde(default)]
  pub size: Option<String>,
  #[serde(default)]
  pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectManifest {
  #[serde(default)]
  pub library: Vec<LibraryDecl>,
  #[serde(default)]
  pub spock_test: Vec<SpockTestDecl>,
  #[serde(default)]
  pub groovy_test: Vec<GroovyTestDecl>,
}

impl ProjectManifest {
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Read {
      path: path.to_path_buf(),
      message: e.to_string(),
    })?;
    Self::parse(&content, path)
  }

  pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
    toml::from_str(content).map_err(|e| ManifestError::Parse {
      path: path.to_path_buf(),
      source: Box::new(e),
    })
  }

  /// Names of all declared units, libraries first, in declaration order.
  pub fn unit_names(&self) -> Vec<&str> {
    self
      .library
      .iter()
      .map(|l| l.name.as_str())
      .chain(self.spock_test.iter().map(|t| t.name.as_str()))
      .chain(self.groovy_test.iter().map(|t| t.name.as_str()))
      .collect()
  }

  /// `(unit, deps)` pairs for every declared unit.
  pub fn unit_deps(&self) -> Vec<(&str, &[String])> {
    self
      .library
      .iter()
      .map(|l| (l.name.as_str(), l.deps.as_slice()))
      .chain(self.spock_test.iter().map(|t| (t.name.as_str(), t.deps.as_slice())))
      .chain(self.groovy_test.iter().map(|t| (t.name.as_str(), t.deps.as_slice())))
      .collect()
  }

  pub fn is_library(&self, name: &str) -> bool {
    self.library.iter().any(|l| l.name == name)
  }
}
