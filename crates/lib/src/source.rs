//! Source-file classification.
//!
//! Classification is a total, pure function over paths: every input maps to
//! exactly one [`SourceKind`] with no side effects, so the suffix
//! conventions the composition macros rely on stay independently testable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{GROOVY_EXT, JAVA_EXT};

/// Language a source file belongs to, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
  Java,
  Groovy,
  /// Anything else. Callers decide whether to ignore or reject these.
  Unclassified,
}

/// Classify a path by filename extension.
pub fn classify(path: &Path) -> SourceKind {
  match path.extension().and_then(|e| e.to_str()) {
    Some(ext) if ext == JAVA_EXT => SourceKind::Java,
    Some(ext) if ext == GROOVY_EXT => SourceKind::Groovy,
    _ => SourceKind::Unclassified,
  }
}

/// Whether a file is a test entry point: a Groovy source whose stem ends in
/// the given suffix (`FooSpec.groovy` for suffix `"Spec"`).
pub fn is_entry_point(path: &Path, suffix: &str) -> bool {
  if classify(path) != SourceKind::Groovy {
    return false;
  }
  path
    .file_stem()
    .and_then(|s| s.to_str())
    .is_some_and(|stem| stem.ends_with(suffix))
}

/// A mixed source set split by language.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SourcePartition {
  pub java: Vec<PathBuf>,
  pub groovy: Vec<PathBuf>,
  pub skipped: Vec<PathBuf>,
}

/// Partition a mixed source list by language, preserving declaration order
/// within each class.
pub fn partition(srcs: &[PathBuf]) -> SourcePartition {
  let mut part = SourcePartition::default();
  for src in srcs {
    match classify(src) {
      SourceKind::Java => part.java.push(src.clone()),
      SourceKind::Groovy => part.groovy.push(src.clone()),
      SourceKind::Unclassified => part.skipped.push(src.clone()),
    }
  }
  part
}
