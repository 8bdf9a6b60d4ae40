//! Produced-artifact inventory.
//!
//! Artifacts live under `<out_root>/<unit>/`. This module only reads that
//! layout; paths are decided at planning time.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Output directory for one unit's artifacts.
pub fn unit_out_dir(out_root: &Path, unit: &str) -> PathBuf {
  out_root.join(unit)
}

/// A file found under the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
  pub path: PathBuf,
  pub bytes: u64,
}

/// List every produced file under the output root, sorted by path.
///
/// Scratch directories (`*.tmp`) are skipped; a missing root yields an
/// empty list.
pub fn list_artifacts(out_root: &Path) -> Vec<StoredArtifact> {
  if !out_root.exists() {
    return Vec::new();
  }

  let mut artifacts: Vec<StoredArtifact> = WalkDir::new(out_root)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| {
      e.file_name()
        .to_str()
        .map(|name| !name.ends_with(".tmp"))
        .unwrap_or(true)
    })
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.file_type().is_file())
    .filter_map(|entry| {
      let bytes = entry.metadata().ok()?.len();
      Some(StoredArtifact {
        path: entry.into_path(),
        bytes,
      })
    })
    .collect();

  artifacts.sort_by(|a, b| a.path.cmp(&b.path));
  artifacts
}
