//! Action plan execution.
//!
//! Runs plans strictly in the order given, and each plan's steps with
//! fail-fast semantics: the first failing step aborts the remainder, so a
//! failed plan never publishes an artifact. Scheduling beyond that
//! (parallelism, caching, retries) is not done here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::action::{ActionPlan, Step};
use crate::closure::join_classpath;
use crate::config::Config;
use crate::util::hash::{ContentHash, hash_file};

#[derive(Debug, Error)]
pub enum ExecuteError {
  /// A compiler or archiver exited non-zero.
  #[error("{tool} failed with exit code {code:?}: {stderr}")]
  ToolFailed {
    tool: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A plan completed but a declared output is not on disk.
  #[error("plan for `{unit}` did not produce {path}")]
  MissingOutput { unit: String, path: PathBuf },
}

/// Outcome of executing a sequence of plans.
#[derive(Debug, Default)]
pub struct BuildReport {
  /// Every published artifact with the hash of its produced contents.
  pub artifacts: BTreeMap<PathBuf, ContentHash>,
}

impl BuildReport {
  pub fn artifact_count(&self) -> usize {
    self.artifacts.len()
  }
}

/// Execute plans in order, verifying each plan's outputs before moving on.
pub async fn run_plans(plans: &[&ActionPlan], config: &Config) -> Result<BuildReport, ExecuteError> {
  let mut report = BuildReport::default();

  for plan in plans {
    run_plan(plan, config).await?;

    for output in &plan.outputs {
      if !output.exists() {
        return Err(ExecuteError::MissingOutput {
          unit: plan.unit.clone(),
          path: output.clone(),
        });
      }
      report.artifacts.insert(output.clone(), hash_file(output)?);
    }
  }

  Ok(report)
}

/// Execute one plan's steps, aborting on the first failure.
pub async fn run_plan(plan: &ActionPlan, config: &Config) -> Result<(), ExecuteError> {
  info!(unit = %plan.unit, steps = plan.steps.len(), "executing plan");

  for step in &plan.steps {
    run_step(step, config).await?;
  }

  Ok(())
}

async fn run_step(step: &Step, config: &Config) -> Result<(), ExecuteError> {
  match step {
    Step::PrepareScratch { dir } => {
      debug!(dir = %dir.display(), "preparing scratch directory");
      if dir.exists() {
        tokio::fs::remove_dir_all(dir).await?;
      }
      tokio::fs::create_dir_all(dir).await?;
      Ok(())
    }

    Step::Stage { dest, files } => {
      debug!(dest = %dest.display(), files = files.len(), "staging files");
      for file in files {
        let target = dest.join(&file.rel);
        if let Some(parent) = target.parent() {
          tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(&file.src, &target).await?;
      }
      Ok(())
    }

    Step::Compile {
      tool,
      classpath,
      out_dir,
      sources,
    } => {
      let mut cmd = Command::new(config.tool_path(*tool));
      if !classpath.is_empty() {
        cmd.arg("-cp").arg(join_classpath(classpath.iter()));
      }
      cmd.arg("-d").arg(out_dir);
      cmd.args(sources);
      run_tool(cmd, tool.name()).await
    }

    Step::Archive { archive, tree } => {
      if let Some(parent) = archive.parent() {
        tokio::fs::create_dir_all(parent).await?;
      }
      let mut cmd = Command::new(&config.jar);
      cmd.arg("cf").arg(archive).arg("-C").arg(tree).arg(".");
      run_tool(cmd, "jar").await
    }

    Step::EmitScript { path, body } => {
      debug!(path = %path.display(), "writing script");
      if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
      }
      tokio::fs::write(path, body).await?;
      #[cfg(unix)]
      {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
      }
      Ok(())
    }

    Step::Cleanup { dir } => {
      debug!(dir = %dir.display(), "removing scratch directory");
      if dir.exists() {
        tokio::fs::remove_dir_all(dir).await?;
      }
      Ok(())
    }
  }
}

async fn run_tool(mut cmd: Command, tool: &str) -> Result<(), ExecuteError> {
  debug!(tool, "spawning");
  let output = cmd.output().await?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    return Err(ExecuteError::ToolFailed {
      tool: tool.to_string(),
      code: output.status.code(),
      stderr,
    });
  }

  Ok(())
}

/// Run a previously generated test script and return its exit code.
///
/// The script body is a plain shell command line, so it is handed to `sh`
/// rather than executed directly.
pub async fn run_script(script: &Path) -> Result<Option<i32>, ExecuteError> {
  info!(script = %script.display(), "running test script");
  let status = Command::new("sh").arg(script).status().await?;
  Ok(status.code())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::action::{StagedFile, Tool};
  use tempfile::tempdir;

  fn plan_with(steps: Vec<Step>) -> ActionPlan {
    let mut plan = ActionPlan::new("test-unit");
    for step in steps {
      plan.push(step);
    }
    plan
  }

  #[tokio::test]
  async fn prepare_scratch_replaces_stale_contents() {
    let temp = tempdir().unwrap();
    let scratch = temp.path().join("work.jar.tmp");
    std::fs::create_dir_all(&scratch).unwrap();
    std::fs::write(scratch.join("stale.class"), "old").unwrap();

    let plan = plan_with(vec![Step::PrepareScratch { dir: scratch.clone() }]);
    run_plan(&plan, &Config::default()).await.unwrap();

    assert!(scratch.exists());
    assert!(!scratch.join("stale.class").exists());
  }

  #[tokio::test]
  async fn stage_copies_files_at_relative_paths() {
    let temp = tempdir().unwrap();
    let src = temp.path().join("banner.txt");
    std::fs::write(&src, "hello").unwrap();
    let dest = temp.path().join("scratch");

    let plan = plan_with(vec![
      Step::PrepareScratch { dir: dest.clone() },
      Step::Stage {
        dest: dest.clone(),
        files: vec![StagedFile {
          src,
          rel: PathBuf::from("conf/banner.txt"),
        }],
      },
    ]);
    run_plan(&plan, &Config::default()).await.unwrap();

    assert_eq!(std::fs::read_to_string(dest.join("conf/banner.txt")).unwrap(), "hello");
  }

  #[tokio::test]
  async fn emit_script_writes_executable_body() {
    let temp = tempdir().unwrap();
    let script = temp.path().join("suite/suite");

    let plan = plan_with(vec![Step::EmitScript {
      path: script.clone(),
      body: "java -cp a.jar org.junit.runner.JUnitCore com.FooSpec\n".to_string(),
    }]);
    run_plan(&plan, &Config::default()).await.unwrap();

    let body = std::fs::read_to_string(&script).unwrap();
    assert!(body.starts_with("java "));
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      let mode = std::fs::metadata(&script).unwrap().permissions().mode();
      assert_eq!(mode & 0o111, 0o111);
    }
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failing_compile_aborts_remaining_steps() {
    let temp = tempdir().unwrap();
    let marker = temp.path().join("after-compile");

    let mut config = Config::default();
    config.groovyc = PathBuf::from("false");

    let plan = plan_with(vec![
      Step::Compile {
        tool: Tool::Groovyc,
        classpath: vec![],
        out_dir: temp.path().join("out"),
        sources: vec![PathBuf::from("Missing.groovy")],
      },
      Step::EmitScript {
        path: marker.clone(),
        body: "never written\n".to_string(),
      },
    ]);

    let err = run_plan(&plan, &config).await.unwrap_err();

    assert!(matches!(err, ExecuteError::ToolFailed { tool, .. } if tool == "groovyc"));
    assert!(!marker.exists(), "steps after a failure must not run");
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failed_plan_publishes_nothing() {
    let temp = tempdir().unwrap();
    let jar = temp.path().join("libx-groovy.jar");

    let mut config = Config::default();
    config.jar = PathBuf::from("false");

    let mut plan = plan_with(vec![
      Step::PrepareScratch {
        dir: temp.path().join("scratch"),
      },
      Step::Archive {
        archive: jar.clone(),
        tree: temp.path().join("scratch"),
      },
    ]);
    plan.publish(jar.clone());

    let result = run_plans(&[&plan], &config).await;

    assert!(result.is_err());
    assert!(!jar.exists());
  }

  #[tokio::test]
  async fn missing_declared_output_is_an_error() {
    let mut plan = ActionPlan::new("ghost");
    plan.publish(PathBuf::from("/nonexistent/ghost.jar"));

    let err = run_plans(&[&plan], &Config::default()).await.unwrap_err();

    assert!(matches!(err, ExecuteError::MissingOutput { unit, .. } if unit == "ghost"));
  }

  #[tokio::test]
  async fn report_hashes_published_outputs() {
    let temp = tempdir().unwrap();
    let script = temp.path().join("suite");

    let mut plan = plan_with(vec![Step::EmitScript {
      path: script.clone(),
      body: "java -cp a.jar org.junit.runner.JUnitCore com.FooSpec\n".to_string(),
    }]);
    plan.publish(script.clone());

    let report = run_plans(&[&plan], &Config::default()).await.unwrap();

    assert_eq!(report.artifact_count(), 1);
    assert!(report.artifacts.contains_key(&script));
  }
}
