//! End-to-end CLI tests against a scratch project directory.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const MANIFEST: &str = r#"
[[library]]
name = "core"
srcs = ["src/main/groovy/com/example/Core.groovy"]
deps = ["third_party/guava.jar"]

[[spock_test]]
name = "core-spec"
srcs = ["src/test/groovy/com/example/CoreSpec.groovy"]
deps = [":core"]
"#;

fn project(manifest: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  fs::write(temp.path().join("jargo.toml"), manifest).unwrap();
  temp
}

fn jargo(dir: &Path) -> Command {
  let mut cmd = Command::cargo_bin("jargo").unwrap();
  cmd.current_dir(dir);
  cmd
}

#[test]
fn plan_lists_resolved_targets() {
  let temp = project(MANIFEST);

  jargo(temp.path())
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("Libraries: 1"))
    .stdout(predicate::str::contains("Tests: 1"))
    .stdout(predicate::str::contains("core-spec"));
}

#[test]
fn plan_json_output_is_parseable() {
  let temp = project(MANIFEST);

  let output = jargo(temp.path()).args(["plan", "--format", "json"]).output().unwrap();

  assert!(output.status.success());
  let plans: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert!(plans.as_array().is_some_and(|p| p.len() == 2));
}

#[test]
fn missing_manifest_is_reported() {
  let temp = TempDir::new().unwrap();

  jargo(temp.path())
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load manifest"));
}

#[test]
fn test_target_without_entry_points_fails_resolution() {
  let temp = project(
    r#"
    [[spock_test]]
    name = "empty-spec"
    srcs = ["src/test/groovy/com/example/Helper.groovy"]
    "#,
  );

  jargo(temp.path())
    .arg("plan")
    .assert()
    .failure()
    .stderr(predicate::str::contains("no test entry points"));
}

#[test]
fn build_emits_the_test_script() {
  // A test with no helper sources only plans script emission, so the
  // build runs without any toolchain installed.
  let temp = project(
    r#"
    [[spock_test]]
    name = "solo-spec"
    srcs = ["src/test/groovy/com/example/SoloSpec.groovy"]
    "#,
  );

  jargo(temp.path()).args(["build", "solo-spec"]).assert().success();

  let script = temp.path().join(".jargo/out/solo-spec/solo-spec");
  let body = fs::read_to_string(&script).unwrap();
  assert!(body.contains("org.junit.runner.JUnitCore"));
  assert!(body.contains("com.example.SoloSpec"));
}

#[test]
fn unknown_build_target_is_reported() {
  let temp = project(MANIFEST);

  jargo(temp.path())
    .args(["build", "nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown target"));
}
