//! Pipeline configuration.
//!
//! All implicit inputs live here as explicit defaults: toolchain binaries,
//! the artifact output root, the test-source root prefix, and the fixed
//! test-framework archives injected into every test target. Callers change
//! behavior by constructing a different `Config`, never through global
//! state.

use std::env;
use std::path::{Path, PathBuf};

use crate::action::Tool;
use crate::consts::{DEFAULT_OUT_ROOT, DEFAULT_TEST_SOURCE_ROOT, TEST_FRAMEWORK_JARS};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Java compiler binary.
  pub javac: PathBuf,
  /// Groovy compiler binary.
  pub groovyc: PathBuf,
  /// Archiver binary.
  pub jar: PathBuf,
  /// JVM binary used to run generated test scripts.
  pub java: PathBuf,
  /// Root directory artifacts are produced under.
  pub out_root: PathBuf,
  /// Required prefix of every test source path; class identities are
  /// derived from the path after it.
  pub test_source_root: String,
  /// Archives merged into every test target's dependency list.
  pub test_framework: Vec<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      javac: PathBuf::from("javac"),
      groovyc: PathBuf::from("groovyc"),
      jar: PathBuf::from("jar"),
      java: PathBuf::from("java"),
      out_root: PathBuf::from(DEFAULT_OUT_ROOT),
      test_source_root: DEFAULT_TEST_SOURCE_ROOT.to_string(),
      test_framework: TEST_FRAMEWORK_JARS.iter().map(PathBuf::from).collect(),
    }
  }
}

impl Config {
  /// Build a config with toolchain binaries resolved from `JAVA_HOME` and
  /// `GROOVY_HOME`, falling back to bare names on `PATH`.
  pub fn from_env() -> Self {
    let mut config = Config::default();

    if let Ok(java_home) = env::var("JAVA_HOME") {
      let bin = Path::new(&java_home).join("bin");
      config.javac = bin.join("javac");
      config.jar = bin.join("jar");
      config.java = bin.join("java");
    }
    if let Ok(groovy_home) = env::var("GROOVY_HOME") {
      config.groovyc = Path::new(&groovy_home).join("bin").join("groovyc");
    }

    config
  }

  pub fn with_out_root(mut self, out_root: impl Into<PathBuf>) -> Self {
    self.out_root = out_root.into();
    self
  }

  /// Binary for a compile tool.
  pub fn tool_path(&self, tool: Tool) -> &Path {
    match tool {
      Tool::Javac => &self.javac,
      Tool::Groovyc => &self.groovyc,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn default_uses_path_lookup_and_fixed_framework() {
    let config = Config::default();

    assert_eq!(config.groovyc, PathBuf::from("groovyc"));
    assert_eq!(config.test_source_root, "src/test/groovy/");
    assert_eq!(config.test_framework.len(), 4);
    assert!(config.test_framework.contains(&PathBuf::from("third_party/junit/junit.jar")));
  }

  #[test]
  #[serial]
  fn from_env_resolves_java_home() {
    temp_env::with_vars(
      [("JAVA_HOME", Some("/opt/jdk")), ("GROOVY_HOME", None::<&str>)],
      || {
        let config = Config::from_env();
        assert_eq!(config.javac, PathBuf::from("/opt/jdk/bin/javac"));
        assert_eq!(config.jar, PathBuf::from("/opt/jdk/bin/jar"));
        assert_eq!(config.groovyc, PathBuf::from("groovyc"));
      },
    );
  }

  #[test]
  #[serial]
  fn from_env_resolves_groovy_home() {
    temp_env::with_vars(
      [("GROOVY_HOME", Some("/opt/groovy")), ("JAVA_HOME", None::<&str>)],
      || {
        let config = Config::from_env();
        assert_eq!(config.groovyc, PathBuf::from("/opt/groovy/bin/groovyc"));
        assert_eq!(config.javac, PathBuf::from("javac"));
      },
    );
  }

  #[test]
  fn tool_path_dispatch() {
    let config = Config::default();
    assert_eq!(config.tool_path(Tool::Javac), Path::new("javac"));
    assert_eq!(config.tool_path(Tool::Groovyc), Path::new("groovyc"));
  }
}
