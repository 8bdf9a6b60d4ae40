//! Fixed names and defaults shared across the pipeline.

/// Number of hex characters kept from a full SHA-256 when fingerprinting
/// definitions. Long enough to be collision-safe for build-graph sizes,
/// short enough to stay readable in logs.
pub const OBJ_HASH_PREFIX_LEN: usize = 20;

/// Extension of dynamically-compiled (Groovy) sources.
pub const GROOVY_EXT: &str = "groovy";

/// Extension of statically-compiled (Java) sources.
pub const JAVA_EXT: &str = "java";

/// Separator used when serializing a set of archives into a classpath string.
#[cfg(windows)]
pub const CLASSPATH_SEP: &str = ";";
#[cfg(not(windows))]
pub const CLASSPATH_SEP: &str = ":";

/// Entry point the generated test scripts hand the inferred class names to.
pub const TEST_RUNNER_MAIN: &str = "org.junit.runner.JUnitCore";

/// Conventional root under which test sources live. Class identities are
/// derived from the path segment after this prefix.
pub const DEFAULT_TEST_SOURCE_ROOT: &str = "src/test/groovy/";

/// Filename suffix marking a Spock specification entry point.
pub const SPOCK_SUFFIX: &str = "Spec";

/// Filename suffix marking a JUnit-style test entry point.
pub const JUNIT_SUFFIX: &str = "Test";

/// Default project manifest filename.
pub const DEFAULT_MANIFEST_FILE: &str = "jargo.toml";

/// Default root directory for produced artifacts, relative to the project.
pub const DEFAULT_OUT_ROOT: &str = ".jargo/out";

/// Repo-relative archives every test target runs against: the Groovy
/// runtime, the matcher library, the test runner, and Spock itself.
pub const TEST_FRAMEWORK_JARS: &[&str] = &[
  "third_party/groovy/groovy-all.jar",
  "third_party/hamcrest/hamcrest-core.jar",
  "third_party/junit/junit.jar",
  "third_party/spock/spock-core.jar",
];
