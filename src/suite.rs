//! A loaded test collection together with the state a run threads through it.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::cloud::CloudLookup;
use crate::cluster::{load_test_cluster_compute, load_test_cluster_env};
use crate::collection::{as_smoke_test, find_test, read_and_validate_release_test_collection, Test};
use crate::environment::TestEnvironment;
use crate::utils::ConfigError;

/// Entry point for a release test run.
///
/// Owns the test collection, the run's [`TestEnvironment`], and the cloud
/// lookup used for `cloud_name` resolution. Construct one per run and pass it
/// to whatever renders cluster configuration.
pub struct ReleaseTestSuite {
    tests: Vec<Test>,
    env: TestEnvironment,
    cloud_lookup: Box<dyn CloudLookup>,
}

impl ReleaseTestSuite {
    /// Load and validate the collection at `config_file`.
    pub fn load(config_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::from_tests(read_and_validate_release_test_collection(config_file)?))
    }

    /// Wrap an already-loaded collection.
    ///
    /// Starts with a fresh [`TestEnvironment`] and a lookup that knows no cloud names.
    pub fn from_tests(tests: Vec<Test>) -> Self {
        Self {
            tests,
            env: TestEnvironment::new(),
            cloud_lookup: Box::new(HashMap::<String, String>::new()),
        }
    }

    /// Use `env` as the run's template variables.
    pub fn with_environment(mut self, env: TestEnvironment) -> Self {
        self.env = env;
        self
    }

    /// Resolve cloud names through `lookup`.
    pub fn with_cloud_lookup(mut self, lookup: impl CloudLookup + 'static) -> Self {
        self.cloud_lookup = Box::new(lookup);
        self
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn find(&self, name: &str) -> Option<&Test> {
        find_test(&self.tests, name)
    }

    fn require(&self, name: &str) -> Result<&Test, ConfigError> {
        self.find(name).ok_or_else(|| ConfigError::TestNotFound {
            name: name.to_string(),
        })
    }

    /// Smoke-test variant of the test named `name`.
    pub fn smoke_test(&self, name: &str) -> Result<Test, ConfigError> {
        as_smoke_test(self.require(name)?)
    }

    pub fn environment(&self) -> &TestEnvironment {
        &self.env
    }

    pub fn set_env_var(&mut self, key: &str, value: &str) {
        self.env.set(key, value);
    }

    /// Render the cluster environment of the test named `name`.
    pub fn cluster_env(&mut self, name: &str, ray_wheels_url: &str) -> Result<Option<Value>, ConfigError> {
        let test = self.require(name)?.clone();
        load_test_cluster_env(&test, ray_wheels_url, &mut self.env)
    }

    /// Render the cluster compute of the test named `name`.
    pub fn cluster_compute(&mut self, name: &str) -> Result<Option<Value>, ConfigError> {
        let test = self.require(name)?.clone();
        load_test_cluster_compute(&test, &mut self.env, self.cloud_lookup.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{ANYSCALE_CLOUD_ID, DEFAULT_CLOUD_ID, RAY_WHEELS};
    use serde_json::json;

    fn suite() -> ReleaseTestSuite {
        let tests = vec![
            serde_json::from_value(json!({
                "name": "a",
                "cluster": {"cloud_name": "my-cloud"},
                "smoke_test": {"frequency": "nightly"}
            }))
            .unwrap(),
            serde_json::from_value(json!({"name": "b"})).unwrap(),
        ];
        ReleaseTestSuite::from_tests(tests)
    }

    #[test]
    fn test_find_and_missing() {
        let suite = suite();
        assert_eq!(suite.tests().len(), 2);
        assert!(suite.find("b").is_some());
        assert!(matches!(
            suite.smoke_test("zzz"),
            Err(ConfigError::TestNotFound { .. })
        ));
    }

    #[test]
    fn test_smoke_test_by_name() {
        let smoke = suite().smoke_test("a").unwrap();
        assert_eq!(smoke.extra["frequency"], json!("nightly"));
        assert!(!smoke.has_smoke_test());
    }

    #[test]
    fn test_cluster_compute_uses_configured_lookup() {
        let lookup: HashMap<String, String> =
            [("my-cloud".to_string(), "cld_9".to_string())].into_iter().collect();
        let mut suite = suite().with_cloud_lookup(lookup);

        assert_eq!(suite.cluster_compute("a").unwrap(), None);
        assert_eq!(suite.environment().get(ANYSCALE_CLOUD_ID), Some("cld_9"));

        assert_eq!(suite.cluster_compute("b").unwrap(), None);
        assert_eq!(suite.environment().get(ANYSCALE_CLOUD_ID), Some(DEFAULT_CLOUD_ID));
    }

    #[test]
    fn test_cluster_compute_unknown_cloud_without_lookup() {
        let mut suite = suite();
        assert!(matches!(
            suite.cluster_compute("a"),
            Err(ConfigError::Runtime(_))
        ));
    }

    #[test]
    fn test_environment_state_persists_across_calls() {
        let mut suite = suite();
        suite.set_env_var("commit", "abc123");
        suite.cluster_env("b", "https://w").unwrap();
        assert_eq!(suite.environment().get(RAY_WHEELS), Some("https://w"));
        assert_eq!(suite.environment().get("commit"), Some("abc123"));
    }
}
