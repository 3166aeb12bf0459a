//! Rendering a test's cluster environment and cluster compute templates.
//!
//! Both loaders write the variables they inject into the supplied
//! [`TestEnvironment`] before rendering; those writes stay visible to every
//! later render that uses the same environment.

use serde_json::Value;

use crate::cloud::{get_test_cloud_id, CloudLookup};
use crate::collection::Test;
use crate::defaults::{ANYSCALE_CLOUD_ID, COMMIT, RAY_WHEELS, RAY_WHEELS_SANITY_CHECK};
use crate::environment::TestEnvironment;
use crate::template::{get_wheels_sanity_check, load_and_render_yaml_template};
use crate::utils::ConfigError;

/// Render the cluster environment template of `test`.
///
/// Sets `RAY_WHEELS_SANITY_CHECK` (checking against `commit` when the
/// environment holds one) and `RAY_WHEELS` before rendering.
pub fn load_test_cluster_env(
    test: &Test,
    ray_wheels_url: &str,
    env: &mut TestEnvironment,
) -> Result<Option<Value>, ConfigError> {
    let sanity_check = get_wheels_sanity_check(env.get(COMMIT));
    env.set(RAY_WHEELS_SANITY_CHECK, sanity_check);
    env.set(RAY_WHEELS, ray_wheels_url);

    load_and_render_yaml_template(test.cluster.cluster_env.as_deref(), Some(env.as_map()))
}

/// Render the cluster compute template of `test`.
///
/// Resolves the test's cloud and sets `ANYSCALE_CLOUD_ID` before rendering.
pub fn load_test_cluster_compute(
    test: &Test,
    env: &mut TestEnvironment,
    lookup: &dyn CloudLookup,
) -> Result<Option<Value>, ConfigError> {
    let cloud_id = get_test_cloud_id(test, lookup)?;
    env.set(ANYSCALE_CLOUD_ID, cloud_id);

    load_and_render_yaml_template(test.cluster.cluster_compute.as_deref(), Some(env.as_map()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DEFAULT_CLOUD_ID;
    use crate::utils::RuntimeConfigError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().to_string()
    }

    fn make_test(cluster: Value) -> Test {
        serde_json::from_value(json!({"name": "t", "cluster": cluster})).unwrap()
    }

    #[test]
    fn test_cluster_env_injects_wheels() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = write(
            dir.path(),
            "app_config.yaml",
            "base_image: anyscale/ray:nightly\npost_build_cmds:\n  - pip install -U {{ env.RAY_WHEELS }}\n",
        );
        let test = make_test(json!({"cluster_env": env_path}));
        let mut env = TestEnvironment::new();

        let rendered = load_test_cluster_env(&test, "https://wheels/ray.whl", &mut env)
            .unwrap()
            .unwrap();

        assert_eq!(rendered["base_image"], json!("anyscale/ray:nightly"));
        assert_eq!(
            rendered["post_build_cmds"][0],
            json!("pip install -U https://wheels/ray.whl")
        );
        assert_eq!(env.get(RAY_WHEELS), Some("https://wheels/ray.whl"));
        assert_eq!(
            env.get(RAY_WHEELS_SANITY_CHECK),
            Some(get_wheels_sanity_check(None).as_str())
        );
    }

    #[test]
    fn test_cluster_env_uses_commit_from_environment() {
        let test = make_test(json!({}));
        let mut env = TestEnvironment::new();
        env.set(COMMIT, "abc123");

        assert_eq!(load_test_cluster_env(&test, "https://w", &mut env).unwrap(), None);
        assert_eq!(
            env.get(RAY_WHEELS_SANITY_CHECK),
            Some(get_wheels_sanity_check(Some("abc123")).as_str())
        );
    }

    #[test]
    fn test_cluster_compute_injects_cloud_id() {
        let dir = tempfile::tempdir().unwrap();
        let compute_path = write(
            dir.path(),
            "compute.yaml",
            "cloud_id: {{ env.ANYSCALE_CLOUD_ID }}\nmax_workers: 2\n",
        );
        let test = make_test(json!({"cluster_compute": compute_path, "cloud_name": "my-cloud"}));
        let lookup: HashMap<String, String> =
            [("my-cloud".to_string(), "cld_123".to_string())].into_iter().collect();
        let mut env = TestEnvironment::new();

        let rendered = load_test_cluster_compute(&test, &mut env, &lookup).unwrap();
        assert_eq!(rendered, Some(json!({"cloud_id": "cld_123", "max_workers": 2})));
        assert_eq!(env.get(ANYSCALE_CLOUD_ID), Some("cld_123"));
    }

    #[test]
    fn test_cluster_compute_default_cloud() {
        let test = make_test(json!({}));
        let mut env = TestEnvironment::new();
        let rendered = load_test_cluster_compute(&test, &mut env, &HashMap::<String, String>::new()).unwrap();
        assert_eq!(rendered, None);
        assert_eq!(env.get(ANYSCALE_CLOUD_ID), Some(DEFAULT_CLOUD_ID));
    }

    #[test]
    fn test_cluster_compute_conflicting_cloud() {
        let test = make_test(json!({"cloud_id": "x", "cloud_name": "y"}));
        let mut env = TestEnvironment::new();
        let err = load_test_cluster_compute(&test, &mut env, &HashMap::<String, String>::new()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Runtime(RuntimeConfigError::ConflictingCloud { .. })
        ));
        assert!(!env.contains_key(ANYSCALE_CLOUD_ID));
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let test = make_test(json!({"cluster_env": "/nonexistent/app_config.yaml"}));
        let mut env = TestEnvironment::new();
        let err = load_test_cluster_env(&test, "https://w", &mut env).unwrap_err();
        assert!(matches!(err, ConfigError::TemplateNotFound { .. }));
        // Variables were written before the failed render.
        assert_eq!(env.get(RAY_WHEELS), Some("https://w"));
    }
}
