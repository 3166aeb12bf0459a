//! Release test collections: loading, validation, lookup, and smoke-test overlays.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::merge::deep_update;
use crate::utils::ConfigError;

/// Cluster section of a test record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Path to the cluster environment template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_env: Option<PathBuf>,
    /// Path to the cluster compute template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_compute: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClusterConfig {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One named release test.
///
/// Only `name`, `cluster` and `smoke_test` are typed; everything else the
/// collection file declares is kept in `extra` untouched. A null `cluster`
/// reads as an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Test {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "ClusterConfig::is_empty"
    )]
    pub cluster: ClusterConfig,
    /// Partial overlay applied by [`as_smoke_test`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke_test: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Test {
    pub fn has_smoke_test(&self) -> bool {
        self.smoke_test.is_some()
    }
}

/// Read a test collection from a YAML file and validate it.
pub fn read_and_validate_release_test_collection(
    config_file: impl AsRef<Path>,
) -> Result<Vec<Test>, ConfigError> {
    let path = config_file.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Through a generic tree first: flattened records cannot take non-string
    // mapping keys straight from YAML.
    let document: Value = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let tests: Vec<Test> = serde_json::from_value(document)?;

    validate_release_test_collection(&tests)?;
    tracing::debug!(path = %path.display(), tests = tests.len(), "loaded release test collection");
    Ok(tests)
}

/// Validate every test in the collection, failing if any reports errors.
pub fn validate_release_test_collection(test_collection: &[Test]) -> Result<(), ConfigError> {
    let errors: Vec<String> = test_collection.iter().flat_map(validate_test).collect();

    if !errors.is_empty() {
        return Err(ConfigError::Validation { count: errors.len() });
    }
    Ok(())
}

/// Per-test validation hook. No checks are enforced yet.
pub fn validate_test(_test: &Test) -> Vec<String> {
    Vec::new()
}

/// Find the first test named `test_name`.
pub fn find_test<'a>(test_collection: &'a [Test], test_name: &str) -> Option<&'a Test> {
    test_collection.iter().find(|test| test.name == test_name)
}

/// Return the smoke-test variant of `test`.
///
/// The `smoke_test` mapping is deep-merged over the rest of the record and
/// dropped from the result. Tests without one are returned unchanged.
pub fn as_smoke_test(test: &Test) -> Result<Test, ConfigError> {
    let mut working = test.clone();
    let Some(smoke_test_config) = working.smoke_test.take() else {
        tracing::warn!(
            "Requested smoke test, but test with name {} does not have any smoke test configuration.",
            test.name
        );
        return Ok(working);
    };

    let base = serde_json::to_value(&working)?;
    let merged = deep_update(&base, &smoke_test_config);
    Ok(serde_json::from_value(merged)?)
}
