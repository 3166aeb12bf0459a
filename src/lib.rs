//! Release test configuration.
//!
//! Loads release test collections from YAML, resolves the cloud each test
//! runs on, builds smoke-test variants, and renders cluster environment and
//! cluster compute templates with `{{ env.KEY }}` substitution.

pub mod client;
pub mod cloud;
pub mod cluster;
pub mod collection;
pub mod defaults;
pub mod environment;
pub mod logging;
pub mod merge;
pub mod suite;
pub mod template;
pub mod utils;

pub use client::CloudClient;
pub use cloud::{get_test_cloud_id, CloudLookup};
pub use cluster::{load_test_cluster_compute, load_test_cluster_env};
pub use collection::{
    as_smoke_test, find_test, read_and_validate_release_test_collection,
    validate_release_test_collection, validate_test, ClusterConfig, Test,
};
pub use environment::{get_test_environment, set_test_env_var, TestEnvironment};
pub use merge::deep_update;
pub use suite::ReleaseTestSuite;
pub use template::{get_wheels_sanity_check, load_and_render_yaml_template, render_template};
pub use utils::{ConfigError, RuntimeConfigError};
