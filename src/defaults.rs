//! Default values and well-known variable names.
//!
//! Timeouts are in seconds and are consumed by the components that actually
//! execute test workloads; nothing in this crate interprets them.

pub const DEFAULT_WHEEL_WAIT_TIMEOUT: u64 = 1200;
pub const DEFAULT_COMMAND_TIMEOUT: u64 = 1800;
pub const DEFAULT_BUILD_TIMEOUT: u64 = 1800;
pub const DEFAULT_SESSION_TIMEOUT: u64 = 1800;

/// Cloud used when a test names neither `cloud_id` nor `cloud_name`.
pub const DEFAULT_CLOUD_ID: &str = "cld_4F7k8814aZzGG8TNUGPKnc";

// Template variables written by the cluster loaders.
pub const RAY_WHEELS: &str = "RAY_WHEELS";
pub const RAY_WHEELS_SANITY_CHECK: &str = "RAY_WHEELS_SANITY_CHECK";
pub const ANYSCALE_CLOUD_ID: &str = "ANYSCALE_CLOUD_ID";

/// Optional registry key holding the expected wheel commit.
pub const COMMIT: &str = "commit";

pub const DEFAULT_ANYSCALE_HOST: &str = "https://console.anyscale.com";
