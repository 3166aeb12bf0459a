//! Deciding which cloud a release test runs on.

use std::collections::HashMap;

use crate::collection::Test;
use crate::defaults::DEFAULT_CLOUD_ID;
use crate::utils::RuntimeConfigError;

/// Resolves a cloud name to its id.
///
/// Implemented by [`crate::client::CloudClient`] against the cluster-management
/// API; a plain `HashMap` of name to id works as a static lookup.
pub trait CloudLookup {
    /// Return the id of the cloud named `name`, or `None` if there is no such cloud.
    fn find_cloud_by_name(&self, name: &str) -> Result<Option<String>, RuntimeConfigError>;
}

impl CloudLookup for HashMap<String, String> {
    fn find_cloud_by_name(&self, name: &str) -> Result<Option<String>, RuntimeConfigError> {
        Ok(self.get(name).cloned())
    }
}

/// Resolve the cloud id for `test`.
///
/// Resolution order:
/// 1. `cloud_id` and `cloud_name` both set: error
/// 2. `cloud_name`: looked up through `lookup`, error if unknown
/// 3. `cloud_id`
/// 4. [`DEFAULT_CLOUD_ID`]
///
/// Empty strings count as unset.
pub fn get_test_cloud_id(test: &Test, lookup: &dyn CloudLookup) -> Result<String, RuntimeConfigError> {
    let cloud_id = non_empty(test.cluster.cloud_id.as_deref());
    let cloud_name = non_empty(test.cluster.cloud_name.as_deref());

    match (cloud_id, cloud_name) {
        (Some(cloud_id), Some(cloud_name)) => Err(RuntimeConfigError::ConflictingCloud {
            cloud_id: cloud_id.to_string(),
            cloud_name: cloud_name.to_string(),
        }),
        (None, Some(cloud_name)) => lookup
            .find_cloud_by_name(cloud_name)?
            .filter(|id| !id.is_empty())
            .ok_or_else(|| RuntimeConfigError::CloudNotFound {
                name: cloud_name.to_string(),
            }),
        (Some(cloud_id), None) => Ok(cloud_id.to_string()),
        (None, None) => Ok(DEFAULT_CLOUD_ID.to_string()),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
