//! Template variables shared across a release test run.
//!
//! A [`TestEnvironment`] starts out with date-derived defaults and collects
//! whatever the cluster loaders (or callers) write into it. Callers normally
//! construct one per run and pass it around; [`get_test_environment`] exposes a
//! single lazily-initialized instance for code that wants process-wide state.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Duration, Local};

static TEST_ENV: OnceLock<Mutex<TestEnvironment>> = OnceLock::new();

/// Key/value store of template variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    /// Create an environment populated with defaults for the current local time.
    pub fn new() -> Self {
        Self::at(Local::now())
    }

    /// Create an environment populated with defaults relative to `now`.
    ///
    /// - `DATESTAMP`: `%Y%m%d`
    /// - `TIMESTAMP`: seconds since the epoch
    /// - `EXPIRATION_1D` / `_2D` / `_3D`: `%Y-%m-%d`, one to three days ahead
    pub fn at(now: DateTime<Local>) -> Self {
        let mut vars = HashMap::new();
        vars.insert("DATESTAMP".to_string(), now.format("%Y%m%d").to_string());
        vars.insert("TIMESTAMP".to_string(), now.timestamp().to_string());
        for days in 1..=3 {
            let expiration = now + Duration::days(days);
            vars.insert(
                format!("EXPIRATION_{}D", days),
                expiration.format("%Y-%m-%d").to_string(),
            );
        }
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set a variable, overwriting any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Borrow the variables as the mapping handed to the template renderer.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.vars
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide environment, initialized with defaults on first access.
///
/// Every call returns the same instance.
pub fn get_test_environment() -> &'static Mutex<TestEnvironment> {
    TEST_ENV.get_or_init(|| Mutex::new(TestEnvironment::new()))
}

/// Write a variable into the process-wide environment.
pub fn set_test_env_var(key: &str, value: &str) {
    let mut env = get_test_environment()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    env.set(key, value);
}
