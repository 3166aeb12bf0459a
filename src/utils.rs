//! Error types for release test configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating, or rendering release test configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more test records failed validation.
    #[error("Release test configuration error: Found {count} warnings.")]
    Validation { count: usize },

    /// A referenced template file does not exist.
    #[error("Cannot load yaml template from {}: Path not found.", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A record no longer has the shape of a test after an overlay was applied.
    #[error("Invalid test record: {0}")]
    InvalidTest(#[from] serde_json::Error),

    #[error("No test with name `{name}` in the collection")]
    TestNotFound { name: String },

    #[error(transparent)]
    Runtime(#[from] RuntimeConfigError),
}

/// Runtime failures resolving which cloud a test runs on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeConfigError {
    #[error(
        "You can't supply both a `cloud_name` ({cloud_name}) and a `cloud_id` ({cloud_id}) \
         in the test cluster configuration. Please provide only one."
    )]
    ConflictingCloud { cloud_id: String, cloud_name: String },

    #[error("Couldn't find cloud with name `{name}`.")]
    CloudNotFound { name: String },

    /// The cloud lookup collaborator itself failed.
    #[error("Cloud lookup for `{name}` failed: {message}")]
    LookupFailed { name: String, message: String },
}
