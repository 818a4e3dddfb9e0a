//! Filesystem adapter error types.

use std::path::PathBuf;

use refcheck_domain::error::RefCheckError;

use crate::config::ConfigError;

/// Errors specific to the filesystem adapter.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    /// A file exists but could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A YAML source could not be parsed.
    #[error("failed to parse YAML in {}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A JSON storage snapshot could not be parsed.
    #[error("failed to parse JSON in {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The `refcheck.toml` settings are unusable.
    #[error("invalid refcheck configuration")]
    Config(#[from] ConfigError),
}

impl FsError {
    /// Convert into a [`RefCheckError::Source`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> RefCheckError {
        RefCheckError::Source(Box::new(self))
    }
}

impl From<FsError> for RefCheckError {
    fn from(err: FsError) -> Self {
        err.into_domain()
    }
}
