//! Error types for state persistence and configuration.

use std::path::PathBuf;

/// Failures reading or writing scheduler state and configuration.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl StateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StateError::Io {
            path: path.into(),
            source,
        }
    }
}
