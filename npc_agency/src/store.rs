//! File-backed JSON documents for persisted scheduler state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::StateError;

/// A single JSON document on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing file is `Ok(None)`.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StateError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StateError::io(&self.path, e)),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Read the document, falling back to `T::default()` on any failure.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self) -> T {
        match self.load() {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Falling back to empty state for {}: {}", self.path.display(), e);
                T::default()
            }
        }
    }

    /// Write the document, creating parent directories as needed.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StateError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&self.path, json).map_err(|e| StateError::io(&self.path, e))
    }
}
