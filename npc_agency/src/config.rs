//! Engine configuration, read from TOML.
//!
//! ```toml
//! [state]
//! trigger_state = "saves/trigger_state.json"
//! timed_action_state = "saves/timed_actions.json"
//!
//! [roles]
//! quartermaster = ["can_trade", "can_communicate"]
//!
//! [[actions]]
//! id = "barter"
//! requires = ["can_trade"]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::capabilities::{ActionDefinition, CapabilityRegistry};
use crate::error::StateError;

/// Where persisted scheduler state lives. Unset paths mean in-memory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatePaths {
    #[serde(default)]
    pub trigger_state: Option<PathBuf>,
    #[serde(default)]
    pub timed_action_state: Option<PathBuf>,
}

/// Configuration for a [`crate::NarrativeEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub state: StatePaths,

    /// Roles added to, or replacing, the built-in role table.
    #[serde(default)]
    pub roles: HashMap<String, Vec<String>>,

    /// Actions added to, or replacing, the built-in catalogue.
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, StateError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StateError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| StateError::io(path, e))?;
        Self::from_toml_str(&raw)
    }

    /// The built-in registry with this configuration's roles and actions applied.
    pub fn build_registry(&self) -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::with_defaults();
        for (role, tags) in &self.roles {
            registry.register_role(role.clone(), tags.iter().cloned());
        }
        for action in &self.actions {
            if !registry.register_action(action.clone()) {
                tracing::warn!("Ignoring configured action with empty id");
            }
        }
        registry
    }
}
