//! Capability Registry - which NPCs may perform which actions.
//!
//! An NPC's capabilities are the union of its role's tags and its own
//! override tags. An action may be performed only if the NPC holds every tag
//! the action requires.

mod roles;

pub use roles::*;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use story_rules::Npc;

/// An action NPCs can take, and the capability tags it requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Every tag is required. Empty means anyone may perform the action.
    #[serde(default)]
    pub requires: Vec<String>,
}

impl ActionDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            requires: Vec::new(),
        }
    }

    pub fn requiring(mut self, tag: impl Into<String>) -> Self {
        self.requires.push(tag.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Role tables and action definitions for one simulation.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    roles: HashMap<String, HashSet<String>>,
    actions: HashMap<String, ActionDefinition>,
}

impl CapabilityRegistry {
    /// Create an empty registry with no roles and no actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in roles and actions.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (role, tags) in DEFAULT_ROLES {
            registry.register_role(*role, tags.iter().copied());
        }
        for (id, requires) in DEFAULT_ACTIONS {
            let definition = requires
                .iter()
                .fold(ActionDefinition::new(*id), |def, tag| def.requiring(*tag));
            registry.register_action(definition);
        }
        registry
    }

    /// Set the capability tags of a role, replacing any previous entry.
    pub fn register_role<I, S>(&mut self, role: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles
            .insert(role.into(), tags.into_iter().map(Into::into).collect());
    }

    /// Register or replace an action. Returns `false` for an empty id.
    pub fn register_action(&mut self, definition: ActionDefinition) -> bool {
        if definition.id.is_empty() {
            return false;
        }
        self.actions.insert(definition.id.clone(), definition);
        true
    }

    /// Look up an action by id.
    pub fn action(&self, id: &str) -> Option<&ActionDefinition> {
        self.actions.get(id)
    }

    /// Capability tags of a registered role.
    pub fn role_capabilities(&self, role: &str) -> Option<&HashSet<String>> {
        self.roles.get(role)
    }

    /// The NPC's role tags merged with its override tags.
    ///
    /// Computed fresh on every call.
    pub fn capabilities_of(&self, npc: &Npc) -> HashSet<String> {
        let mut tags: HashSet<String> = npc
            .role
            .as_deref()
            .and_then(|role| self.role_capabilities(role))
            .cloned()
            .unwrap_or_default();
        tags.extend(npc.capabilities.iter().cloned());
        tags
    }

    /// Check if the NPC holds a capability tag.
    pub fn has_capability(&self, npc: &Npc, tag: &str) -> bool {
        !tag.is_empty() && self.capabilities_of(npc).contains(tag)
    }

    /// Check if the NPC holds every tag the action requires.
    ///
    /// Unknown actions can never be performed.
    pub fn can_perform(&self, npc: &Npc, action_id: &str) -> bool {
        let Some(action) = self.actions.get(action_id) else {
            return false;
        };
        if action.requires.is_empty() {
            return true;
        }
        let held = self.capabilities_of(npc);
        action.requires.iter().all(|tag| held.contains(tag))
    }

    /// Every registered action the NPC can perform, sorted by id.
    pub fn actions_for(&self, npc: &Npc) -> Vec<&ActionDefinition> {
        let mut actions: Vec<_> = self
            .actions
            .values()
            .filter(|action| self.can_perform(npc, &action.id))
            .collect();
        actions.sort_by(|a, b| a.id.cmp(&b.id));
        actions
    }
}
