//! NPC definitions.

use serde::{Deserialize, Serialize};

use super::{Goal, WorldTrigger};

/// A non-player character as supplied by the persona loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Npc {
    pub id: String,
    pub name: String,

    /// Crew role, used to look up the NPC's base capabilities.
    #[serde(default)]
    pub role: Option<String>,

    /// Capability tags granted on top of the role's.
    #[serde(default)]
    pub capabilities: Vec<String>,

    /// Goals in declared order.
    #[serde(default)]
    pub goals: Vec<Goal>,

    #[serde(default)]
    pub triggers: Vec<WorldTrigger>,
}

impl Npc {
    /// Create an NPC with no role, goals or triggers.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: None,
            capabilities: Vec::new(),
            goals: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_capability(mut self, tag: impl Into<String>) -> Self {
        self.capabilities.push(tag.into());
        self
    }

    pub fn with_goal(mut self, goal: Goal) -> Self {
        self.goals.push(goal);
        self
    }

    pub fn with_trigger(mut self, trigger: WorldTrigger) -> Self {
        self.triggers.push(trigger);
        self
    }

    /// Get a goal by id.
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Get a mutable goal by id.
    pub fn goal_mut(&mut self, id: &str) -> Option<&mut Goal> {
        self.goals.iter_mut().find(|g| g.id == id)
    }
}
