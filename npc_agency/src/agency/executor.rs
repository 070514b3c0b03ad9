//! The collaborator that actually carries out an NPC's chosen action.

use serde::{Deserialize, Serialize};

use story_rules::{GameDate, Npc, StoryState};

use crate::capabilities::ActionDefinition;

/// What the executor sees while performing an action.
#[derive(Debug)]
pub struct ActionContext<'a> {
    pub npc: &'a Npc,
    /// The executor may mutate story state; the scheduler does not inspect the changes.
    pub story: &'a mut StoryState,
    pub current_date: GameDate,
}

/// The executor's report of how an action went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Performs actions on behalf of NPCs.
///
/// Hosts that execute actions asynchronously must resolve them before
/// returning; the scheduler treats this call as blocking.
pub trait ActionExecutor {
    fn execute(&mut self, action: &ActionDefinition, ctx: ActionContext<'_>) -> ActionOutcome;
}
