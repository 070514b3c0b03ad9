//! Agency Coordinator - decides what each NPC does on a tick.
//!
//! For one NPC the coordinator:
//! 1. **Collects** active goals whose triggers hold
//! 2. **Sorts** them by priority (stable)
//! 3. **Selects** the first goal off cooldown, and its first performable action
//! 4. **Executes** the action and stamps the goal's last-acted date
//!
//! If the selected goal has candidate actions but the NPC can perform none
//! of them, the outcome is `Unauthorized`; lower-priority goals are not tried.
//! NPCs are processed in host order in a single pass and never observe each
//! other's actions within the same tick.

mod executor;

pub use executor::*;

use serde::{Deserialize, Serialize};

use story_rules::{GameDate, Npc, StoryState};

use crate::capabilities::{ActionDefinition, CapabilityRegistry};
use crate::goals::{active_goals, by_priority, is_triggered, should_act_now};

/// Terminal outcome of one NPC's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgencyStatus {
    /// The action ran and the executor reported success.
    Success,
    /// The action ran and the executor reported failure.
    Failed,
    /// The chosen goal has actions, but none the NPC is capable of.
    Unauthorized,
    /// No goal was eligible.
    NoAction,
}

/// Report of one NPC's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyResult {
    pub npc_id: String,
    pub goal_id: Option<String>,
    pub action_id: Option<String>,
    pub status: AgencyStatus,
    pub message: String,
}

impl AgencyResult {
    fn no_action(npc: &Npc) -> Self {
        Self {
            npc_id: npc.id.clone(),
            goal_id: None,
            action_id: None,
            status: AgencyStatus::NoAction,
            message: format!("{} has no eligible goal", npc.name),
        }
    }

    /// Whether this result belongs in a tick's aggregate report.
    pub fn is_reportable(&self) -> bool {
        self.action_id.is_some() || self.status == AgencyStatus::Unauthorized
    }
}

/// The coordinator's choice for one NPC, before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<'r> {
    Act {
        goal_id: String,
        action: &'r ActionDefinition,
    },
    Unauthorized {
        goal_id: String,
        candidates: Vec<String>,
    },
    Idle,
}

/// Picks and runs autonomous actions against a capability registry.
#[derive(Debug, Clone, Default)]
pub struct AgencyCoordinator {
    registry: CapabilityRegistry,
}

impl AgencyCoordinator {
    /// Create a coordinator owning the given registry.
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Create a coordinator with the built-in roles and actions.
    pub fn with_defaults() -> Self {
        Self::new(CapabilityRegistry::with_defaults())
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut CapabilityRegistry {
        &mut self.registry
    }

    /// Choose what the NPC should do, without doing it.
    pub fn select(&self, npc: &Npc, story: &StoryState, current_date: &GameDate) -> Selection<'_> {
        let story = Some(story);
        let eligible = active_goals(npc, story)
            .into_iter()
            .filter(|goal| is_triggered(goal, story))
            .collect();

        for goal in by_priority(eligible) {
            if !should_act_now(goal, story, current_date) {
                continue;
            }
            if goal.actions.is_empty() {
                tracing::debug!("Goal {} of {} has no candidate actions", goal.id, npc.id);
                continue;
            }

            let performable = goal
                .actions
                .iter()
                .filter_map(|id| self.registry.action(id))
                .find(|action| self.registry.can_perform(npc, &action.id));

            return match performable {
                Some(action) => Selection::Act {
                    goal_id: goal.id.clone(),
                    action,
                },
                None => Selection::Unauthorized {
                    goal_id: goal.id.clone(),
                    candidates: goal.actions.clone(),
                },
            };
        }

        Selection::Idle
    }

    /// Run one NPC's turn.
    ///
    /// The goal's last-acted date advances whether the action succeeds or
    /// fails, so a failing action still respects its cooldown.
    pub fn act(
        &self,
        npc: &mut Npc,
        story: &mut StoryState,
        current_date: &GameDate,
        executor: &mut dyn ActionExecutor,
    ) -> AgencyResult {
        let (goal_id, action) = match self.select(npc, story, current_date) {
            Selection::Act { goal_id, action } => (goal_id, action),
            Selection::Unauthorized {
                goal_id,
                candidates,
            } => {
                tracing::info!(
                    "{} cannot perform any action for goal {}: {:?}",
                    npc.id,
                    goal_id,
                    candidates
                );
                return AgencyResult {
                    npc_id: npc.id.clone(),
                    message: format!(
                        "{} lacks the capabilities for any of: {}",
                        npc.name,
                        candidates.join(", ")
                    ),
                    goal_id: Some(goal_id),
                    action_id: None,
                    status: AgencyStatus::Unauthorized,
                };
            }
            Selection::Idle => return AgencyResult::no_action(npc),
        };

        let outcome = executor.execute(
            action,
            ActionContext {
                npc: &*npc,
                story: &mut *story,
                current_date: *current_date,
            },
        );

        if let Some(goal) = npc.goal_mut(&goal_id) {
            goal.last_acted = Some(*current_date);
        }

        let status = if outcome.success {
            AgencyStatus::Success
        } else {
            AgencyStatus::Failed
        };
        tracing::info!(
            "{} performed {} for goal {} ({:?}): {}",
            npc.id,
            action.id,
            goal_id,
            status,
            outcome.message
        );

        AgencyResult {
            npc_id: npc.id.clone(),
            goal_id: Some(goal_id),
            action_id: Some(action.id.clone()),
            status,
            message: outcome.message,
        }
    }

    /// Run one turn for every NPC, in order.
    ///
    /// NPCs without goals are skipped, and `NoAction` results are left out
    /// of the returned report.
    pub fn run(
        &self,
        npcs: &mut [Npc],
        story: &mut StoryState,
        current_date: &GameDate,
        executor: &mut dyn ActionExecutor,
    ) -> Vec<AgencyResult> {
        npcs.iter_mut()
            .filter(|npc| !npc.goals.is_empty())
            .map(|npc| self.act(npc, story, current_date, executor))
            .filter(AgencyResult::is_reportable)
            .collect()
    }
}
