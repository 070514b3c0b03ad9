//! Timed Action Scheduler - long-running NPC actions with deferred effects.
//!
//! Instances are advanced by elapsed hours each tick. When an instance's
//! remaining hours reach zero its effects are applied to story state exactly
//! once and it leaves the active set. Cancelled instances leave immediately
//! and never apply their effects. Resolved instances stay queryable through
//! [`TimedActionScheduler::progress`] until the host purges them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use story_rules::{add_hours, Effect, GameDate, StoryState, TimedActionDefinition};

use crate::error::StateError;
use crate::store::JsonStore;

/// Lifecycle status of a timed action instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimedActionStatus {
    Active,
    Completed,
    Cancelled,
}

/// A running (or resolved) timed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedAction {
    pub id: String,
    pub npc_id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub started_on: GameDate,
    pub completes_on: GameDate,
    pub total_hours: u32,
    pub elapsed_hours: u32,
    pub remaining_hours: u32,
    #[serde(default)]
    pub effects: Vec<Effect>,
    pub status: TimedActionStatus,
}

impl TimedAction {
    fn from_definition(definition: &TimedActionDefinition, current_date: &GameDate) -> Self {
        let total_hours = definition.duration.total_hours();
        Self {
            id: definition.id.clone(),
            npc_id: definition.npc_id.clone(),
            description: definition.description.clone(),
            started_on: *current_date,
            completes_on: add_hours(current_date, total_hours as i64),
            total_hours,
            elapsed_hours: 0,
            remaining_hours: total_hours,
            effects: definition.effects.clone(),
            status: TimedActionStatus::Active,
        }
    }

    /// Fraction complete, from 0.0 to 1.0.
    pub fn fraction_complete(&self) -> f32 {
        if self.total_hours == 0 {
            return 1.0;
        }
        (self.elapsed_hours as f32 / self.total_hours as f32).min(1.0)
    }
}

/// Emitted when a timed action completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub action_id: String,
    pub npc_id: String,
    pub description: Option<String>,
    pub completed_on: GameDate,
    /// Effects that were written to story state, in order.
    pub applied_effects: Vec<Effect>,
}

/// Snapshot of how far along an action is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionProgress {
    pub id: String,
    pub status: TimedActionStatus,
    pub elapsed_hours: u32,
    pub remaining_hours: u32,
    pub fraction_complete: f32,
}

impl From<&TimedAction> for ActionProgress {
    fn from(action: &TimedAction) -> Self {
        Self {
            id: action.id.clone(),
            status: action.status,
            elapsed_hours: action.elapsed_hours,
            remaining_hours: action.remaining_hours,
            fraction_complete: action.fraction_complete(),
        }
    }
}

/// Persisted form of the scheduler: the active instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimedActionState {
    #[serde(default)]
    pub actions: Vec<TimedAction>,
}

/// Tracks and advances timed actions.
#[derive(Debug, Default)]
pub struct TimedActionScheduler {
    active: Vec<TimedAction>,
    resolved: HashMap<String, TimedAction>,
    store: Option<JsonStore>,
}

impl TimedActionScheduler {
    /// Create a scheduler with in-memory state only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler persisting its active set to `store`.
    ///
    /// Every stored instance is restored as active, whatever its recorded
    /// status. An unreadable state file yields an empty scheduler.
    pub fn with_store(store: JsonStore) -> Self {
        let mut state: TimedActionState = store.load_or_default();
        for action in &mut state.actions {
            if action.status != TimedActionStatus::Active {
                tracing::warn!("Restoring {:?} timed action {} as active", action.status, action.id);
                action.status = TimedActionStatus::Active;
            }
        }
        Self {
            active: state.actions,
            resolved: HashMap::new(),
            store: Some(store),
        }
    }

    /// Start a timed action on `current_date`.
    ///
    /// Returns `None` for an empty id or an id that is already active.
    pub fn start(&mut self, definition: &TimedActionDefinition, current_date: &GameDate) -> Option<TimedAction> {
        if definition.id.is_empty() {
            return None;
        }
        if self.active.iter().any(|a| a.id == definition.id) {
            tracing::warn!("Timed action {} is already running", definition.id);
            return None;
        }

        let action = TimedAction::from_definition(definition, current_date);
        tracing::info!(
            "{} started {} ({} hours, due {})",
            action.npc_id,
            action.id,
            action.total_hours,
            action.completes_on
        );

        // A restart replaces any resolved instance with the same id.
        self.resolved.remove(&action.id);
        self.active.push(action.clone());
        self.persist();
        Some(action)
    }

    /// Advance every active action by `elapsed_hours`.
    ///
    /// Completed actions apply their effects in declared order when story
    /// state is given, and are moved out of the active set.
    pub fn advance(&mut self, mut story: Option<&mut StoryState>, elapsed_hours: u32) -> Vec<CompletionRecord> {
        let mut records = Vec::new();

        for action in &mut self.active {
            action.elapsed_hours = action.elapsed_hours.saturating_add(elapsed_hours);
            action.remaining_hours = action.total_hours.saturating_sub(action.elapsed_hours);
            if action.remaining_hours > 0 {
                continue;
            }

            action.status = TimedActionStatus::Completed;
            let applied_effects = match story.as_deref_mut() {
                Some(story) => Self::apply_effects(action, story),
                None => {
                    tracing::debug!("No story state; effects of {} dropped", action.id);
                    Vec::new()
                }
            };
            tracing::info!("{} completed {}", action.npc_id, action.id);

            records.push(CompletionRecord {
                action_id: action.id.clone(),
                npc_id: action.npc_id.clone(),
                description: action.description.clone(),
                completed_on: action.completes_on,
                applied_effects,
            });
        }

        let (completed, still_active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|a| a.status == TimedActionStatus::Completed);
        self.active = still_active;
        for action in completed {
            self.resolved.insert(action.id.clone(), action);
        }

        if elapsed_hours > 0 || !records.is_empty() {
            self.persist();
        }
        records
    }

    fn apply_effects(action: &TimedAction, story: &mut StoryState) -> Vec<Effect> {
        action
            .effects
            .iter()
            .filter(|effect| match effect.apply(story) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Skipping effect of {}: {}", action.id, e);
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Cancel an active action. Its effects are never applied.
    ///
    /// Returns `false` if no active action has that id.
    pub fn cancel(&mut self, id: &str) -> bool {
        let Some(index) = self.active.iter().position(|a| a.id == id) else {
            return false;
        };
        let mut action = self.active.remove(index);
        action.status = TimedActionStatus::Cancelled;
        tracing::info!("{} cancelled {}", action.npc_id, action.id);

        self.resolved.insert(action.id.clone(), action);
        self.persist();
        true
    }

    /// Progress of an active or not-yet-purged resolved action.
    pub fn progress(&self, id: &str) -> Option<ActionProgress> {
        self.active
            .iter()
            .find(|a| a.id == id)
            .or_else(|| self.resolved.get(id))
            .map(ActionProgress::from)
    }

    pub fn active(&self) -> &[TimedAction] {
        &self.active
    }

    /// Active actions belonging to one NPC.
    pub fn active_for(&self, npc_id: &str) -> Vec<&TimedAction> {
        self.active.iter().filter(|a| a.npc_id == npc_id).collect()
    }

    /// Drop completed and cancelled instances. Returns how many were dropped.
    pub fn purge_resolved(&mut self) -> usize {
        let count = self.resolved.len();
        self.resolved.clear();
        count
    }

    /// Write the active set to the store, if any.
    pub fn save(&self) -> Result<(), StateError> {
        match &self.store {
            Some(store) => store.save(&TimedActionState {
                actions: self.active.clone(),
            }),
            None => Ok(()),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("Failed to persist timed action state: {}", e);
        }
    }
}
