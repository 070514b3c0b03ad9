//! World Trigger Engine - fires NPC-authored narrative events.
//!
//! Each tick, for every NPC and every one of its triggers:
//! 1. **Once-check**: skip `once` triggers that already fired
//! 2. **Requirements**: every listed beat complete, every `!beat` incomplete
//! 3. **Condition**: beat, flag or elapsed-time test against story state
//! 4. **Emit**: one message per recipient, or one broadcast
//!
//! Fired history is written once after all NPCs are processed. A crash
//! mid-tick can lose that tick's history; triggers are best-effort, not
//! exactly-once.

mod message;
mod state;

pub use message::*;
pub use state::*;

use story_rules::{hours_between, GameDate, Npc, Recipients, StoryState, TriggerCondition, WorldTrigger};

use crate::error::StateError;
use crate::store::JsonStore;

/// Result of evaluating one trigger's requirements and condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerCheck {
    Fire,
    /// Not firing, with a human-readable reason.
    Hold(String),
}

impl TriggerCheck {
    pub fn fires(&self) -> bool {
        matches!(self, TriggerCheck::Fire)
    }
}

/// Evaluates world triggers and remembers which have fired.
#[derive(Debug, Default)]
pub struct WorldTriggerEngine {
    state: TriggerState,
    store: Option<JsonStore>,
}

impl WorldTriggerEngine {
    /// Create an engine with in-memory state only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine persisting its state to `store`.
    ///
    /// An unreadable state file yields empty history.
    pub fn with_store(store: JsonStore) -> Self {
        Self {
            state: store.load_or_default(),
            store: Some(store),
        }
    }

    pub fn state(&self) -> &TriggerState {
        &self.state
    }

    pub fn has_fired(&self, trigger_id: &str) -> bool {
        self.state.has_fired(trigger_id)
    }

    /// Forget that a trigger fired so it can fire again.
    pub fn reset(&mut self, trigger_id: &str) -> bool {
        let was_fired = self.state.reset(trigger_id);
        if was_fired {
            self.persist();
        }
        was_fired
    }

    /// Forget all fired history.
    pub fn reset_all(&mut self) {
        self.state.fired.clear();
        self.persist();
    }

    /// Check a trigger's requirements and condition.
    ///
    /// Does not consult fired history. Time conditions need both the
    /// reference beat's completion date and `now`; without either they hold.
    pub fn evaluate(trigger: &WorldTrigger, story: &StoryState, now: Option<&GameDate>) -> TriggerCheck {
        for requirement in trigger.requirements() {
            let complete = story.is_beat_complete(requirement.beat);
            if requirement.negated && complete {
                return TriggerCheck::Hold(format!("beat {} must not be complete", requirement.beat));
            }
            if !requirement.negated && !complete {
                return TriggerCheck::Hold(format!("beat {} is not complete", requirement.beat));
            }
        }

        match &trigger.condition {
            TriggerCondition::Beat { beat } => {
                if story.is_beat_complete(beat) {
                    TriggerCheck::Fire
                } else {
                    TriggerCheck::Hold(format!("waiting for beat {}", beat))
                }
            }
            TriggerCondition::Flag { flag, value } => match story.flag(flag) {
                Some(actual) if actual == value => TriggerCheck::Fire,
                Some(actual) => TriggerCheck::Hold(format!("flag {} is {}, waiting for {}", flag, actual, value)),
                None => TriggerCheck::Hold(format!("flag {} is unset", flag)),
            },
            TriggerCondition::Time { after_beat, hours } => {
                if !story.is_beat_complete(after_beat) {
                    return TriggerCheck::Hold(format!("waiting for beat {}", after_beat));
                }
                let (Some(completed_at), Some(now)) = (story.beat_completed_at(after_beat), now) else {
                    return TriggerCheck::Hold(format!("no timestamp to measure from beat {}", after_beat));
                };
                let elapsed = hours_between(completed_at, now);
                if elapsed >= *hours as i64 {
                    TriggerCheck::Fire
                } else {
                    TriggerCheck::Hold(format!("{} of {} hours since {}", elapsed, hours, after_beat))
                }
            }
        }
    }

    /// Evaluate every NPC's triggers and collect the messages they emit.
    pub fn run(&mut self, npcs: &[Npc], story: &StoryState, now: Option<&GameDate>) -> Vec<TriggerMessage> {
        let mut messages = Vec::new();
        let mut newly_fired = false;

        for npc in npcs {
            for trigger in &npc.triggers {
                if trigger.once && self.state.has_fired(&trigger.id) {
                    continue;
                }

                if let TriggerCheck::Hold(reason) = Self::evaluate(trigger, story, now) {
                    tracing::debug!("Trigger {} of {} holds: {}", trigger.id, npc.id, reason);
                    continue;
                }

                tracing::info!("Trigger {} of {} fired", trigger.id, npc.id);
                messages.extend(Self::compose(npc, trigger, now.copied()));

                if trigger.once {
                    self.state.mark_fired(trigger.id.clone());
                    newly_fired = true;
                }
            }
        }

        if newly_fired {
            self.persist();
        }
        messages
    }

    fn compose(npc: &Npc, trigger: &WorldTrigger, sent_on: Option<GameDate>) -> Vec<TriggerMessage> {
        let recipients: Vec<Recipient> = match &trigger.targets {
            Recipients::Npcs(ids) if !ids.is_empty() => ids.iter().cloned().map(Recipient::Npc).collect(),
            _ => vec![Recipient::Broadcast],
        };

        recipients
            .into_iter()
            .map(|to| TriggerMessage::render(&trigger.id, npc, to, &trigger.message, sent_on))
            .collect()
    }

    /// Write fired history to the store, if any.
    pub fn save(&self) -> Result<(), StateError> {
        match &self.store {
            Some(store) => store.save(&self.state),
            None => Ok(()),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("Failed to persist trigger state: {}", e);
        }
    }
}
