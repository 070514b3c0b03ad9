//! Narrative Engine - one tick of autonomous NPC behaviour.
//!
//! The host owns the NPCs and the story state and decides when to tick.
//! Ticks must not overlap: the engine does no locking of its own.

use serde::{Deserialize, Serialize};

use story_rules::{GameDate, Npc, StoryState, TimedActionDefinition};

use crate::agency::{ActionExecutor, AgencyCoordinator, AgencyResult};
use crate::capabilities::CapabilityRegistry;
use crate::config::EngineConfig;
use crate::store::JsonStore;
use crate::timed_actions::{CompletionRecord, TimedAction, TimedActionScheduler};
use crate::triggers::{TriggerMessage, WorldTriggerEngine};

/// Everything that happened during one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TickReport {
    pub agency_results: Vec<AgencyResult>,
    pub trigger_messages: Vec<TriggerMessage>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.agency_results.is_empty() && self.trigger_messages.is_empty()
    }
}

/// Agency, world triggers and timed actions behind a single entry point.
#[derive(Debug)]
pub struct NarrativeEngine {
    agency: AgencyCoordinator,
    triggers: WorldTriggerEngine,
    timed_actions: TimedActionScheduler,
}

impl NarrativeEngine {
    /// Build an engine from configuration, loading any persisted state.
    pub fn new(config: &EngineConfig) -> Self {
        let triggers = match &config.state.trigger_state {
            Some(path) => WorldTriggerEngine::with_store(JsonStore::new(path)),
            None => WorldTriggerEngine::new(),
        };
        let timed_actions = match &config.state.timed_action_state {
            Some(path) => TimedActionScheduler::with_store(JsonStore::new(path)),
            None => TimedActionScheduler::new(),
        };

        Self {
            agency: AgencyCoordinator::new(config.build_registry()),
            triggers,
            timed_actions,
        }
    }

    /// Create an in-memory engine with the built-in roles and actions.
    pub fn with_defaults() -> Self {
        Self::new(&EngineConfig::default())
    }

    /// Run agency for every NPC, then evaluate world triggers.
    ///
    /// Triggers see the story state as left by this tick's actions.
    pub fn run_tick(
        &mut self,
        npcs: &mut [Npc],
        story: &mut StoryState,
        current_date: &GameDate,
        executor: &mut dyn ActionExecutor,
    ) -> TickReport {
        let agency_results = self.agency.run(npcs, story, current_date, executor);
        let trigger_messages = self.triggers.run(npcs, story, Some(current_date));

        tracing::debug!(
            "Tick {}: {} agency results, {} trigger messages",
            current_date,
            agency_results.len(),
            trigger_messages.len()
        );

        TickReport {
            agency_results,
            trigger_messages,
        }
    }

    /// Advance timed actions, applying effects of those that complete.
    pub fn advance_timed_actions(&mut self, story: &mut StoryState, elapsed_hours: u32) -> Vec<CompletionRecord> {
        self.timed_actions.advance(Some(story), elapsed_hours)
    }

    pub fn start_timed_action(
        &mut self,
        definition: &TimedActionDefinition,
        current_date: &GameDate,
    ) -> Option<TimedAction> {
        self.timed_actions.start(definition, current_date)
    }

    pub fn cancel_timed_action(&mut self, id: &str) -> bool {
        self.timed_actions.cancel(id)
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        self.agency.registry()
    }

    pub fn registry_mut(&mut self) -> &mut CapabilityRegistry {
        self.agency.registry_mut()
    }

    pub fn agency(&self) -> &AgencyCoordinator {
        &self.agency
    }

    pub fn triggers(&self) -> &WorldTriggerEngine {
        &self.triggers
    }

    pub fn triggers_mut(&mut self) -> &mut WorldTriggerEngine {
        &mut self.triggers
    }

    pub fn timed_actions(&self) -> &TimedActionScheduler {
        &self.timed_actions
    }

    pub fn timed_actions_mut(&mut self) -> &mut TimedActionScheduler {
        &mut self.timed_actions
    }
}
