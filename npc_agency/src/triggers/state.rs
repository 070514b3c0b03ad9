//! Trigger State - fired history, kept apart from trigger definitions so
//! definitions can be reloaded without forgetting what already happened.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Persisted record of which triggers have fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TriggerState {
    #[serde(default)]
    pub fired: HashMap<String, bool>,

    /// Reserved. Never populated by the engine, but carried through
    /// load/save untouched.
    #[serde(default)]
    pub scheduled: Vec<serde_json::Value>,
}

impl TriggerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self, trigger_id: &str) -> bool {
        self.fired.get(trigger_id).copied().unwrap_or(false)
    }

    pub fn mark_fired(&mut self, trigger_id: impl Into<String>) {
        self.fired.insert(trigger_id.into(), true);
    }

    /// Forget that a trigger fired. Returns `false` if it had not.
    pub fn reset(&mut self, trigger_id: &str) -> bool {
        self.fired.remove(trigger_id).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_reset() {
        let mut state = TriggerState::new();
        assert!(!state.has_fired("alarm"));

        state.mark_fired("alarm");
        assert!(state.has_fired("alarm"));

        assert!(state.reset("alarm"));
        assert!(!state.reset("alarm"));
        assert!(!state.has_fired("alarm"));
    }

    #[test]
    fn test_scheduled_survives_round_trip() {
        let json = r#"{"fired": {"alarm": true}, "scheduled": [{"at": "2305-010", "id": "later"}]}"#;
        let state: TriggerState = serde_json::from_str(json).unwrap();
        assert_eq!(state.scheduled.len(), 1);

        let reparsed: TriggerState = serde_json::from_str(&serde_json::to_string(&state).unwrap()).unwrap();
        assert_eq!(reparsed, state);
    }

    #[test]
    fn test_missing_fields_default() {
        let state: TriggerState = serde_json::from_str("{}").unwrap();
        assert!(state.fired.is_empty());
        assert!(state.scheduled.is_empty());
    }
}
