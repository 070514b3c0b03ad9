//! Story mechanics: deferred flag effects and durations of timed actions.

use serde::{Deserialize, Serialize};

use crate::story_state::{FlagValue, StoryState};

/// Operations a deferred effect can perform on a story flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectOp {
    /// Overwrite the flag.
    Set,
    /// Add the operand to the flag (absent flag counts as zero).
    Increment,
    /// Subtract the operand from the flag (absent flag counts as zero).
    Decrement,
}

/// Errors from applying an effect to story state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EffectError {
    #[error("operand for `{flag}` is not numeric: {value}")]
    NonNumericOperand { flag: String, value: FlagValue },

    #[error("flag `{flag}` holds a non-numeric value: {value}")]
    NonNumericFlag { flag: String, value: FlagValue },
}

/// A change to a story flag, applied when a timed action completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub flag: String,
    pub op: EffectOp,
    pub value: FlagValue,
}

impl Effect {
    pub fn set(flag: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Self {
            flag: flag.into(),
            op: EffectOp::Set,
            value: value.into(),
        }
    }

    pub fn increment(flag: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Self {
            flag: flag.into(),
            op: EffectOp::Increment,
            value: value.into(),
        }
    }

    pub fn decrement(flag: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Self {
            flag: flag.into(),
            op: EffectOp::Decrement,
            value: value.into(),
        }
    }

    /// Apply this effect to the story flags, returning the flag's new value.
    ///
    /// On error the story state is left untouched.
    pub fn apply(&self, state: &mut StoryState) -> Result<FlagValue, EffectError> {
        let new_value = match self.op {
            EffectOp::Set => self.value.clone(),
            EffectOp::Increment | EffectOp::Decrement => {
                let sign = if self.op == EffectOp::Increment { 1 } else { -1 };
                let base = state.flag(&self.flag).cloned().unwrap_or(FlagValue::Int(0));
                self.combine(base, sign)?
            }
        };

        state.set_flag(self.flag.clone(), new_value.clone());
        Ok(new_value)
    }

    fn combine(&self, base: FlagValue, sign: i64) -> Result<FlagValue, EffectError> {
        match (&base, &self.value) {
            (FlagValue::Int(a), FlagValue::Int(b)) => Ok(FlagValue::Int(a.saturating_add(b.saturating_mul(sign)))),
            (_, operand) => {
                let b = operand.as_number().ok_or_else(|| EffectError::NonNumericOperand {
                    flag: self.flag.clone(),
                    value: operand.clone(),
                })?;
                let a = base.as_number().ok_or_else(|| EffectError::NonNumericFlag {
                    flag: self.flag.clone(),
                    value: base.clone(),
                })?;
                Ok(FlagValue::Float(a + sign as f64 * b))
            }
        }
    }
}

/// How long a timed action takes. Hours and days are additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Duration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
}

impl Duration {
    pub fn hours(hours: u32) -> Self {
        Self {
            hours: Some(hours),
            days: None,
        }
    }

    pub fn days(days: u32) -> Self {
        Self {
            hours: None,
            days: Some(days),
        }
    }

    /// Total length in hours.
    pub fn total_hours(&self) -> u32 {
        self.hours
            .unwrap_or(0)
            .saturating_add(self.days.unwrap_or(0).saturating_mul(24))
    }
}

/// A long-running action an NPC can start, such as a hull repair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedActionDefinition {
    pub id: String,
    pub npc_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub duration: Duration,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl TimedActionDefinition {
    pub fn new(id: impl Into<String>, npc_id: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: id.into(),
            npc_id: npc_id.into(),
            description: None,
            duration,
            effects: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}
