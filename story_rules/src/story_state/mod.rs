//! Story state - the shared, host-owned document every scheduler component reads and writes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar::GameDate;

/// Flag value types for story flags.
///
/// Serialized as plain JSON scalars. `Int` and `Float` are both numbers and
/// compare equal when their values match; numbers never equal booleans or
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl FlagValue {
    /// Numeric view of the value, `None` for booleans and strings.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FlagValue::Int(i) => Some(*i as f64),
            FlagValue::Float(f) => Some(*f),
            FlagValue::Bool(_) | FlagValue::String(_) => None,
        }
    }
}

impl PartialEq for FlagValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FlagValue::Bool(a), FlagValue::Bool(b)) => a == b,
            (FlagValue::Int(a), FlagValue::Int(b)) => a == b,
            (FlagValue::String(a), FlagValue::String(b)) => a == b,
            (FlagValue::Int(_) | FlagValue::Float(_), FlagValue::Int(_) | FlagValue::Float(_)) => {
                self.as_number() == other.as_number()
            }
            _ => false,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        FlagValue::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        FlagValue::Int(value)
    }
}

impl From<f64> for FlagValue {
    fn from(value: f64) -> Self {
        FlagValue::Float(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        FlagValue::String(value.to_string())
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{}", b),
            FlagValue::Int(i) => write!(f, "{}", i),
            FlagValue::Float(x) => write!(f, "{}", x),
            FlagValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// The narrative progress of a campaign.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoryState {
    /// Named story flags.
    #[serde(default)]
    pub flags: HashMap<String, FlagValue>,

    /// Completed beats in completion order, without duplicates.
    #[serde(default)]
    pub completed_beats: Vec<String>,

    /// Date each beat was completed. Read by time-based world triggers.
    #[serde(default)]
    pub beat_timestamps: HashMap<String, GameDate>,

    /// Current in-game date, if the campaign has started its clock.
    #[serde(default)]
    pub current_date: Option<GameDate>,
}

impl StoryState {
    /// Create a new empty story state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a story state whose clock starts at `date`.
    pub fn starting_at(date: GameDate) -> Self {
        Self {
            current_date: Some(date),
            ..Self::default()
        }
    }

    /// Check if a beat has been completed.
    pub fn is_beat_complete(&self, beat: &str) -> bool {
        self.completed_beats.iter().any(|b| b == beat)
    }

    /// Record a beat as completed on `date`.
    ///
    /// Returns `false` if the beat was already complete; its original
    /// timestamp is kept in that case.
    pub fn complete_beat(&mut self, beat: impl Into<String>, date: Option<GameDate>) -> bool {
        let beat = beat.into();
        if self.is_beat_complete(&beat) {
            return false;
        }
        if let Some(date) = date.or(self.current_date) {
            self.beat_timestamps.insert(beat.clone(), date);
        }
        self.completed_beats.push(beat);
        true
    }

    /// Date a beat was completed, if recorded.
    pub fn beat_completed_at(&self, beat: &str) -> Option<&GameDate> {
        self.beat_timestamps.get(beat)
    }

    /// Get a flag value.
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// Set a flag value, returning the previous one.
    pub fn set_flag(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) -> Option<FlagValue> {
        self.flags.insert(name.into(), value.into())
    }

    /// Move the clock forward by whole hours. No-op if the clock is unset.
    pub fn advance_hours(&mut self, hours: i64) {
        if let Some(date) = self.current_date {
            self.current_date = Some(date.add_hours(hours));
        }
    }
}
