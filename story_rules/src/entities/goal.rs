//! Goal definitions - units of NPC intent.

use serde::{Deserialize, Serialize};

use crate::calendar::GameDate;
use crate::story_state::FlagValue;

/// Lifecycle status of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    /// Always eligible.
    #[default]
    Active,
    /// Eligible only while its trigger holds.
    Background,
    /// Never acted on again.
    Completed,
}

/// Comparison used by flag-based goal triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompareOp {
    #[default]
    #[serde(rename = "eq", alias = "==")]
    Eq,
    #[serde(rename = "gt", alias = ">")]
    Gt,
    #[serde(rename = "gte", alias = ">=")]
    Gte,
    #[serde(rename = "lt", alias = "<")]
    Lt,
    #[serde(rename = "lte", alias = "<=")]
    Lte,
}

impl CompareOp {
    /// Compare a flag value against a target.
    ///
    /// `Eq` compares numbers by value regardless of kind. The relational operators require both sides
    /// to be numeric and are false otherwise.
    pub fn holds(&self, actual: &FlagValue, target: &FlagValue) -> bool {
        let numeric = || Some((actual.as_number()?, target.as_number()?));
        match self {
            CompareOp::Eq => actual == target,
            CompareOp::Gt => numeric().is_some_and(|(a, b)| a > b),
            CompareOp::Gte => numeric().is_some_and(|(a, b)| a >= b),
            CompareOp::Lt => numeric().is_some_and(|(a, b)| a < b),
            CompareOp::Lte => numeric().is_some_and(|(a, b)| a <= b),
        }
    }
}

/// Condition that makes a goal eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GoalTrigger {
    /// A story flag compared against a value.
    Flag {
        flag: String,
        #[serde(default)]
        op: CompareOp,
        value: FlagValue,
    },
    /// A beat has been completed.
    Beat { beat: String },
}

/// Minimum time between two actions taken for the same goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cooldown {
    Hours(u32),
    Days(u32),
}

impl Cooldown {
    pub fn as_hours(&self) -> i64 {
        match self {
            Cooldown::Hours(h) => *h as i64,
            Cooldown::Days(d) => *d as i64 * 24,
        }
    }
}

/// A goal owned by one NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Lower is more urgent. `None` sorts after every explicit priority.
    #[serde(default)]
    pub priority: Option<u32>,

    #[serde(default)]
    pub status: GoalStatus,

    #[serde(default)]
    pub trigger: Option<GoalTrigger>,

    #[serde(default)]
    pub cooldown: Option<Cooldown>,

    /// Date of the last action taken for this goal.
    #[serde(default)]
    pub last_acted: Option<GameDate>,

    /// Candidate action ids, in preference order.
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Goal {
    /// Create an active goal with no priority, trigger or actions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            priority: None,
            status: GoalStatus::Active,
            trigger: None,
            cooldown: None,
            last_acted: None,
            actions: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_status(mut self, status: GoalStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_trigger(mut self, trigger: GoalTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_cooldown(mut self, cooldown: Cooldown) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn with_last_acted(mut self, date: GameDate) -> Self {
        self.last_acted = Some(date);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == GoalStatus::Completed
    }
}
