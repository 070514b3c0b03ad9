//! World trigger definitions - NPC-authored narrative events.

use serde::{Deserialize, Serialize};

use crate::story_state::FlagValue;

/// Prefix marking a required beat that must NOT be complete.
pub const NEGATED_PREFIX: char = '!';

/// What must be true of the story for a trigger to fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TriggerCondition {
    /// The beat is complete.
    Beat { beat: String },
    /// The flag strictly equals `value`.
    Flag { flag: String, value: FlagValue },
    /// At least `hours` have passed since `after_beat` was completed.
    Time { after_beat: String, hours: u32 },
}

/// One entry of a trigger's `requires` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement<'a> {
    pub beat: &'a str,
    pub negated: bool,
}

impl<'a> Requirement<'a> {
    /// Parse `"beat"` or `"!beat"`.
    pub fn parse(raw: &'a str) -> Self {
        match raw.strip_prefix(NEGATED_PREFIX) {
            Some(beat) => Self { beat, negated: true },
            None => Self {
                beat: raw,
                negated: false,
            },
        }
    }
}

/// Who receives a trigger's message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Recipients {
    /// A single message addressed to everyone.
    #[default]
    Broadcast,
    /// One message per listed NPC id.
    Npcs(Vec<String>),
}

/// Subject and body of a trigger message.
///
/// The body may reference `{npc}`, `{recipient}` and `{date}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplate {
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

/// A narrative trigger owned by one NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldTrigger {
    pub id: String,
    pub condition: TriggerCondition,

    /// Beats that must be complete, or with a `!` prefix, must not be.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Fire at most once across the campaign.
    #[serde(default)]
    pub once: bool,

    #[serde(default)]
    pub targets: Recipients,

    pub message: MessageTemplate,
}

impl WorldTrigger {
    pub fn new(id: impl Into<String>, condition: TriggerCondition, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition,
            requires: Vec::new(),
            once: false,
            targets: Recipients::Broadcast,
            message: MessageTemplate {
                subject: None,
                body: body.into(),
            },
        }
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn requiring(mut self, requirement: impl Into<String>) -> Self {
        self.requires.push(requirement.into());
        self
    }

    pub fn to_npcs(mut self, npcs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.targets = Recipients::Npcs(npcs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.message.subject = Some(subject.into());
        self
    }

    pub fn requirements(&self) -> impl Iterator<Item = Requirement<'_>> {
        self.requires.iter().map(|r| Requirement::parse(r))
    }
}
