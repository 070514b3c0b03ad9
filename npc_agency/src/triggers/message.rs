//! Narrative messages emitted when world triggers fire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use story_rules::{GameDate, MessageTemplate, Npc};

/// Unique identifier for trigger messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Create a new random message ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Addressee of a single message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Broadcast,
    Npc(String),
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recipient::Broadcast => write!(f, "all"),
            Recipient::Npc(id) => write!(f, "{}", id),
        }
    }
}

/// A message an NPC sends because one of its triggers fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMessage {
    pub id: MessageId,
    pub trigger_id: String,
    pub from: String,
    pub to: Recipient,
    pub subject: Option<String>,
    pub body: String,
    pub sent_on: Option<GameDate>,
}

impl TriggerMessage {
    /// Render a template for one recipient.
    ///
    /// `{npc}`, `{recipient}` and `{date}` in subject and body are replaced.
    pub fn render(
        trigger_id: &str,
        sender: &Npc,
        to: Recipient,
        template: &MessageTemplate,
        sent_on: Option<GameDate>,
    ) -> Self {
        let date = sent_on.map(|d| d.to_string()).unwrap_or_else(|| "unknown".to_string());
        let recipient = to.to_string();
        let fill = |text: &str| {
            text.replace("{npc}", &sender.name)
                .replace("{recipient}", &recipient)
                .replace("{date}", &date)
        };

        Self {
            id: MessageId::new(),
            trigger_id: trigger_id.to_string(),
            from: sender.id.clone(),
            subject: template.subject.as_deref().map(&fill),
            body: fill(&template.body),
            to,
            sent_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholders() {
        let sender = Npc::new("vex", "Lieutenant Vex");
        let template = MessageTemplate {
            subject: Some("Report for {recipient}".into()),
            body: "{npc} reporting on {date}.".into(),
        };

        let msg = TriggerMessage::render(
            "report",
            &sender,
            Recipient::Npc("torres".into()),
            &template,
            GameDate::new(42, 2305),
        );

        assert_eq!(msg.from, "vex");
        assert_eq!(msg.subject.as_deref(), Some("Report for torres"));
        assert_eq!(msg.body, "Lieutenant Vex reporting on 2305-042.");
    }

    #[test]
    fn test_message_ids_are_unique() {
        let sender = Npc::new("vex", "Vex");
        let template = MessageTemplate {
            subject: None,
            body: "Hello {recipient}".into(),
        };

        let a = TriggerMessage::render("t", &sender, Recipient::Broadcast, &template, None);
        let b = TriggerMessage::render("t", &sender, Recipient::Broadcast, &template, None);

        assert_ne!(a.id, b.id);
        assert_eq!(a.body, "Hello all");
    }
}
