//! Discussion messages

use super::style::DebateStyle;
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageRole {
    Expert,
    Moderator,
}

/// One contribution in the discussion log
///
/// Created exactly once and appended to the ordered log; never mutated or
/// deleted by the engine. Append order is dialogue order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: MessageRole,
    pub round: u32,
    /// Present only for expert messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debate_style: Option<DebateStyle>,
    /// Originating expert id, when role is Expert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_id: Option<String>,
    /// Speaker name as rendered in context windows ("Moderator" for moderator messages)
    pub speaker: String,
}

impl Message {
    /// Create an expert message for the given round
    pub fn expert(
        content: impl Into<String>,
        round: u32,
        style: DebateStyle,
        expert_id: impl Into<String>,
        speaker: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            role: MessageRole::Expert,
            round,
            debate_style: Some(style),
            expert_id: Some(expert_id.into()),
            speaker: speaker.into(),
        }
    }

    /// Create a moderator message for the given round
    pub fn moderator(content: impl Into<String>, round: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            role: MessageRole::Moderator,
            round,
            debate_style: None,
            expert_id: None,
            speaker: "Moderator".to_string(),
        }
    }

    pub fn is_expert(&self) -> bool {
        self.role == MessageRole::Expert
    }

    pub fn is_moderator(&self) -> bool {
        self.role == MessageRole::Moderator
    }
}
