//! Observable discussion events
//!
//! [`DiscussionEvent`] is the only channel through which the engine's
//! progress is observable. Events serialize as internally tagged JSON
//! (`"type"` field, camelCase payload keys) so a transport can forward
//! them to a client verbatim.

use super::style::DebateStyle;
use super::summary::DiscussionSummary;
use serde::{Deserialize, Serialize};

/// One observable step of a discussion run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DiscussionEvent {
    /// An expert's turn begins; streaming follows
    ExpertStart {
        expert_id: String,
        expert_name: String,
        expert_color: String,
        round: u32,
        debate_style: DebateStyle,
    },
    /// One streamed text fragment of the active turn
    Token { content: String },
    /// The active turn finished; carries the full text and message id
    ExpertComplete {
        message_id: String,
        expert_id: String,
        full_content: String,
    },
    /// A round finished, with its consensus score when one was computed
    RoundComplete {
        round: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        consensus_score: Option<f64>,
    },
    /// Invitation for a caller-side moderator interjection
    ModeratorPrompt { message: String },
    /// The end-of-discussion summary
    DiscussionSummary { summary: DiscussionSummary },
    /// Terminal event; always eventually emitted once a run starts
    DiscussionComplete { discussion_id: String },
    /// A recoverable-but-notable failure (e.g. a turn that exhausted retries)
    Error { message: String },
}

impl DiscussionEvent {
    /// Wire tag of this event (matches the serialized `type` field)
    pub fn kind(&self) -> &'static str {
        match self {
            DiscussionEvent::ExpertStart { .. } => "expert_start",
            DiscussionEvent::Token { .. } => "token",
            DiscussionEvent::ExpertComplete { .. } => "expert_complete",
            DiscussionEvent::RoundComplete { .. } => "round_complete",
            DiscussionEvent::ModeratorPrompt { .. } => "moderator_prompt",
            DiscussionEvent::DiscussionSummary { .. } => "discussion_summary",
            DiscussionEvent::DiscussionComplete { .. } => "discussion_complete",
            DiscussionEvent::Error { .. } => "error",
        }
    }

    /// True for the terminal `discussion_complete` event
    pub fn is_terminal(&self) -> bool {
        matches!(self, DiscussionEvent::DiscussionComplete { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expert_start_wire_format() {
        let event = DiscussionEvent::ExpertStart {
            expert_id: "e1".to_string(),
            expert_name: "Ada".to_string(),
            expert_color: "#ff8800".to_string(),
            round: 2,
            debate_style: DebateStyle::Challenging,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "expert_start");
        assert_eq!(json["expertId"], "e1");
        assert_eq!(json["expertName"], "Ada");
        assert_eq!(json["round"], 2);
        assert_eq!(json["debateStyle"], "challenging");
    }

    #[test]
    fn test_round_complete_omits_missing_score() {
        let event = DiscussionEvent::RoundComplete {
            round: 1,
            consensus_score: None,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "round_complete");
        assert!(json.get("consensusScore").is_none());
    }

    #[test]
    fn test_kind_matches_serialized_tag() {
        let event = DiscussionEvent::Token {
            content: "hi".to_string(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
    }

    #[test]
    fn test_terminal_detection() {
        let done = DiscussionEvent::DiscussionComplete {
            discussion_id: "d1".to_string(),
        };
        assert!(done.is_terminal());
        assert!(!DiscussionEvent::Error {
            message: "x".to_string()
        }
        .is_terminal());
    }
}
