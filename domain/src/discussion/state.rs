//! Mutable engine-owned discussion state

use super::message::Message;
use std::collections::HashMap;

/// How many of an expert's tracked key points are surfaced back into prompts
pub const SURFACED_POINTS: usize = 3;

/// Running state of one discussion (owned exclusively by the engine)
///
/// The message log is append-only and never reordered; append order is
/// dialogue order. The state is initialized at construction, mutated only
/// by the engine's own turn/round/summary operations, and discarded with
/// the engine; nothing here is persisted.
#[derive(Debug, Default)]
pub struct DiscussionState {
    /// Current round number (0 before the run starts)
    pub current_round: u32,
    /// Whether the run loop is active
    pub running: bool,
    /// Most recently computed consensus score (0.0 - 1.0)
    pub last_consensus: f64,
    messages: Vec<Message>,
    previous_points: HashMap<String, Vec<String>>,
}

impl DiscussionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the log
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The full ordered message log
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The last `n` messages, in dialogue order
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Record key points raised by an expert, for repetition avoidance
    pub fn record_points(&mut self, expert_name: &str, points: Vec<String>) {
        self.previous_points
            .entry(expert_name.to_string())
            .or_default()
            .extend(points);
    }

    /// The expert's most recent tracked points (at most [`SURFACED_POINTS`])
    pub fn points_for(&self, expert_name: &str) -> &[String] {
        match self.previous_points.get(expert_name) {
            Some(points) => {
                let start = points.len().saturating_sub(SURFACED_POINTS);
                &points[start..]
            }
            None => &[],
        }
    }
}

/// Extract up to 3 candidate key points from a turn's text.
///
/// Naive longest-sentence heuristic: split on sentence-ending punctuation,
/// keep sentences longer than 20 characters, take the first 3.
pub fn extract_key_points(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > 20)
        .take(3)
        .map(str::to_string)
        .collect()
}
