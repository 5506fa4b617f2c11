//! End-of-discussion summary types

use serde::{Deserialize, Serialize};

/// Overall sentiment of a discussion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Mixed,
    Negative,
}

impl Sentiment {
    /// Parse a sentiment label, defaulting to `Neutral` for anything unknown
    pub fn parse_or_neutral(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "mixed" => Sentiment::Mixed,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Mixed => "mixed",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured summary produced at most once per discussion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionSummary {
    /// 3-5 short takeaway strings
    pub key_takeaways: Vec<String>,
    /// 3-5 short action items
    pub action_items: Vec<String>,
    pub sentiment: Sentiment,
    pub sentiment_explanation: String,
    /// Consensus level in [0, 1]
    pub consensus_level: f64,
    pub consensus_explanation: String,
    pub next_steps: String,
}

impl DiscussionSummary {
    /// Fixed fallback used when the model's summary cannot be decoded.
    ///
    /// `consensus_level` is seeded from the engine's last computed score so
    /// the fallback still reflects the run that produced it.
    pub fn fallback(consensus_level: f64) -> Self {
        Self {
            key_takeaways: vec![
                "The experts examined the topic from several angles".to_string(),
                "Multiple viewpoints were presented and debated".to_string(),
                "Further discussion may be needed to settle open points".to_string(),
            ],
            action_items: vec![
                "Review the full discussion transcript".to_string(),
                "Identify the concrete proposals raised".to_string(),
                "Schedule a follow-up on unresolved questions".to_string(),
            ],
            sentiment: Sentiment::Neutral,
            sentiment_explanation: "The discussion could not be summarized automatically"
                .to_string(),
            consensus_level: consensus_level.clamp(0.0, 1.0),
            consensus_explanation: "Based on the engine's last computed consensus score"
                .to_string(),
            next_steps: "Review the transcript and decide how to proceed".to_string(),
        }
    }
}
