//! Expert entity and discussion configuration

use crate::core::{DomainError, ModelId};
use serde::{Deserialize, Serialize};

/// A simulated expert participating in a discussion (Entity)
///
/// Immutable for the duration of a discussion once the run starts; edits to
/// a stored roster elsewhere do not retroactively affect an in-flight run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expert {
    /// Stable identifier
    pub id: String,
    /// Display name used in transcripts and prompts
    pub name: String,
    /// Role label (e.g. "Marketing Strategist"), matched against role categories
    pub role: String,
    /// Short personality description woven into the persona prompt
    pub personality: String,
    /// Expertise tags
    #[serde(default)]
    pub expertise: Vec<String>,
    /// The persona system instruction sent with every turn
    pub system_prompt: String,
    /// Display color (hex or named, passed through to the consumer)
    pub color: String,
    /// Per-expert model override; falls back to the discussion's model when None
    #[serde(default)]
    pub model: Option<ModelId>,
}

impl Expert {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            personality: String::new(),
            expertise: Vec::new(),
            system_prompt: String::new(),
            color: "#888888".to_string(),
            model: None,
        }
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    pub fn with_expertise(mut self, expertise: Vec<String>) -> Self {
        self.expertise = expertise;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_model(mut self, model: ModelId) -> Self {
        self.model = Some(model);
        self
    }

    /// The model this expert speaks through, given the discussion fallback
    pub fn resolve_model<'a>(&'a self, fallback: &'a ModelId) -> &'a ModelId {
        self.model.as_ref().unwrap_or(fallback)
    }
}

/// Configuration for one discussion run
///
/// Provided once at engine construction; immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionConfig {
    /// Unique id of this discussion, echoed in the final `discussion_complete` event
    pub discussion_id: String,
    /// The topic under discussion
    pub topic: String,
    /// Ordered roster of experts (>= 1)
    pub experts: Vec<Expert>,
    /// Target language code for all generated text (e.g. "en", "ja")
    pub language: String,
    /// Whether to emit moderator-prompt events after each turn
    pub moderator_enabled: bool,
    /// Total number of rounds (>= 1)
    pub total_rounds: u32,
    /// Fallback model for experts without an override
    pub fallback_model: ModelId,
}

impl DiscussionConfig {
    pub fn new(
        topic: impl Into<String>,
        experts: Vec<Expert>,
        fallback_model: ModelId,
    ) -> Result<Self, DomainError> {
        let topic = topic.into();
        if experts.is_empty() {
            return Err(DomainError::EmptyRoster);
        }
        if topic.trim().is_empty() {
            return Err(DomainError::InvalidTopic("topic is empty".to_string()));
        }

        Ok(Self {
            discussion_id: uuid::Uuid::new_v4().to_string(),
            topic,
            experts,
            language: "en".to_string(),
            moderator_enabled: false,
            total_rounds: 3,
            fallback_model,
        })
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_moderator(mut self, enabled: bool) -> Self {
        self.moderator_enabled = enabled;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Result<Self, DomainError> {
        if rounds < 1 {
            return Err(DomainError::InvalidRoundCount(rounds));
        }
        self.total_rounds = rounds;
        Ok(self)
    }

    /// Whether `round` gets the "final round" treatment (roster order,
    /// closing-statement framing). Deliberately requires at least 4 total
    /// rounds: a 3-round discussion never triggers it, even on round 3.
    pub fn is_final_round(&self, round: u32) -> bool {
        round >= self.total_rounds && self.total_rounds >= 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<Expert> {
        vec![
            Expert::new("e1", "Ada", "Technical Architect"),
            Expert::new("e2", "Grace", "Business Strategist"),
        ]
    }

    #[test]
    fn test_config_requires_experts() {
        let result = DiscussionConfig::new("Topic", vec![], ModelId::new("gpt-4o"));
        assert!(matches!(result, Err(DomainError::EmptyRoster)));
    }

    #[test]
    fn test_config_requires_topic() {
        let result = DiscussionConfig::new("   ", roster(), ModelId::new("gpt-4o"));
        assert!(matches!(result, Err(DomainError::InvalidTopic(_))));
    }

    #[test]
    fn test_config_rejects_zero_rounds() {
        let config = DiscussionConfig::new("Topic", roster(), ModelId::new("gpt-4o")).unwrap();
        assert!(config.with_rounds(0).is_err());
    }

    #[test]
    fn test_final_round_requires_four_total_rounds() {
        let config = DiscussionConfig::new("Topic", roster(), ModelId::new("gpt-4o"))
            .unwrap()
            .with_rounds(3)
            .unwrap();
        // 3-round discussions never get final-round framing, even on round 3
        assert!(!config.is_final_round(3));

        let config = config.with_rounds(4).unwrap();
        assert!(!config.is_final_round(3));
        assert!(config.is_final_round(4));
        assert!(config.is_final_round(5));
    }

    #[test]
    fn test_expert_model_resolution() {
        let fallback = ModelId::new("gpt-4o");
        let plain = Expert::new("e1", "Ada", "Architect");
        assert_eq!(plain.resolve_model(&fallback), &fallback);

        let overridden =
            Expert::new("e2", "Grace", "Strategist").with_model(ModelId::new("claude-sonnet"));
        assert_eq!(
            overridden.resolve_model(&fallback),
            &ModelId::new("claude-sonnet")
        );
    }
}
