//! Prompt assembly for expert turns, consensus probes and summaries
//!
//! Pure functions over discussion configuration and state. The engine calls
//! these; nothing here performs I/O.

use super::role::RoleCategory;
use crate::discussion::expert::{DiscussionConfig, Expert};
use crate::discussion::state::DiscussionState;
use crate::discussion::style::DebateStyle;
use rand::seq::SliceRandom;

/// How many log messages are rendered into the recent-context block
pub const RECENT_CONTEXT_WINDOW: usize = 4;

/// How many messages feed the consensus-analysis probe
pub const CONSENSUS_WINDOW: usize = 6;

/// How many trailing messages are scanned for a moderator interjection
const MODERATOR_LOOKBACK: usize = 3;

/// Friction-increasing sentences appended once the discussion has depth
const PROVOCATIVE_ADDITIONS: [&str; 5] = [
    "Take a firm position even if it proves controversial.",
    "Name the assumption in this discussion you find weakest.",
    "What would make you change your mind on this?",
    "Point out the trade-off everyone is quietly ignoring.",
    "If this plan fails, what will have been the most likely cause?",
];

/// Builds the exact instruction text sent to completion clients
pub struct PromptBuilder;

impl PromptBuilder {
    /// One-line directive forcing output in the configured language
    pub fn language_directive(language: &str) -> String {
        format!("Respond exclusively in the language with code '{language}'.")
    }

    /// The last [`RECENT_CONTEXT_WINDOW`] messages as "Speaker: content" lines
    pub fn recent_context(state: &DiscussionState) -> String {
        let recent = state.recent(RECENT_CONTEXT_WINDOW);
        if recent.is_empty() {
            return "No one has spoken yet.".to_string();
        }
        recent
            .iter()
            .map(|m| format!("{}: {}", m.speaker, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Reminder of the expert's own recent points, to discourage repetition
    pub fn previous_points(state: &DiscussionState, expert_name: &str) -> String {
        let points = state.points_for(expert_name);
        if points.is_empty() {
            return String::new();
        }
        let mut text = String::from("You have already made these points; do not repeat them:\n");
        for point in points {
            text.push_str(&format!("- {}\n", point));
        }
        text
    }

    /// The round-specific question for an expert.
    ///
    /// Round 1 always asks for an initial assessment. Later rounds branch on
    /// the expert's role category; the final round (when it exists, i.e.
    /// totalRounds >= 4) asks for consolidated recommendations. Once the
    /// discussion has depth, a random provocative addition raises friction,
    /// and any recent moderator interjection gets an explicit callout.
    pub fn round_question(
        config: &DiscussionConfig,
        state: &DiscussionState,
        expert: &Expert,
        round: u32,
    ) -> String {
        let mut question = if round <= 1 {
            "Give your initial assessment of the topic from your area of expertise.".to_string()
        } else if config.is_final_round(round) {
            "This is the final round: consolidate the discussion into your concrete \
             recommendations and closing position."
                .to_string()
        } else {
            RoleCategory::from_role(&expert.role)
                .deep_dive_question()
                .to_string()
        };

        if state.message_count() > 5 && round >= 2 {
            let addition = PROVOCATIVE_ADDITIONS
                .choose(&mut rand::thread_rng())
                .expect("provocative additions are non-empty");
            question.push(' ');
            question.push_str(addition);
        }

        if let Some(comment) = Self::recent_moderator_comment(state) {
            question.push_str(&format!(
                "\nThe moderator has interjected: \"{}\". Address this comment explicitly.",
                comment
            ));
        }

        question
    }

    /// The full prompt for one expert turn
    pub fn turn_prompt(
        config: &DiscussionConfig,
        state: &DiscussionState,
        expert: &Expert,
        style: DebateStyle,
        round: u32,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str(&expert.system_prompt);
        prompt.push_str("\n\n");
        prompt.push_str(&format!("Discussion topic: {}\n\n", config.topic));
        prompt.push_str("Recent discussion:\n");
        prompt.push_str(&Self::recent_context(state));
        prompt.push_str("\n\n");

        let previous = Self::previous_points(state, &expert.name);
        if !previous.is_empty() {
            prompt.push_str(&previous);
            prompt.push('\n');
        }

        prompt.push_str("Instructions for this turn:\n");
        prompt.push_str(&format!("- {}\n", style.instruction()));
        prompt.push_str("- Refer to other participants by name where it strengthens your point.\n");
        prompt.push_str("- Disagree constructively; attack ideas, never people.\n");
        if config.is_final_round(round) {
            prompt.push_str("- Wrap up: work toward a conclusion rather than opening new threads.\n");
        } else {
            prompt.push_str("- Push the discussion forward with something new.\n");
        }
        prompt.push_str(&format!(
            "\n{}\n\n",
            Self::round_question(config, state, expert, round)
        ));

        prompt.push_str(&format!(
            "Respond as {} would, staying in character. Keep it under 350 words.\n",
            expert.name
        ));
        prompt.push_str(&Self::language_directive(&config.language));

        prompt
    }

    /// Prompt asking a model to rate agreement among recent messages
    pub fn consensus_prompt(state: &DiscussionState) -> String {
        let mut prompt = String::from(
            "Rate the level of agreement among the participants in the following \
             conversation excerpt.\n\n",
        );
        for message in state.recent(CONSENSUS_WINDOW) {
            prompt.push_str(&format!("{}: {}\n", message.speaker, message.content));
        }
        prompt.push_str(
            "\nRespond with a single number between 0 and 1, where 0 means total \
             disagreement and 1 means full consensus. Output only the number.",
        );
        prompt
    }

    /// Prompt asking a model for the strict-JSON discussion summary
    pub fn summary_prompt(config: &DiscussionConfig, state: &DiscussionState) -> String {
        let mut transcript = String::new();
        for message in state.messages().iter().filter(|m| m.is_expert()) {
            transcript.push_str(&format!("{}: {}\n", message.speaker, message.content));
        }

        format!(
            "The following expert discussion on \"{topic}\" has concluded:\n\n\
             {transcript}\n\
             Summarize it as a single JSON object with exactly these fields:\n\
             {{\n\
             \"keyTakeaways\": [3-5 short strings],\n\
             \"actionItems\": [3-5 short strings],\n\
             \"sentiment\": \"positive\" | \"neutral\" | \"mixed\" | \"negative\",\n\
             \"sentimentExplanation\": one line,\n\
             \"consensusLevel\": number between 0 and 1,\n\
             \"consensusExplanation\": one line,\n\
             \"nextSteps\": one recommendation string\n\
             }}\n\
             Write all text in the language with code '{language}'. \
             Output only the JSON object, no surrounding prose.",
            topic = config.topic,
            transcript = transcript,
            language = config.language,
        )
    }

    /// The most recent moderator comment within the lookback window, if any
    fn recent_moderator_comment(state: &DiscussionState) -> Option<&str> {
        state
            .recent(MODERATOR_LOOKBACK)
            .iter()
            .rev()
            .find(|m| m.is_moderator())
            .map(|m| m.content.as_str())
    }
}
