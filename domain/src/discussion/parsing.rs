//! Lenient parsing of model output.
//!
//! These functions extract structured data from free-form LLM responses.
//! They are pure domain logic: no I/O, no session management, just text
//! handling with defensive defaults.
//!
//! | Function | Use case | Fallback |
//! |----------|----------|----------|
//! | [`parse_consensus_score`] | Consensus probe | 0.5 (moderate, uncertain) |
//! | [`decode_summary`] | Final summary JSON | [`DiscussionSummary::fallback`] |

use super::summary::{DiscussionSummary, Sentiment};
use serde_json::Value;

/// Maximum entries kept in the takeaway / action-item lists
const MAX_LIST_ENTRIES: usize = 5;

/// Parse a consensus-analysis response into a score in [0, 1].
///
/// The probe prompt asks for a single float, but models decorate. Tries the
/// whole trimmed response first, then scans for the first parseable number.
/// Returns 0.5 when nothing parses: assume moderate, uncertain consensus
/// rather than propagating an error.
pub fn parse_consensus_score(response: &str) -> f64 {
    let trimmed = response.trim();
    if let Ok(score) = trimmed.parse::<f64>() {
        return score.clamp(0.0, 1.0);
    }

    for word in trimmed.split_whitespace() {
        // Trim decorations from both ends, sentence-final periods included
        let candidate = word.trim_matches(|c: char| !c.is_ascii_digit());
        if let Ok(score) = candidate.parse::<f64>() {
            return score.clamp(0.0, 1.0);
        }
    }

    0.5
}

/// Decode a model's summary response into a [`DiscussionSummary`].
///
/// Lenient on purpose: strips markdown code fences, locates the first
/// `{...}` block, parses it, then validates every field independently so
/// a single malformed field never poisons the rest. A response with no
/// parseable JSON at all yields the fixed fallback summary seeded with
/// `fallback_consensus`.
pub fn decode_summary(response: &str, fallback_consensus: f64) -> DiscussionSummary {
    let Some(parsed) = extract_json_object(response) else {
        return DiscussionSummary::fallback(fallback_consensus);
    };

    let fallback = DiscussionSummary::fallback(fallback_consensus);

    DiscussionSummary {
        key_takeaways: string_list(parsed.get("keyTakeaways")).unwrap_or(fallback.key_takeaways),
        action_items: string_list(parsed.get("actionItems")).unwrap_or(fallback.action_items),
        sentiment: parsed
            .get("sentiment")
            .and_then(Value::as_str)
            .map(Sentiment::parse_or_neutral)
            .unwrap_or(Sentiment::Neutral),
        sentiment_explanation: string_field(parsed.get("sentimentExplanation")),
        consensus_level: parsed
            .get("consensusLevel")
            .and_then(Value::as_f64)
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(fallback_consensus.clamp(0.0, 1.0)),
        consensus_explanation: string_field(parsed.get("consensusExplanation")),
        next_steps: string_field(parsed.get("nextSteps")),
    }
}

/// Locate and parse the first `{...}` block in a response.
fn extract_json_object(response: &str) -> Option<Value> {
    // Strip code-fence markers so "```json\n{...}\n```" parses cleanly
    let cleaned: String = response
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n");

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end < start {
        return None;
    }

    serde_json::from_str::<Value>(&cleaned[start..=end])
        .ok()
        .filter(Value::is_object)
}

fn string_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// A JSON array coerced to strings, truncated to [`MAX_LIST_ENTRIES`].
/// `None` when the value is absent or not an array.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let array = value?.as_array()?;
    Some(
        array
            .iter()
            .filter_map(Value::as_str)
            .take(MAX_LIST_ENTRIES)
            .map(str::to_string)
            .collect(),
    )
}
