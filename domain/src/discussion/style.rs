//! Debate styles and per-round style selection

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rhetorical stance constraining how a turn relates to prior turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateStyle {
    Agreeable,
    Challenging,
    Questioning,
    Building,
    Contrasting,
}

impl DebateStyle {
    /// All five styles, in declaration order
    pub const ALL: [DebateStyle; 5] = [
        DebateStyle::Agreeable,
        DebateStyle::Challenging,
        DebateStyle::Questioning,
        DebateStyle::Building,
        DebateStyle::Contrasting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebateStyle::Agreeable => "agreeable",
            DebateStyle::Challenging => "challenging",
            DebateStyle::Questioning => "questioning",
            DebateStyle::Building => "building",
            DebateStyle::Contrasting => "contrasting",
        }
    }

    /// The prompt instruction attached to a turn generated in this style
    pub fn instruction(&self) -> &'static str {
        match self {
            DebateStyle::Agreeable => {
                "Build on the points raised so far and acknowledge where you agree."
            }
            DebateStyle::Challenging => {
                "Critique the strongest recent claim constructively and explain what it misses."
            }
            DebateStyle::Questioning => {
                "Probe for gaps: raise the questions the discussion has not yet answered."
            }
            DebateStyle::Building => {
                "Take the most promising idea on the table and extend it further."
            }
            DebateStyle::Contrasting => {
                "Offer a genuinely different approach from what has been proposed."
            }
        }
    }
}

impl std::fmt::Display for DebateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-round debate style selector
///
/// Tracks which styles have been used within the current round and applies
/// the selection rules:
/// - once all five styles have been used, the set resets and any style may
///   be picked;
/// - once at least two styles have been used and `challenging` has not yet
///   appeared, `challenging` is forced (guarantees one critical turn per
///   round once enough turns have happened);
/// - otherwise a uniformly random unused style is picked.
#[derive(Debug, Default)]
pub struct StylePicker {
    used: HashSet<DebateStyle>,
}

impl StylePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the used-set at the start of a round
    pub fn reset(&mut self) {
        self.used.clear();
    }

    /// Styles used so far in the current round
    pub fn used(&self) -> &HashSet<DebateStyle> {
        &self.used
    }

    /// Select the style for the next turn and record it as used
    pub fn pick(&mut self) -> DebateStyle {
        let mut rng = rand::thread_rng();
        let unused: Vec<DebateStyle> = DebateStyle::ALL
            .iter()
            .copied()
            .filter(|s| !self.used.contains(s))
            .collect();

        let choice = if unused.is_empty() {
            self.used.clear();
            *DebateStyle::ALL
                .choose(&mut rng)
                .expect("style set is non-empty")
        } else if self.used.len() >= 2 && !self.used.contains(&DebateStyle::Challenging) {
            DebateStyle::Challenging
        } else {
            *unused.choose(&mut rng).expect("unused set is non-empty")
        };

        self.used.insert(choice);
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_serde_lowercase() {
        let json = serde_json::to_string(&DebateStyle::Challenging).unwrap();
        assert_eq!(json, "\"challenging\"");
        let back: DebateStyle = serde_json::from_str("\"agreeable\"").unwrap();
        assert_eq!(back, DebateStyle::Agreeable);
    }

    #[test]
    fn test_pick_never_repeats_before_reset() {
        let mut picker = StylePicker::new();
        let mut seen = HashSet::new();
        for _ in 0..5 {
            let style = picker.pick();
            assert!(seen.insert(style), "style {} repeated within round", style);
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_challenging_forced_by_third_pick() {
        // Over many rounds, challenging must appear within the first three
        // picks: either randomly among the first two, or forced on the third.
        for _ in 0..50 {
            let mut picker = StylePicker::new();
            let first_three = [picker.pick(), picker.pick(), picker.pick()];
            assert!(
                first_three.contains(&DebateStyle::Challenging),
                "challenging missing from {:?}",
                first_three
            );
        }
    }

    #[test]
    fn test_exhausted_set_resets() {
        let mut picker = StylePicker::new();
        for _ in 0..5 {
            picker.pick();
        }
        assert_eq!(picker.used().len(), 5);
        // Sixth pick triggers a reset; the picked style is the only one used
        let sixth = picker.pick();
        assert_eq!(picker.used().len(), 1);
        assert!(picker.used().contains(&sixth));
    }

    #[test]
    fn test_reset_clears_used() {
        let mut picker = StylePicker::new();
        picker.pick();
        picker.pick();
        picker.reset();
        assert!(picker.used().is_empty());
    }
}
