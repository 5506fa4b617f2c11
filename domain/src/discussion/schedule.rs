//! Per-round turn scheduling

use super::expert::DiscussionConfig;
use rand::seq::SliceRandom;

/// Decides speaking order and generation temperature per round
pub struct TurnScheduler;

impl TurnScheduler {
    /// Speaking order for a round, as indices into the configured roster.
    ///
    /// The final round (only when the discussion has at least 4 rounds)
    /// uses stable roster order for a deliberate closing-statements feel;
    /// every other round gets a fresh shuffle that is not persisted.
    pub fn round_order(config: &DiscussionConfig, round: u32) -> Vec<usize> {
        let mut order: Vec<usize> = (0..config.experts.len()).collect();
        if !config.is_final_round(round) {
            order.shuffle(&mut rand::thread_rng());
        }
        order
    }

    /// Generation temperature for a round.
    ///
    /// The last configured round drops to 0.6 to favor convergent phrasing;
    /// earlier rounds run at 0.8. Unlike final-round ordering, this kicks in
    /// for any round count.
    pub fn temperature(config: &DiscussionConfig, round: u32) -> f32 {
        if round >= config.total_rounds {
            0.6
        } else {
            0.8
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModelId;
    use crate::discussion::expert::Expert;

    fn config(rounds: u32) -> DiscussionConfig {
        let experts = (0..6)
            .map(|i| Expert::new(format!("e{}", i), format!("Expert {}", i), "Analyst"))
            .collect();
        DiscussionConfig::new("Topic", experts, ModelId::new("gpt-4o"))
            .unwrap()
            .with_rounds(rounds)
            .unwrap()
    }

    #[test]
    fn test_final_round_uses_roster_order() {
        let config = config(4);
        let order = TurnScheduler::round_order(&config, 4);
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_three_round_discussion_shuffles_its_last_round() {
        // totalRounds = 3 never triggers the roster-order path
        let config = config(3);
        let shuffled = (0..200).any(|_| TurnScheduler::round_order(&config, 3) != vec![0, 1, 2, 3, 4, 5]);
        assert!(shuffled, "round 3 of 3 should be a random permutation");
    }

    #[test]
    fn test_early_rounds_shuffle() {
        let config = config(4);
        // With 6 experts a fresh shuffle matching roster order 200 times in a
        // row is (1/720)^200, so any deviation proves shuffling.
        let shuffled = (0..200).any(|_| TurnScheduler::round_order(&config, 1) != vec![0, 1, 2, 3, 4, 5]);
        assert!(shuffled, "early rounds should be randomly permuted");
    }

    #[test]
    fn test_order_is_a_permutation() {
        let config = config(4);
        let mut order = TurnScheduler::round_order(&config, 2);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_temperature_schedule() {
        let config = config(3);
        assert_eq!(TurnScheduler::temperature(&config, 1), 0.8);
        assert_eq!(TurnScheduler::temperature(&config, 2), 0.8);
        // Temperature drop applies on the last round of any round count
        assert_eq!(TurnScheduler::temperature(&config, 3), 0.6);
    }
}
