//! Decision engine for the iterated three-region foraging game.
//!
//! Two players each round privately claim one of three regions. An
//! unclaimed region's vegetation regrows, a claimed region is harvested and
//! depleted, and a round where both players claim the same region pays
//! neither (a collision). This crate implements one player seat for that
//! game: round history, per-region vegetation simulation, opponent
//! statistics, and a layered move-selection strategy, driven one decision
//! per round by an external referee.
//!
//! The entry point is [`ForageAgent`]; everything underneath it —
//! [`RoundLedger`], [`GameSimulation`], [`MetricRegistry`],
//! [`StrategyChain`] — is public for referees and tooling that want to
//! inspect a match as it runs.

mod agent;
mod error;
mod history;
mod metrics;
mod region;
mod simulation;
mod strategy;

pub use agent::{ForageAgent, IDENTITY};
pub use error::{AgentError, Result};
pub use history::{RoundLedger, RoundRecord};
pub use metrics::{
    opponent_distribution_name, FightPercent, LikelyOpponentRegion, Metric, MetricRegistry,
    MetricValue, MetricValues, OpponentDistribution, PayoffSum, DEFAULT_METRIC_DEPTH,
    FIGHT_PERCENT, MOST_LIKELY_OPPONENT_REGION, OPPONENT_DISTRIBUTION_A,
    OPPONENT_DISTRIBUTION_B, OPPONENT_DISTRIBUTION_C, PAYOFF_SUM,
};
pub use region::Region;
pub use simulation::{vegetation_amount, GameSimulation, RegionState};
pub use strategy::{MaxPayoffSelector, RandomSelector, StrategyChain};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_agents_play_a_full_match() {
        // Drive two seats against each other the way a referee would:
        // feed each side the other's previous move.
        let mut left = ForageAgent::seeded(1);
        let mut right = ForageAgent::seeded(2);

        let mut left_move = left.play(None).unwrap();
        let mut right_move = right.play(None).unwrap();

        for _ in 0..100 {
            let next_left = left.play(Some(right_move)).unwrap();
            let next_right = right.play(Some(left_move)).unwrap();
            left_move = next_left;
            right_move = next_right;
        }

        assert_eq!(left.ledger().len(), 101);
        assert_eq!(right.ledger().len(), 101);

        // Payoff bookkeeping agrees with the metric over the full window.
        let total: f64 = left
            .ledger()
            .records()
            .iter()
            .map(RoundRecord::own_payoff)
            .sum();
        assert!(total >= 0.0);
    }
}
