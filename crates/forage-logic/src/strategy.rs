//! Layered move selection: forced-move controller, payoff maximizer,
//! uniform random tie-break.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::history::RoundLedger;
use crate::metrics::{MetricRegistry, DEFAULT_METRIC_DEPTH};
use crate::region::Region;
use crate::simulation::{GameSimulation, RegionState};

/// Uniform random choice among candidate regions.
///
/// Owns the one RNG of the match. Seed it explicitly for reproducible
/// tests and replays.
pub struct RandomSelector {
    rng: SmallRng,
}

impl RandomSelector {
    pub fn new() -> Self {
        RandomSelector {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomSelector {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform choice among `candidates`; an empty set falls back to a
    /// uniform choice over all three regions (standalone use).
    pub fn choose(&mut self, candidates: &[Region]) -> Region {
        if candidates.is_empty() {
            return self.choose_any();
        }
        candidates[self.rng.gen_range(0..candidates.len())]
    }

    pub fn choose_any(&mut self) -> Region {
        Region::ALL[self.rng.gen_range(0..Region::ALL.len())]
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks among the regions currently holding the most vegetation; ties go
/// to the random selector.
pub struct MaxPayoffSelector {
    random: RandomSelector,
}

impl MaxPayoffSelector {
    pub fn new(random: RandomSelector) -> Self {
        MaxPayoffSelector { random }
    }

    pub fn select(&mut self, simulation: &GameSimulation) -> Region {
        let states = simulation.states();
        // Amount is strictly monotonic in step, so the richest state's step
        // identifies every region tied at the maximum amount.
        let richest_step = states
            .iter()
            .max_by(|left, right| left.amount().total_cmp(&right.amount()))
            .map(RegionState::step)
            .unwrap_or(0);
        let candidates: Vec<Region> = states
            .iter()
            .filter(|state| state.step() == richest_step)
            .map(RegionState::region)
            .collect();
        self.random.choose(&candidates)
    }
}

/// Primary per-round decision procedure.
///
/// Owns the metric registry shared by the whole chain; metric history
/// accumulates there across rounds, so a chain must live for the entire
/// match — constructing a fresh one mid-match discards that history.
pub struct StrategyChain {
    metrics: MetricRegistry,
    selector: MaxPayoffSelector,
}

impl StrategyChain {
    pub fn new() -> Self {
        Self::with_selector(RandomSelector::new())
    }

    /// Reproducible variant for tests and replays.
    pub fn seeded(seed: u64) -> Self {
        Self::with_selector(RandomSelector::seeded(seed))
    }

    fn with_selector(random: RandomSelector) -> Self {
        StrategyChain {
            metrics: MetricRegistry::with_defaults(DEFAULT_METRIC_DEPTH),
            selector: MaxPayoffSelector::new(random),
        }
    }

    pub fn metrics(&self) -> &MetricRegistry {
        &self.metrics
    }

    /// One decision per round.
    ///
    /// First round (no opponent move yet): straight to the payoff
    /// maximizer, without touching the metrics. Otherwise recompute all
    /// metrics, then take the forced move if only one region still has
    /// vegetation to take, else maximize payoff.
    pub fn decide(
        &mut self,
        ledger: &RoundLedger,
        simulation: &GameSimulation,
        last_opponent_move: Option<Region>,
    ) -> Region {
        if last_opponent_move.is_none() {
            return self.selector.select(simulation);
        }

        self.metrics.update_all(ledger);

        let grazable: Vec<&RegionState> = simulation
            .states()
            .iter()
            .filter(|state| state.step() > 0)
            .collect();
        if let [only] = grazable.as_slice() {
            // The opponent will take it too, or concede it. Either way no
            // other region pays anything this round.
            tracing::debug!(region = ?only.region(), "forced move, single region left");
            return only.region();
        }

        self.selector.select(simulation)
    }
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::new()
    }
}
