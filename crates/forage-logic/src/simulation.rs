//! Per-region vegetation simulation, advanced by completed rounds.

use serde::{Deserialize, Serialize};

use crate::history::RoundRecord;
use crate::region::Region;

/// Vegetation on a region after `step` regrowth steps: `10·e^s / (1 + e^s)`.
///
/// Saturating curve, exactly 5.0 at step 0, asymptote 10. Written in the
/// `10 / (1 + e^-s)` form so `e^s` cannot overflow for long-unclaimed
/// regions.
pub fn vegetation_amount(step: u32) -> f64 {
    10.0 / (1.0 + (-(step as f64)).exp())
}

/// Current state of one region: regrowth step and the vegetation amount
/// derived from it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RegionState {
    region: Region,
    step: u32,
    amount: f64,
}

impl RegionState {
    fn new(region: Region) -> Self {
        let mut state = RegionState {
            region,
            step: 0,
            amount: 0.0,
        };
        state.set_step(1);
        state
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Regrowth step, clamped at 0.
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Cached `vegetation_amount(step)`.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    fn set_step(&mut self, step: u32) {
        self.step = step;
        self.amount = vegetation_amount(step);
    }

    fn grow(&mut self) {
        self.set_step(self.step + 1);
    }

    fn graze(&mut self) {
        self.set_step(self.step.saturating_sub(1));
    }
}

/// Simulated game state for one match: all three regions, updated once per
/// completed round.
#[derive(Clone, Debug)]
pub struct GameSimulation {
    states: [RegionState; 3],
    baseline: f64,
}

impl GameSimulation {
    /// Fresh match state: every region starts at step 1.
    pub fn new() -> Self {
        GameSimulation {
            states: [
                RegionState::new(Region::A),
                RegionState::new(Region::B),
                RegionState::new(Region::C),
            ],
            baseline: vegetation_amount(0),
        }
    }

    /// Read-only snapshot of all region states, in code order.
    pub fn states(&self) -> &[RegionState; 3] {
        &self.states
    }

    pub fn state(&self, region: Region) -> &RegionState {
        &self.states[region.index()]
    }

    /// Settles a newly completed round.
    ///
    /// Collision: the contested region is grazed down one step, the other
    /// two grow; neither player harvests anything. No collision: each
    /// claimed region pays out its growth above the step-0 baseline (written
    /// into the record), then is grazed down; the one unclaimed region
    /// grows.
    pub fn apply_round(&mut self, record: &mut RoundRecord) {
        let Some(opponent) = record.opponent_move() else {
            // Only completed rounds move the simulation.
            return;
        };
        let own = record.own_move();

        if record.collision() {
            self.states[own.index()].graze();
        } else {
            let own_payoff = self.states[own.index()].amount() - self.baseline;
            let opponent_payoff = self.states[opponent.index()].amount() - self.baseline;
            record.settle_payoffs(own_payoff, opponent_payoff);
            self.states[own.index()].graze();
            self.states[opponent.index()].graze();
        }

        for state in self.states.iter_mut() {
            if state.region() != own && state.region() != opponent {
                state.grow();
            }
        }

        tracing::debug!(
            round = record.round(),
            collision = record.collision(),
            states = ?self.states,
            "settled round"
        );
    }
}

impl Default for GameSimulation {
    fn default() -> Self {
        Self::new()
    }
}
