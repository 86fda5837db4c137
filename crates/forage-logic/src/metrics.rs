//! Named, recomputable statistics over a trailing ledger window.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::history::{RoundLedger, RoundRecord};
use crate::region::Region;

pub const PAYOFF_SUM: &str = "payoff_sum";
pub const FIGHT_PERCENT: &str = "fight_percent";
pub const OPPONENT_DISTRIBUTION_A: &str = "opponent_region_distribution.a";
pub const OPPONENT_DISTRIBUTION_B: &str = "opponent_region_distribution.b";
pub const OPPONENT_DISTRIBUTION_C: &str = "opponent_region_distribution.c";
pub const MOST_LIKELY_OPPONENT_REGION: &str = "most_likely_opponent_region";

/// Ledger window every default metric trails over.
pub const DEFAULT_METRIC_DEPTH: usize = 1000;

pub fn opponent_distribution_name(region: Region) -> &'static str {
    match region {
        Region::A => OPPONENT_DISTRIBUTION_A,
        Region::B => OPPONENT_DISTRIBUTION_B,
        Region::C => OPPONENT_DISTRIBUTION_C,
    }
}

/// Current value of a metric.
///
/// `Undefined` is the empty-window sentinel: ratio metrics refuse to divide
/// by a zero-size window and report that explicitly instead of producing a
/// NaN or a guessed default. Callers must check it before trusting a ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    Number(f64),
    Choice(Region),
    Undefined,
}

impl MetricValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            MetricValue::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_choice(self) -> Option<Region> {
        match self {
            MetricValue::Choice(region) => Some(region),
            _ => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, MetricValue::Undefined)
    }
}

/// Values of already-recomputed metrics, keyed by registration name.
pub type MetricValues = HashMap<&'static str, MetricValue>;

/// A named statistic recomputed once per round from the ledger.
///
/// Aggregate metrics read the values of earlier metrics through `resolved`
/// instead of holding references to them; `dependencies` declares which
/// names must already be registered.
pub trait Metric {
    /// Trailing window depth this metric reads.
    fn depth(&self) -> usize;

    /// Names that must be registered (and therefore recomputed) before
    /// this metric.
    fn dependencies(&self) -> &'static [&'static str] {
        &[]
    }

    fn compute(&self, window: &[RoundRecord], resolved: &MetricValues) -> MetricValue;
}

/// Name-keyed metric registry, scoped to one match.
///
/// Registration order is recompute order. Registration is idempotent: the
/// first registration for a name wins and later attempts are no-ops.
#[derive(Default)]
pub struct MetricRegistry {
    order: Vec<(&'static str, Box<dyn Metric>)>,
    values: MetricValues,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard metric set, registered in dependency order.
    pub fn with_defaults(depth: usize) -> Self {
        let mut registry = MetricRegistry::new();
        // Registration order satisfies every dependency.
        registry.register_unchecked(PAYOFF_SUM, Box::new(PayoffSum::new(depth)));
        registry.register_unchecked(FIGHT_PERCENT, Box::new(FightPercent::new(depth)));
        for region in Region::ALL {
            registry.register_unchecked(
                opponent_distribution_name(region),
                Box::new(OpponentDistribution::new(region, depth)),
            );
        }
        registry.register_unchecked(
            MOST_LIKELY_OPPONENT_REGION,
            Box::new(LikelyOpponentRegion::new(depth)),
        );
        registry
    }

    /// Registers a metric under `name`.
    ///
    /// Fails with [`AgentError::MissingMetricDependency`] when one of the
    /// metric's declared dependencies has not been registered yet — caught
    /// here, at construction time, not at use time.
    pub fn register(&mut self, name: &'static str, metric: Box<dyn Metric>) -> Result<()> {
        if !self.values.contains_key(name) {
            for dependency in metric.dependencies() {
                if !self.values.contains_key(dependency) {
                    return Err(AgentError::MissingMetricDependency {
                        metric: name,
                        dependency,
                    });
                }
            }
        }
        self.register_unchecked(name, metric);
        Ok(())
    }

    fn register_unchecked(&mut self, name: &'static str, metric: Box<dyn Metric>) {
        if self.values.contains_key(name) {
            return;
        }
        self.values.insert(name, MetricValue::Undefined);
        self.order.push((name, metric));
    }

    /// Recomputes every metric once, in registration order, each over its
    /// own trailing window of the ledger.
    pub fn update_all(&mut self, ledger: &RoundLedger) {
        for (name, metric) in &self.order {
            let window = ledger.window(metric.depth() as i64);
            let value = metric.compute(window, &self.values);
            tracing::trace!(metric = *name, value = ?value, "recomputed");
            self.values.insert(*name, value);
        }
    }

    pub fn value(&self, name: &str) -> Option<MetricValue> {
        self.values.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Sum of own payoffs across the window; 0.0 when the window is empty.
pub struct PayoffSum {
    depth: usize,
}

impl PayoffSum {
    pub fn new(depth: usize) -> Self {
        PayoffSum { depth }
    }
}

impl Metric for PayoffSum {
    fn depth(&self) -> usize {
        self.depth
    }

    fn compute(&self, window: &[RoundRecord], _resolved: &MetricValues) -> MetricValue {
        MetricValue::Number(window.iter().map(RoundRecord::own_payoff).sum())
    }
}

/// Fraction of window rounds that were collisions; undefined when empty.
pub struct FightPercent {
    depth: usize,
}

impl FightPercent {
    pub fn new(depth: usize) -> Self {
        FightPercent { depth }
    }
}

impl Metric for FightPercent {
    fn depth(&self) -> usize {
        self.depth
    }

    fn compute(&self, window: &[RoundRecord], _resolved: &MetricValues) -> MetricValue {
        if window.is_empty() {
            return MetricValue::Undefined;
        }
        let fights = window.iter().filter(|record| record.collision()).count();
        MetricValue::Number(fights as f64 / window.len() as f64)
    }
}

/// Fraction of window rounds in which the opponent picked the target
/// region; undefined when the window is empty.
pub struct OpponentDistribution {
    target: Region,
    depth: usize,
}

impl OpponentDistribution {
    pub fn new(target: Region, depth: usize) -> Self {
        OpponentDistribution { target, depth }
    }
}

impl Metric for OpponentDistribution {
    fn depth(&self) -> usize {
        self.depth
    }

    fn compute(&self, window: &[RoundRecord], _resolved: &MetricValues) -> MetricValue {
        if window.is_empty() {
            return MetricValue::Undefined;
        }
        let picked = window
            .iter()
            .filter(|record| record.opponent_move() == Some(self.target))
            .count();
        MetricValue::Number(picked as f64 / window.len() as f64)
    }
}

/// The opponent's most frequently picked region, derived from the three
/// distribution metrics.
pub struct LikelyOpponentRegion {
    depth: usize,
}

impl LikelyOpponentRegion {
    pub fn new(depth: usize) -> Self {
        LikelyOpponentRegion { depth }
    }
}

impl Metric for LikelyOpponentRegion {
    fn depth(&self) -> usize {
        self.depth
    }

    fn dependencies(&self) -> &'static [&'static str] {
        &[
            OPPONENT_DISTRIBUTION_A,
            OPPONENT_DISTRIBUTION_B,
            OPPONENT_DISTRIBUTION_C,
        ]
    }

    fn compute(&self, _window: &[RoundRecord], resolved: &MetricValues) -> MetricValue {
        let share = |name: &str| resolved.get(name).copied().and_then(MetricValue::as_number);
        let (Some(a), Some(b), Some(c)) = (
            share(OPPONENT_DISTRIBUTION_A),
            share(OPPONENT_DISTRIBUTION_B),
            share(OPPONENT_DISTRIBUTION_C),
        ) else {
            return MetricValue::Undefined;
        };

        // Asymmetric on ties: C wins A==C and B==C, B wins A==B. Callers
        // depend on this exact branch order.
        let region = if a > b {
            if a > c {
                Region::A
            } else {
                Region::C
            }
        } else if b > c {
            Region::B
        } else {
            Region::C
        };
        MetricValue::Choice(region)
    }
}
