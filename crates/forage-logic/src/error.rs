//! Contract-violation taxonomy.

use thiserror::Error;

/// Failures surfaced by the decision engine.
///
/// Every variant is a local, fail-fast contract violation: the engine does
/// no I/O and has no external call surface, so nothing here is transient or
/// retriable. The referee decides whether to abort the match or substitute
/// a default move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// A round was completed (or skipped) with no pending own-move record.
    #[error("no pending round to complete")]
    InvalidState,

    /// Numeric region code outside 1..=3.
    #[error("invalid region code {0}, expected 1..=3")]
    InvalidRegionCode(i32),

    /// An aggregate metric was registered before the base metrics it reads.
    #[error("metric `{metric}` depends on `{dependency}`, which is not registered")]
    MissingMetricDependency {
        metric: &'static str,
        dependency: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, AgentError>;
