//! External decision API for one player seat in one match.

use crate::error::{AgentError, Result};
use crate::history::{RoundLedger, RoundRecord};
use crate::region::Region;
use crate::simulation::GameSimulation;
use crate::strategy::StrategyChain;

/// Identifying string reported to referees. Deployment metadata, not
/// computed by the engine.
pub const IDENTITY: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One player seat: ledger, simulation, metrics and strategy chain wired
/// together and advanced one round per call.
///
/// A seat serves exactly one match. Nothing here is safe to share across
/// concurrently running matches; give each match its own agent.
pub struct ForageAgent {
    ledger: RoundLedger,
    simulation: GameSimulation,
    strategy: StrategyChain,
    seed: Option<u64>,
}

impl ForageAgent {
    pub fn new() -> Self {
        ForageAgent {
            ledger: RoundLedger::new(),
            simulation: GameSimulation::new(),
            strategy: StrategyChain::new(),
            seed: None,
        }
    }

    /// Reproducible variant: the match's RNG is derived from `seed`, and
    /// [`reset`](Self::reset) re-derives it so a reset match replays
    /// identically.
    pub fn seeded(seed: u64) -> Self {
        ForageAgent {
            ledger: RoundLedger::new(),
            simulation: GameSimulation::new(),
            strategy: StrategyChain::seeded(seed),
            seed: Some(seed),
        }
    }

    /// Reinitializes every component to a fresh match state, discarding all
    /// history.
    pub fn reset(&mut self) {
        *self = match self.seed {
            Some(seed) => ForageAgent::seeded(seed),
            None => ForageAgent::new(),
        };
    }

    /// Advances exactly one round.
    ///
    /// `None` signals "no opponent move yet" and is only legal on the first
    /// call of a match; passing `Some` there, or `None` mid-match, fails
    /// with [`AgentError::InvalidState`]. Otherwise the pending round is
    /// completed and settled, the metrics recomputed, and the next move
    /// chosen and committed to the ledger.
    pub fn play(&mut self, opponent_last_move: Option<Region>) -> Result<Region> {
        match opponent_last_move {
            Some(opponent) => {
                let record = self.ledger.record_opponent_move(opponent)?;
                self.simulation.apply_round(record);
            }
            None if !self.ledger.is_empty() => return Err(AgentError::InvalidState),
            None => {}
        }

        let decision = self
            .strategy
            .decide(&self.ledger, &self.simulation, opponent_last_move);
        self.ledger.record_own_move(decision);
        Ok(decision)
    }

    /// Numeric-coded variant of [`play`](Self::play) for referees speaking
    /// region codes: 1↔A, 2↔B, 3↔C. Any other input code means "no
    /// opponent move yet" — referees send a non-region code before round
    /// one. Returns the chosen region's code.
    pub fn play_coded(&mut self, opponent_last_move_code: i32) -> Result<i32> {
        let opponent = Region::from_code(opponent_last_move_code);
        Ok(self.play(opponent)?.code())
    }

    pub fn identity(&self) -> &'static str {
        IDENTITY
    }

    /// Read-only view of the match history.
    pub fn ledger(&self) -> &RoundLedger {
        &self.ledger
    }

    /// Read-only view of the simulated region states.
    pub fn simulation(&self) -> &GameSimulation {
        &self.simulation
    }

    /// Completed rounds as JSON, for external replay and diagnostic
    /// tooling.
    pub fn transcript_json(&self) -> serde_json::Result<String> {
        let completed: Vec<&RoundRecord> = self
            .ledger
            .records()
            .iter()
            .filter(|record| record.is_complete())
            .collect();
        serde_json::to_string(&completed)
    }
}

impl Default for ForageAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_first_play_opens_the_match() {
        let mut agent = ForageAgent::seeded(42);
        let first = agent.play(None).unwrap();

        assert!(Region::ALL.contains(&first));
        assert_eq!(agent.ledger().len(), 1);
        assert!(!agent.ledger().last().unwrap().is_complete());
    }

    #[test]
    fn test_opponent_move_on_fresh_match_is_invalid() {
        let mut agent = ForageAgent::seeded(42);
        assert_eq!(agent.play(Some(Region::A)), Err(AgentError::InvalidState));
    }

    #[test]
    fn test_absent_move_mid_match_is_invalid() {
        let mut agent = ForageAgent::seeded(42);
        agent.play(None).unwrap();
        assert_eq!(agent.play(None), Err(AgentError::InvalidState));
    }

    #[test]
    fn test_round_flow_completes_and_reopens() {
        let mut agent = ForageAgent::seeded(42);
        agent.play(None).unwrap();

        for opponent in [Region::A, Region::B, Region::C, Region::A] {
            agent.play(Some(opponent)).unwrap();
        }

        assert_eq!(agent.ledger().len(), 5);
        // All but the newest record are complete.
        let records = agent.ledger().records();
        assert!(records[..4].iter().all(RoundRecord::is_complete));
        assert!(!records[4].is_complete());
    }

    #[test]
    fn test_coded_api_round_trip() {
        let mut agent = ForageAgent::seeded(42);

        // Referee handshake: a non-region code opens the match.
        let first = agent.play_coded(0).unwrap();
        assert!((1..=3).contains(&first));

        let next = agent.play_coded(2).unwrap();
        assert!((1..=3).contains(&next));
        assert_eq!(
            agent.ledger().records()[0].opponent_move(),
            Some(Region::B)
        );
    }

    #[test]
    fn test_reset_discards_history() {
        let mut agent = ForageAgent::seeded(42);
        agent.play(None).unwrap();
        agent.play(Some(Region::B)).unwrap();
        assert!(agent.ledger().len() > 0);

        agent.reset();
        assert!(agent.ledger().is_empty());
        for state in agent.simulation().states() {
            assert_eq!(state.step(), 1);
        }
    }

    #[test]
    fn test_seeded_agent_replays_identically_after_reset() {
        let mut agent = ForageAgent::seeded(7);
        let script = [Region::A, Region::C, Region::B, Region::C, Region::A];

        let mut first_run = vec![agent.play(None).unwrap()];
        for opponent in script {
            first_run.push(agent.play(Some(opponent)).unwrap());
        }

        agent.reset();
        let mut second_run = vec![agent.play(None).unwrap()];
        for opponent in script {
            second_run.push(agent.play(Some(opponent)).unwrap());
        }

        assert_eq!(first_run, second_run);
    }

    #[test]
    fn test_identity_is_fixed_and_nonempty() {
        let agent = ForageAgent::new();
        assert!(!agent.identity().is_empty());
        assert_eq!(agent.identity(), IDENTITY);
    }

    #[test]
    fn test_transcript_contains_only_completed_rounds() {
        let mut agent = ForageAgent::seeded(42);
        agent.play(None).unwrap();
        agent.play(Some(Region::A)).unwrap();
        agent.play(Some(Region::B)).unwrap();

        let transcript = agent.transcript_json().unwrap();
        let parsed: Value = serde_json::from_str(&transcript).unwrap();
        let rounds = parsed.as_array().unwrap();

        // Three records in the ledger, the newest still pending.
        assert_eq!(agent.ledger().len(), 3);
        assert_eq!(rounds.len(), 2);
        assert_eq!(rounds[0]["round"], 1);
        assert!(rounds[1]["opponent_move"].is_string());
    }

    #[test]
    fn test_long_match_never_panics_and_keeps_invariants() {
        let mut agent = ForageAgent::seeded(1234);
        agent.play(None).unwrap();

        // Scripted opponent cycling through regions, with periodic
        // collisions whenever the cycle lines up with our move.
        let mut cycle = [Region::A, Region::B, Region::C].into_iter().cycle();
        for _ in 0..500 {
            let opponent = cycle.next().unwrap();
            let own = agent.play(Some(opponent)).unwrap();
            assert!(Region::ALL.contains(&own));
        }

        assert_eq!(agent.ledger().len(), 501);
    }
}
