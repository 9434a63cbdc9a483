//! The simulation engine: deterministic, minute-based, event-sourced.
//!
//! Entry points are `MatchEngine` for stepwise control (start, pause,
//! per-minute stepping) and `run_match` / `simulate_batch` for
//! run-to-completion use. All randomness flows through `RandomSource`, so a
//! `(inputs, seed)` pair fully determines the output.

pub mod attack;
pub mod constants;
pub mod events;
pub mod narrator;
pub mod rng;
pub mod session;
pub mod stats;
pub mod strength;

pub use attack::{AttackContext, AttackOutcome, AttackResolver};
pub use events::{EventGenerator, Incident, IncidentKind};
pub use rng::RandomSource;
pub use session::{
    run_match, MatchEngine, MatchPlan, MatchSession, MatchState, MinuteOutcome, Score,
    StateConflict, TeamSide, Weather,
};
pub use stats::{compute_stats, finalize_ratings};
pub use strength::{evaluate_strength, StrengthProfile};

use rayon::prelude::*;

use crate::models::MatchReport;

/// Simulate a set of independent fixtures in parallel.
///
/// Each plan carries its own seed, so results are identical to running the
/// plans sequentially and independent of worker scheduling.
pub fn simulate_batch(plans: Vec<MatchPlan>) -> Vec<Result<MatchReport, StateConflict>> {
    plans.into_par_iter().map(run_match).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, Position, TeamContext};

    fn squad(base_id: u32, overall: u8) -> Vec<Player> {
        let positions = [
            Position::GK,
            Position::LB,
            Position::CB,
            Position::CB,
            Position::RB,
            Position::LM,
            Position::CM,
            Position::CM,
            Position::RM,
            Position::ST,
            Position::ST,
        ];
        positions
            .iter()
            .enumerate()
            .map(|(i, pos)| {
                Player::new(base_id + i as u32, format!("P{}", base_id + i as u32), *pos, overall)
            })
            .collect()
    }

    fn plan(seed: u64) -> MatchPlan {
        let home = TeamContext::new(1, "Home FC", squad(0, 70));
        let away = TeamContext::new(2, "Away United", squad(100, 70));
        MatchPlan::new(home, away, seed)
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let batch = simulate_batch((0..8).map(plan).collect());
        for (seed, result) in batch.into_iter().enumerate() {
            let parallel = result.unwrap();
            let sequential = run_match(plan(seed as u64)).unwrap();
            assert_eq!(parallel.score_home, sequential.score_home);
            assert_eq!(parallel.score_away, sequential.score_away);
            assert_eq!(parallel.events, sequential.events);
        }
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let plans: Vec<MatchPlan> = (0..4)
            .map(|i| plan(i).with_match_id(uuid::Uuid::from_u128(i as u128)))
            .collect();
        let batch = simulate_batch(plans);
        for (i, result) in batch.into_iter().enumerate() {
            assert_eq!(result.unwrap().match_id, uuid::Uuid::from_u128(i as u128));
        }
    }
}
