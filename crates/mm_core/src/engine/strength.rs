//! Team strength evaluation.
//!
//! Pure functions reducing a roster + tactics into the scalar profile every
//! probabilistic decision consumes. No randomness here.

use crate::engine::constants::strength;
use crate::models::{Mentality, Player, TeamContext};

/// Scalar strength profile on a 0-100 scale per line, plus a fitness
/// multiplier around 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthProfile {
    pub attack: f32,
    pub midfield: f32,
    pub defense: f32,
    pub overall: f32,
    pub fitness_factor: f32,
}

impl StrengthProfile {
    /// Neutral profile used for degenerate rosters; avoids division by zero
    /// in every downstream ratio.
    pub fn neutral() -> Self {
        Self {
            attack: strength::NEUTRAL,
            midfield: strength::NEUTRAL,
            defense: strength::NEUTRAL,
            overall: strength::NEUTRAL,
            fitness_factor: 1.0,
        }
    }
}

fn line_average(players: &[&Player]) -> Option<f32> {
    if players.is_empty() {
        return None;
    }
    let sum: f32 = players.iter().map(|p| p.overall.clamp(1, 99) as f32).sum();
    Some(sum / players.len() as f32)
}

/// Reduce a team context to its strength profile.
///
/// Lines with no players (e.g., a roster without forwards) fall back to the
/// lineup-wide average; an empty lineup yields the neutral profile.
pub fn evaluate_strength(team: &TeamContext) -> StrengthProfile {
    let lineup = team.starting_eleven();
    if lineup.is_empty() {
        return StrengthProfile::neutral();
    }

    let overall = team.average_overall();

    let defenders: Vec<&Player> =
        lineup.iter().filter(|p| p.position.is_defender() || p.position.is_goalkeeper()).collect();
    let midfielders: Vec<&Player> = lineup.iter().filter(|p| p.position.is_midfielder()).collect();
    let forwards: Vec<&Player> = lineup.iter().filter(|p| p.position.is_forward()).collect();

    let mut attack = line_average(&forwards).unwrap_or(overall);
    let mut midfield = line_average(&midfielders).unwrap_or(overall);
    let mut defense = line_average(&defenders).unwrap_or(overall);

    // Tactics: mentality trades attack for defense; pressing lifts the
    // midfield battle; tempo lifts attack.
    match team.tactics.mentality {
        Mentality::Attacking => {
            attack *= strength::ATTACKING_ATTACK;
            defense *= strength::ATTACKING_DEFENSE;
        }
        Mentality::Defensive => {
            attack *= strength::DEFENSIVE_ATTACK;
            defense *= strength::DEFENSIVE_DEFENSE;
        }
        Mentality::Balanced => {}
    }
    midfield += (team.tactics.pressing.min(100) as f32 - 50.0) * strength::PRESSING_MIDFIELD_SCALE;
    attack += (team.tactics.tempo.min(100) as f32 - 50.0) * strength::TEMPO_ATTACK_SCALE;

    let fitness_factor = lineup.iter().map(|p| p.fitness_factor()).sum::<f32>() / lineup.len() as f32;

    StrengthProfile {
        attack: attack.clamp(1.0, 120.0),
        midfield: midfield.clamp(1.0, 120.0),
        defense: defense.clamp(1.0, 120.0),
        overall: overall.clamp(1.0, 99.0),
        fitness_factor,
    }
}
