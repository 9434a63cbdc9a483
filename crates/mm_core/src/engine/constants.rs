//! Tuning constants for the minute-based simulation.
//!
//! Every probabilistic decision in the engine reads from here; the values
//! are calibrated so that an even 70-vs-70 fixture averages roughly 2 to 3
//! total goals per match.

/// Match clock.
pub mod clock {
    pub const REGULATION_MINUTES: u8 = 90;
    /// Stoppage time drawn once per session at kickoff.
    pub const STOPPAGE_MIN: u8 = 1;
    pub const STOPPAGE_MAX: u8 = 5;
}

/// Possession roll (home share of a minute).
pub mod possession {
    /// Multiplier on home overall strength.
    pub const HOME_ADVANTAGE: f32 = 1.08;
    /// Additive power bonus per morale point above 50.
    pub const MORALE_BONUS_SCALE: f32 = 0.10;
    /// Additive percentage-point bias per momentum point above 50.
    pub const MOMENTUM_BIAS: f32 = 0.10;
}

/// Attack phase.
pub mod attack {
    /// Chance that the minute contains an attacking possession.
    pub const MINUTE_ATTACK_PROB: f64 = 0.34;
    /// Chance that a possession produces a shot at all.
    pub const SHOT_GATE_PROB: f64 = 0.65;
    /// Base on-target accuracy before quality/weather scaling.
    pub const BASE_ACCURACY: f64 = 0.58;
    /// Shooter selection weights by position group.
    pub const SHOOTER_WEIGHT_FORWARD: f64 = 6.0;
    pub const SHOOTER_WEIGHT_MIDFIELDER: f64 = 3.0;
    pub const SHOOTER_WEIGHT_OUTFIELD: f64 = 1.0;
    /// Independent offside check before final shot resolution.
    pub const OFFSIDE_PROB: f64 = 0.06;
    /// Attack power bonus scale from shooter quality: 1.0 + quality / SCALE.
    pub const SHOOTER_BONUS_SCALE: f32 = 250.0;
    /// Keeper save roll: base + quality/100 * scale.
    pub const SAVE_BASE: f64 = 0.22;
    pub const SAVE_KEEPER_SCALE: f64 = 0.40;
    /// Save-roll penalty when an outfield fallback replaces a missing GK.
    pub const FALLBACK_KEEPER_PENALTY: f64 = 0.12;
    /// Assist attribution on confirmed goals.
    pub const ASSIST_PROB: f64 = 0.65;
    pub const ASSIST_WEIGHT_MIDFIELDER: f64 = 3.0;
    pub const ASSIST_WEIGHT_OUTFIELD: f64 = 1.0;
    /// Chance a blocked/saved shot wins a corner.
    pub const CORNER_AWARD_PROB: f64 = 0.30;
}

/// Corner-kick sub-path: fixed outcome distribution when a pending corner
/// is delivered.
pub mod corner {
    pub const GOAL_WEIGHT: f64 = 8.0;
    pub const SAVE_WEIGHT: f64 = 22.0;
    pub const BLOCKED_WEIGHT: f64 = 30.0;
    pub const MISS_WEIGHT: f64 = 40.0;
}

/// VAR review on apparent goals.
pub mod var {
    pub const REVIEW_PROB: f64 = 0.12;
    pub const OVERTURN_PROB: f64 = 0.25;
}

/// Discipline/medical incidents, independent of the attack phase.
pub mod incident {
    pub const MINUTE_INCIDENT_PROB: f64 = 0.10;
    /// Categorical weights: foul most likely, red least.
    pub const FOUL_WEIGHT: f64 = 62.0;
    pub const YELLOW_WEIGHT: f64 = 24.0;
    pub const INJURY_WEIGHT: f64 = 10.0;
    pub const RED_WEIGHT: f64 = 4.0;
}

/// Injury severity roll and recovery-duration ranges (days).
pub mod injury {
    pub const LIGHT_THRESHOLD: f64 = 0.60;
    pub const MODERATE_THRESHOLD: f64 = 0.90;
    pub const LIGHT_DAYS: (u16, u16) = (3, 10);
    pub const MODERATE_DAYS: (u16, u16) = (14, 35);
    pub const SEVERE_DAYS: (u16, u16) = (60, 150);
}

/// Momentum scalar (0-100, above 50 favors home).
pub mod momentum {
    pub const NEUTRAL: f32 = 50.0;
    /// Damping on the per-minute midfield differential.
    pub const DAMPING: f32 = 0.35;
    /// Hard-set values after a confirmed goal.
    pub const POST_GOAL_SCORER: f32 = 70.0;
    pub const POST_GOAL_CONCEDER: f32 = 30.0;
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;
}

/// Strength evaluation.
pub mod strength {
    /// Neutral profile for degenerate (empty) rosters.
    pub const NEUTRAL: f32 = 50.0;
    /// Mentality multipliers (attack, defense).
    pub const ATTACKING_ATTACK: f32 = 1.08;
    pub const ATTACKING_DEFENSE: f32 = 0.94;
    pub const DEFENSIVE_ATTACK: f32 = 0.94;
    pub const DEFENSIVE_DEFENSE: f32 = 1.08;
    /// Midfield bonus per pressing point above 50.
    pub const PRESSING_MIDFIELD_SCALE: f32 = 0.06;
    /// Attack bonus per tempo point above 50.
    pub const TEMPO_ATTACK_SCALE: f32 = 0.04;
}

/// Running-rating deltas and finalization.
pub mod rating {
    pub const BASE: f32 = 6.0;
    pub const GOAL: f32 = 1.0;
    pub const ASSIST: f32 = 0.5;
    pub const SHOT_ON_TARGET: f32 = 0.15;
    pub const SHOT_OFF_TARGET: f32 = -0.05;
    pub const SAVE: f32 = 0.3;
    pub const FOUL: f32 = -0.1;
    pub const FOUL_SUFFERED: f32 = 0.05;
    pub const YELLOW_CARD: f32 = -0.3;
    pub const RED_CARD: f32 = -1.0;
    pub const OFFSIDE: f32 = -0.05;
    /// Finalization noise: normal(0, STD) clamped to +/- BOUND.
    pub const NOISE_STD: f64 = 0.35;
    pub const NOISE_BOUND: f64 = 0.75;
    pub const MIN: f32 = 1.0;
    pub const MAX: f32 = 10.0;
}
