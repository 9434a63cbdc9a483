//! Discipline and medical incident generation.
//!
//! Rolled once per simulated minute, independently of the attack phase.
//! The generator only decides *what* happened and to *whom*; the session
//! translates the incident into events, card bookkeeping and stats.

use crate::engine::constants::{incident, injury};
use crate::engine::rng::RandomSource;
use crate::models::{InjuryDetails, InjurySeverity, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentKind {
    Foul,
    YellowCard,
    RedCard,
    Injury,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incident {
    pub kind: IncidentKind,
    pub player_id: u32,
    /// Present only for `IncidentKind::Injury`.
    pub injury: Option<InjuryDetails>,
}

#[derive(Debug, Clone)]
pub struct EventGenerator {
    /// Per-minute gate probability.
    pub incident_probability: f64,
    /// Recovery-duration scale supplied by the caller's medical facilities.
    /// Values below 1.0 shorten recovery; clamped to [0.25, 2.0].
    pub medical_multiplier: f32,
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl EventGenerator {
    pub fn new() -> Self {
        Self {
            incident_probability: incident::MINUTE_INCIDENT_PROB,
            medical_multiplier: 1.0,
        }
    }

    pub fn with_medical_multiplier(mut self, multiplier: f32) -> Self {
        self.medical_multiplier = multiplier.clamp(0.25, 2.0);
        self
    }

    /// Roll the per-minute incident gate; on success, draw the incident kind
    /// and a uniformly chosen affected player. `None` when the gate fails or
    /// no player is available.
    pub fn roll(&self, rng: &mut RandomSource, players: &[&Player]) -> Option<Incident> {
        if !rng.chance(self.incident_probability) {
            return None;
        }
        let player = rng.pick(players)?;

        let table = [
            (IncidentKind::Foul, incident::FOUL_WEIGHT),
            (IncidentKind::YellowCard, incident::YELLOW_WEIGHT),
            (IncidentKind::Injury, incident::INJURY_WEIGHT),
            (IncidentKind::RedCard, incident::RED_WEIGHT),
        ];
        let kind = rng.pick_weighted(&table, |(_, w)| *w).map(|(k, _)| *k)?;

        let injury = if kind == IncidentKind::Injury {
            Some(self.roll_injury(rng))
        } else {
            None
        };

        Some(Incident { kind, player_id: player.id, injury })
    }

    /// Severity roll mapping uniform ranges to severity tiers, each with its
    /// own recovery-duration range scaled by the medical multiplier.
    fn roll_injury(&self, rng: &mut RandomSource) -> InjuryDetails {
        let roll = rng.uniform();
        let (severity, (min_days, max_days)) = if roll < injury::LIGHT_THRESHOLD {
            (InjurySeverity::Light, injury::LIGHT_DAYS)
        } else if roll < injury::MODERATE_THRESHOLD {
            (InjurySeverity::Moderate, injury::MODERATE_DAYS)
        } else {
            (InjurySeverity::Severe, injury::SEVERE_DAYS)
        };
        let days = rng.range(min_days..=max_days);
        let scaled = (days as f32 * self.medical_multiplier).round().max(1.0) as u16;
        InjuryDetails { severity, recovery_days: scaled }
    }
}
