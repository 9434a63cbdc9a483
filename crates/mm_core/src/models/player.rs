use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::engine::rng::RandomSource;

/// Player data for the minute-based match simulation engine.
///
/// A `Player` is an immutable snapshot for the duration of one match: fitness
/// and morale are read at kickoff and never written back. Rebuilding the
/// roster between matches is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub overall: u8,

    /// Match-day fitness (0-100). Degrades attack/defense contribution.
    #[serde(default = "default_fitness")]
    pub fitness: u8,

    /// Morale (0-100). Feeds the possession power bonus.
    #[serde(default = "default_morale")]
    pub morale: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<PlayerAttributes>,
}

fn default_fitness() -> u8 {
    100
}

fn default_morale() -> u8 {
    70
}

/// Attribute sheet behind `overall`. All values are 1-99; when absent, the
/// engine falls back to `overall` for every attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlayerAttributes {
    pub technical: u8,
    pub physical: u8,
    pub mental: u8,
    pub shooting: u8,
    pub finishing: u8,
    pub goalkeeping: u8,
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self {
            technical: 50,
            physical: 50,
            mental: 50,
            shooting: 50,
            finishing: 50,
            goalkeeping: 50,
        }
    }
}

impl PlayerAttributes {
    /// Uniform attribute sheet at a single level, clamped to 1-99.
    pub fn flat(level: u8) -> Self {
        let v = level.clamp(1, 99);
        Self {
            technical: v,
            physical: v,
            mental: v,
            shooting: v,
            finishing: v,
            goalkeeping: v,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    GK,
    LB,
    CB,
    RB,
    LWB,
    RWB,
    CDM,
    CM,
    CAM,
    LM,
    RM,
    LW,
    RW,
    CF,
    ST,
    // Generic positions
    DF,
    MF,
    FW,
}

impl Position {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::GK)
    }

    pub fn is_defender(&self) -> bool {
        matches!(
            self,
            Position::LB
                | Position::CB
                | Position::RB
                | Position::LWB
                | Position::RWB
                | Position::DF
        )
    }

    pub fn is_midfielder(&self) -> bool {
        matches!(
            self,
            Position::CDM
                | Position::CM
                | Position::CAM
                | Position::LM
                | Position::RM
                | Position::MF
        )
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Position::LW | Position::RW | Position::CF | Position::ST | Position::FW)
    }

    pub fn is_outfield(&self) -> bool {
        !self.is_goalkeeper()
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GK" => Ok(Position::GK),
            "LB" => Ok(Position::LB),
            "CB" => Ok(Position::CB),
            "RB" => Ok(Position::RB),
            "LWB" => Ok(Position::LWB),
            "RWB" => Ok(Position::RWB),
            "CDM" => Ok(Position::CDM),
            "CM" => Ok(Position::CM),
            "CAM" => Ok(Position::CAM),
            "LM" => Ok(Position::LM),
            "RM" => Ok(Position::RM),
            "LW" => Ok(Position::LW),
            "RW" => Ok(Position::RW),
            "CF" => Ok(Position::CF),
            "ST" => Ok(Position::ST),
            "DF" => Ok(Position::DF),
            "MF" => Ok(Position::MF),
            "FW" => Ok(Position::FW),
            other => Err(format!("Unknown position: {}", other)),
        }
    }
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, position: Position, overall: u8) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            overall: overall.clamp(1, 99),
            fitness: default_fitness(),
            morale: default_morale(),
            attributes: None,
        }
    }

    /// Attribute lookup with `overall` fallback, clamped to 1-99.
    fn attribute(&self, pick: impl Fn(&PlayerAttributes) -> u8) -> f32 {
        let raw = self.attributes.as_ref().map(|a| pick(a)).unwrap_or(self.overall);
        raw.clamp(1, 99) as f32
    }

    /// Shot quality in 0-100: weighted shooting/finishing/overall mix.
    pub fn shot_quality(&self) -> f32 {
        let shooting = self.attribute(|a| a.shooting);
        let finishing = self.attribute(|a| a.finishing);
        let overall = self.overall.clamp(1, 99) as f32;
        (shooting * 0.4 + finishing * 0.35 + overall * 0.25).clamp(1.0, 100.0)
    }

    /// Shot-stopping quality in 0-100.
    pub fn keeper_quality(&self) -> f32 {
        let goalkeeping = self.attribute(|a| a.goalkeeping);
        let mental = self.attribute(|a| a.mental);
        let overall = self.overall.clamp(1, 99) as f32;
        (goalkeeping * 0.6 + overall * 0.3 + mental * 0.1).clamp(1.0, 100.0)
    }

    /// Fitness as a multiplicative factor around 1.0.
    pub fn fitness_factor(&self) -> f32 {
        let fitness = self.fitness.min(100) as f32;
        (0.70 + fitness / 100.0 * 0.35).clamp(0.70, 1.05)
    }

    /// Generate a squad-filler player with normally distributed overall.
    /// Used by benchmark fixtures; not part of the match contract.
    pub fn generate(rng: &mut RandomSource, id: u32, position: Position, mean_overall: f32) -> Self {
        let overall = rng.normal(mean_overall as f64, 6.0).round().clamp(30.0, 99.0) as u8;
        let mut player = Player::new(id, format!("Player {}", id), position, overall);
        let jitter = rng.range(-5i16..=5);
        let level = (overall as i16 + jitter).clamp(1, 99) as u8;
        player.attributes = Some(PlayerAttributes::flat(level));
        player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_predicates() {
        assert!(Position::GK.is_goalkeeper());
        assert!(Position::CB.is_defender());
        assert!(Position::CM.is_midfielder());
        assert!(Position::ST.is_forward());
        assert!(Position::ST.is_outfield());
        assert!(!Position::GK.is_outfield());
    }

    #[test]
    fn test_position_from_str() {
        assert_eq!("st".parse::<Position>().unwrap(), Position::ST);
        assert_eq!("GK".parse::<Position>().unwrap(), Position::GK);
        assert!("XX".parse::<Position>().is_err());
    }

    #[test]
    fn test_attribute_fallback_to_overall() {
        let player = Player::new(1, "No Sheet", Position::ST, 80);
        // Without an attribute sheet every component falls back to overall.
        assert!((player.shot_quality() - 80.0).abs() < 0.01);
        assert!((player.keeper_quality() - 80.0).abs() < 0.01);
    }

    #[test]
    fn test_fitness_factor_bounds() {
        let mut player = Player::new(1, "Tired", Position::CM, 70);
        player.fitness = 0;
        assert!((player.fitness_factor() - 0.70).abs() < 0.001);
        player.fitness = 100;
        assert!((player.fitness_factor() - 1.05).abs() < 0.001);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut player = Player::new(7, "Seven", Position::RW, 88);
        player.attributes = Some(PlayerAttributes::flat(85));
        let json = serde_json::to_string(&player).unwrap();
        let back: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(player, back);
    }
}
