use super::Player;
use serde::{Deserialize, Serialize};

/// Immutable team snapshot for one simulation run.
///
/// The first eleven roster entries are treated as the starting lineup;
/// anything beyond that is bench material and only participates through
/// substitution events. Lineup changes between matches require a new
/// `TeamContext`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamContext {
    pub team_id: u32,
    pub name: String,
    pub roster: Vec<Player>,
    #[serde(default)]
    pub tactics: Tactics,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mentality {
    Defensive,
    #[default]
    Balanced,
    Attacking,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tactics {
    #[serde(default)]
    pub mentality: Mentality,
    /// Pressing intensity (0-100). Feeds midfield strength.
    #[serde(default = "default_half")]
    pub pressing: u8,
    /// Tempo (0-100). Feeds attack strength.
    #[serde(default = "default_half")]
    pub tempo: u8,
}

fn default_half() -> u8 {
    50
}

impl Default for Tactics {
    fn default() -> Self {
        Self { mentality: Mentality::Balanced, pressing: 50, tempo: 50 }
    }
}

impl TeamContext {
    pub fn new(team_id: u32, name: impl Into<String>, roster: Vec<Player>) -> Self {
        Self { team_id, name: name.into(), roster, tactics: Tactics::default() }
    }

    pub fn with_tactics(mut self, tactics: Tactics) -> Self {
        self.tactics = tactics;
        self
    }

    /// API-boundary validation. The engine itself tolerates degenerate
    /// rosters (empty, no goalkeeper) by clamping and defaulting.
    pub fn validate(&self) -> Result<(), String> {
        if self.roster.len() > 30 {
            return Err(format!(
                "Roster too large: at most 30 players supported, found {}",
                self.roster.len()
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for player in &self.roster {
            if !seen.insert(player.id) {
                return Err(format!("Duplicate player id in roster: {}", player.id));
            }
        }
        Ok(())
    }

    /// Starting lineup: the first eleven roster entries, or the whole roster
    /// when fewer are available.
    pub fn starting_eleven(&self) -> &[Player] {
        let cut = self.roster.len().min(11);
        &self.roster[..cut]
    }

    pub fn goalkeeper(&self) -> Option<&Player> {
        self.starting_eleven().iter().find(|p| p.position.is_goalkeeper())
    }

    pub fn average_overall(&self) -> f32 {
        let lineup = self.starting_eleven();
        if lineup.is_empty() {
            return 0.0;
        }
        let sum: u32 = lineup.iter().map(|p| p.overall as u32).sum();
        sum as f32 / lineup.len() as f32
    }

    pub fn average_morale(&self) -> f32 {
        let lineup = self.starting_eleven();
        if lineup.is_empty() {
            return 50.0;
        }
        let sum: u32 = lineup.iter().map(|p| p.morale.min(100) as u32).sum();
        sum as f32 / lineup.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn roster_of(n: u32) -> Vec<Player> {
        (0..n).map(|i| Player::new(i, format!("P{}", i), Position::CM, 70)).collect()
    }

    #[test]
    fn test_starting_eleven_cut() {
        let team = TeamContext::new(1, "Eighteen", roster_of(18));
        assert_eq!(team.starting_eleven().len(), 11);

        let short = TeamContext::new(2, "Seven", roster_of(7));
        assert_eq!(short.starting_eleven().len(), 7);
    }

    #[test]
    fn test_average_overall_empty_roster() {
        let team = TeamContext::new(1, "Ghosts", Vec::new());
        assert_eq!(team.average_overall(), 0.0);
        assert_eq!(team.average_morale(), 50.0);
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut roster = roster_of(3);
        roster[2].id = 0;
        let team = TeamContext::new(1, "Dupes", roster);
        assert!(team.validate().is_err());
    }

    #[test]
    fn test_goalkeeper_lookup() {
        let mut roster = roster_of(11);
        assert!(TeamContext::new(1, "NoGk", roster.clone()).goalkeeper().is_none());
        roster[0].position = Position::GK;
        let team = TeamContext::new(1, "WithGk", roster);
        assert_eq!(team.goalkeeper().unwrap().id, 0);
    }
}
