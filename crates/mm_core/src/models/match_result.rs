//! Output data structures of the match engine.
//!
//! These are the sink of the simulation pipeline: score from the attack
//! resolver, events from the minute loop, per-player counters accumulated as
//! events are applied, and the aggregate box score. A `MatchReport` is only
//! produced once a session reaches `Finished`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{LiveMatchStats, MatchEvent, Player};
use crate::engine::constants::rating;

/// Per-player box-score counters plus the match rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchStat {
    pub player_id: u32,
    pub name: String,
    pub goals: u8,
    pub assists: u8,
    pub shots_on_target: u8,
    pub shots_off_target: u8,
    pub fouls_committed: u8,
    pub fouls_suffered: u8,
    pub yellow_cards: u8,
    pub red_cards: u8,
    pub saves: u8,
    pub minutes_played: u8,
    /// Running rating during the match; clamped to [1.0, 10.0] at
    /// finalization.
    pub rating: f32,
    pub is_mvp: bool,
}

impl PlayerMatchStat {
    pub fn new(player: &Player) -> Self {
        Self {
            player_id: player.id,
            name: player.name.clone(),
            goals: 0,
            assists: 0,
            shots_on_target: 0,
            shots_off_target: 0,
            fouls_committed: 0,
            fouls_suffered: 0,
            yellow_cards: 0,
            red_cards: 0,
            saves: 0,
            minutes_played: 0,
            rating: rating::BASE,
            is_mvp: false,
        }
    }
}

/// Final output contract: everything a caller needs once the match is over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_id: Uuid,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub home_team_name: String,
    pub away_team_name: String,
    pub score_home: u8,
    pub score_away: u8,
    /// Minute-ordered event log.
    pub events: Vec<MatchEvent>,
    pub player_stats: Vec<PlayerMatchStat>,
    pub statistics: LiveMatchStats,
}

impl MatchReport {
    pub fn winner_team_id(&self) -> Option<u32> {
        match self.score_home.cmp(&self.score_away) {
            std::cmp::Ordering::Greater => Some(self.home_team_id),
            std::cmp::Ordering::Less => Some(self.away_team_id),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.score_home == self.score_away
    }
}
