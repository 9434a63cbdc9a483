use serde::{Deserialize, Serialize};

/// Aggregated box-score statistics for a match, per side.
///
/// All event-derived counters can be recomputed from any prefix of the event
/// log via `engine::stats::compute_stats`. Possession is the one field the
/// log does not carry; it is tracked by the session and defaults to 50/50
/// when aggregating a bare log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveMatchStats {
    pub goals_home: u8,
    pub goals_away: u8,
    pub possession_home: f32,
    pub possession_away: f32,
    pub shots_home: u16,
    pub shots_away: u16,
    pub shots_on_target_home: u16,
    pub shots_on_target_away: u16,
    pub fouls_home: u8,
    pub fouls_away: u8,
    pub yellow_cards_home: u8,
    pub yellow_cards_away: u8,
    pub red_cards_home: u8,
    pub red_cards_away: u8,
    pub corners_home: u8,
    pub corners_away: u8,
    pub offsides_home: u8,
    pub offsides_away: u8,
}

impl Default for LiveMatchStats {
    fn default() -> Self {
        Self {
            goals_home: 0,
            goals_away: 0,
            possession_home: 50.0,
            possession_away: 50.0,
            shots_home: 0,
            shots_away: 0,
            shots_on_target_home: 0,
            shots_on_target_away: 0,
            fouls_home: 0,
            fouls_away: 0,
            yellow_cards_home: 0,
            yellow_cards_away: 0,
            red_cards_home: 0,
            red_cards_away: 0,
            corners_home: 0,
            corners_away: 0,
            offsides_home: 0,
            offsides_away: 0,
        }
    }
}

impl LiveMatchStats {
    pub fn total_goals(&self) -> u8 {
        self.goals_home + self.goals_away
    }

    pub fn total_shots(&self) -> u16 {
        self.shots_home + self.shots_away
    }
}
