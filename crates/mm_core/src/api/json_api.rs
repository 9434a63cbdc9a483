//! String-in/string-out JSON boundary for embedding hosts.
//!
//! Requests are versioned with `schema_version`; responses carry the same
//! version back. Errors cross the boundary as plain strings built from
//! `MatchError` so callers never need the crate's error type.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{run_match, MatchPlan, Weather};
use crate::error::MatchError;
use crate::models::{
    LiveMatchStats, MatchEvent, Player, PlayerMatchStat, Position, Tactics, TeamContext,
};
use crate::SCHEMA_VERSION;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub schema_version: u8,
    pub seed: u64,
    pub home_team: TeamData,
    pub away_team: TeamData,
    #[serde(default)]
    pub match_id: Option<Uuid>,
    #[serde(default)]
    pub weather: Option<Weather>,
    /// Home strength multiplier for the possession roll; clamped to
    /// [1.0, 1.5].
    #[serde(default)]
    pub home_advantage: Option<f32>,
    /// Injury recovery-duration scale; clamped to [0.25, 2.0].
    #[serde(default)]
    pub medical_multiplier: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct TeamData {
    pub team_id: u32,
    pub name: String,
    pub players: Vec<PlayerData>,
    #[serde(default)]
    pub tactics: Option<Tactics>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerData {
    /// Optional stable id; falls back to the roster index.
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    pub position: String,
    pub overall: u8,
    #[serde(default)]
    pub fitness: Option<u8>,
    #[serde(default)]
    pub morale: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub schema_version: u8,
    pub match_id: Uuid,
    pub score_home: u8,
    pub score_away: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_team_id: Option<u32>,
    pub events: Vec<MatchEvent>,
    pub player_stats: Vec<PlayerMatchStat>,
    pub statistics: LiveMatchStats,
}

/// Id base for the away side's defaulted player ids. Rosters cap at 30, so
/// index-based defaults from the two teams can never meet.
const AWAY_DEFAULT_ID_BASE: u32 = 1000;

fn convert_player(index: usize, id_base: u32, data: PlayerData) -> crate::error::Result<Player> {
    let position: Position = data
        .position
        .parse()
        .map_err(|_| MatchError::InvalidPosition(data.position.clone()))?;
    let mut player =
        Player::new(data.id.unwrap_or(id_base + index as u32), data.name, position, data.overall);
    if let Some(fitness) = data.fitness {
        player.fitness = fitness.min(100);
    }
    if let Some(morale) = data.morale {
        player.morale = morale.min(100);
    }
    Ok(player)
}

fn convert_team(data: TeamData, default_id_base: u32) -> crate::error::Result<TeamContext> {
    if data.players.len() > 30 {
        return Err(MatchError::InvalidTeamSize { expected: 30, found: data.players.len() });
    }
    let roster = data
        .players
        .into_iter()
        .enumerate()
        .map(|(i, p)| convert_player(i, default_id_base, p))
        .collect::<crate::error::Result<Vec<Player>>>()?;
    let mut team = TeamContext::new(data.team_id, data.name, roster);
    if let Some(tactics) = data.tactics {
        team = team.with_tactics(tactics);
    }
    team.validate().map_err(MatchError::ValidationError)?;
    Ok(team)
}

fn build_plan(request: MatchRequest) -> crate::error::Result<MatchPlan> {
    if request.schema_version != SCHEMA_VERSION {
        return Err(MatchError::UnsupportedSchemaVersion(request.schema_version));
    }
    let home = convert_team(request.home_team, 0)?;
    let away = convert_team(request.away_team, AWAY_DEFAULT_ID_BASE)?;
    if home.team_id == away.team_id {
        return Err(MatchError::ValidationError(format!(
            "Home and away team share id {}",
            home.team_id
        )));
    }
    // Player stats are keyed by player id across both teams.
    let home_ids: HashSet<u32> = home.roster.iter().map(|p| p.id).collect();
    if let Some(dup) = away.roster.iter().find(|p| home_ids.contains(&p.id)) {
        return Err(MatchError::ValidationError(format!(
            "Player id {} appears in both teams",
            dup.id
        )));
    }
    let mut plan = MatchPlan::new(home, away, request.seed);
    if let Some(match_id) = request.match_id {
        plan = plan.with_match_id(match_id);
    }
    if let Some(weather) = request.weather {
        plan = plan.with_weather(weather);
    }
    if let Some(home_advantage) = request.home_advantage {
        plan = plan.with_home_advantage(home_advantage);
    }
    if let Some(medical_multiplier) = request.medical_multiplier {
        plan = plan.with_medical_multiplier(medical_multiplier);
    }
    Ok(plan)
}

/// Simulate one full match from a `MatchRequest` JSON payload.
pub fn simulate_match_json(request_json: &str) -> Result<String, String> {
    let request: MatchRequest =
        serde_json::from_str(request_json).map_err(|e| MatchError::from(e).to_string())?;

    let plan = build_plan(request).map_err(|e| e.to_string())?;

    let report = run_match(plan).map_err(|e| e.to_string())?;

    let response = MatchResponse {
        schema_version: SCHEMA_VERSION,
        match_id: report.match_id,
        score_home: report.score_home,
        score_away: report.score_away,
        winner_team_id: report.winner_team_id(),
        events: report.events,
        player_stats: report.player_stats,
        statistics: report.statistics,
    };
    serde_json::to_string(&response).map_err(|e| MatchError::from(e).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use serde_json::json;

    fn request_json(seed: u64) -> String {
        let players = |base: u32| {
            let positions =
                ["GK", "LB", "CB", "CB", "RB", "LM", "CM", "CM", "RM", "ST", "ST"];
            positions
                .iter()
                .enumerate()
                .map(|(i, pos)| {
                    json!({
                        "id": base + i as u32,
                        "name": format!("P{}", base + i as u32),
                        "position": pos,
                        "overall": 70
                    })
                })
                .collect::<Vec<_>>()
        };
        json!({
            "schema_version": 1,
            "seed": seed,
            "home_team": {"team_id": 1, "name": "Home FC", "players": players(0)},
            "away_team": {"team_id": 2, "name": "Away United", "players": players(100)}
        })
        .to_string()
    }

    #[test]
    fn test_simulate_match_json_round_trip() {
        let response_json = simulate_match_json(&request_json(42)).unwrap();
        let response: MatchResponse = serde_json::from_str(&response_json).unwrap();
        assert_eq!(response.schema_version, 1);
        assert_eq!(response.events.first().unwrap().event_type, EventType::KickOff);
        assert_eq!(response.events.last().unwrap().event_type, EventType::FullTime);
        let home_goals = response
            .events
            .iter()
            .filter(|e| e.event_type == EventType::Goal && e.team_id == 1)
            .count() as u8;
        assert_eq!(response.score_home, home_goals);
    }

    #[test]
    fn test_same_seed_same_response() {
        let a = simulate_match_json(&request_json(7)).unwrap();
        let b = simulate_match_json(&request_json(7)).unwrap();
        // match_id is random unless pinned, so compare scores and events.
        let a: MatchResponse = serde_json::from_str(&a).unwrap();
        let b: MatchResponse = serde_json::from_str(&b).unwrap();
        assert_eq!(a.score_home, b.score_home);
        assert_eq!(a.score_away, b.score_away);
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = simulate_match_json("{not json").unwrap_err();
        assert!(err.contains("error"), "{}", err);
    }

    #[test]
    fn test_wrong_schema_version_rejected() {
        let mut request: serde_json::Value =
            serde_json::from_str(&request_json(1)).unwrap();
        request["schema_version"] = json!(9);
        let err = simulate_match_json(&request.to_string()).unwrap_err();
        assert!(err.contains("schema version"), "{}", err);
    }

    #[test]
    fn test_unknown_position_rejected() {
        let mut request: serde_json::Value =
            serde_json::from_str(&request_json(1)).unwrap();
        request["home_team"]["players"][0]["position"] = json!("QB");
        let err = simulate_match_json(&request.to_string()).unwrap_err();
        assert!(err.contains("position"), "{}", err);
    }

    #[test]
    fn test_duplicate_team_ids_rejected() {
        let mut request: serde_json::Value =
            serde_json::from_str(&request_json(1)).unwrap();
        request["away_team"]["team_id"] = json!(1);
        let err = simulate_match_json(&request.to_string()).unwrap_err();
        assert!(err.contains("share id"), "{}", err);
    }

    #[test]
    fn test_player_ids_default_to_index() {
        let request = json!({
            "schema_version": 1,
            "seed": 1,
            "home_team": {
                "team_id": 1,
                "name": "Anon FC",
                "players": [
                    {"name": "A", "position": "GK", "overall": 70},
                    {"name": "B", "position": "ST", "overall": 70}
                ]
            },
            "away_team": {"team_id": 2, "name": "Other", "players": []}
        });
        let response_json = simulate_match_json(&request.to_string()).unwrap();
        let response: MatchResponse = serde_json::from_str(&response_json).unwrap();
        let ids: Vec<u32> = response.player_stats.iter().map(|s| s.player_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_anonymous_full_squads_keep_distinct_stats() {
        let positions = ["GK", "LB", "CB", "CB", "RB", "LM", "CM", "CM", "RM", "ST", "ST"];
        let anonymous = |prefix: &str| {
            positions
                .iter()
                .enumerate()
                .map(|(i, pos)| {
                    json!({"name": format!("{}{}", prefix, i), "position": pos, "overall": 70})
                })
                .collect::<Vec<_>>()
        };
        let request = json!({
            "schema_version": 1,
            "seed": 3,
            "home_team": {"team_id": 1, "name": "Home FC", "players": anonymous("H")},
            "away_team": {"team_id": 2, "name": "Away United", "players": anonymous("A")}
        });
        let response_json = simulate_match_json(&request.to_string()).unwrap();
        let response: MatchResponse = serde_json::from_str(&response_json).unwrap();
        // Defaulted ids must not collide across teams: every starter keeps
        // an own stat line.
        assert_eq!(response.player_stats.len(), 22);
        let mut ids: Vec<u32> = response.player_stats.iter().map(|s| s.player_id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 22);
    }

    #[test]
    fn test_cross_team_duplicate_player_id_rejected() {
        let mut request: serde_json::Value =
            serde_json::from_str(&request_json(1)).unwrap();
        request["away_team"]["players"][0]["id"] = json!(0);
        let err = simulate_match_json(&request.to_string()).unwrap_err();
        assert!(err.contains("both teams"), "{}", err);
    }

    #[test]
    fn test_plan_overrides_accepted() {
        let mut request: serde_json::Value =
            serde_json::from_str(&request_json(5)).unwrap();
        request["home_advantage"] = json!(1.3);
        request["medical_multiplier"] = json!(0.5);
        request["weather"] = json!("rain");
        let response_json = simulate_match_json(&request.to_string()).unwrap();
        let response: MatchResponse = serde_json::from_str(&response_json).unwrap();
        assert_eq!(response.schema_version, 1);
        assert_eq!(
            response.events.last().unwrap().event_type,
            crate::models::EventType::FullTime
        );
    }
}
