use serde::{Deserialize, Serialize};

/// One entry of the match event log. Immutable once appended; the log is
/// ordered by `(minute, extra_minute)` with stable insertion order within a
/// minute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvent {
    pub minute: u8,
    /// Stoppage-time offset: events at 90+2 carry `minute = 90,
    /// extra_minute = 2`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub extra_minute: u8,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub team_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<u32>,
    /// Secondary actor: assist target, fouled player, keeper beaten, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_player_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<EventDetails>,
    pub description: String,
}

fn is_zero(v: &u8) -> bool {
    *v == 0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Match start marker at minute 0.
    KickOff,
    Goal,
    /// A shot that did not score (on target, off target or blocked; see
    /// `EventDetails::on_target`).
    Chance,
    Save,
    Assist,
    Offside,
    Foul,
    YellowCard,
    RedCard,
    Injury,
    Substitution,
    Corner,
    /// VAR review opened on an apparent goal.
    VarCheck,
    /// VAR review closed with the goal upheld.
    VarDecision,
    /// Full-time whistle; freezes the log.
    FullTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EventDetails {
    /// For `Chance` events: whether the shot was on target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_target: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury: Option<InjuryDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var_review: Option<VarReviewDetails>,
    /// Set on the red card that completes a second yellow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_yellow: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InjurySeverity {
    Light,
    Moderate,
    Severe,
}

/// Injury payload for external collaborators: the engine never creates a
/// persistent injury record itself, it only emits this data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InjuryDetails {
    pub severity: InjurySeverity,
    pub recovery_days: u16,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VarReviewOutcome {
    Upheld,
    Overturned,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VarReviewDetails {
    pub reviewed_event_type: EventType,
    pub outcome: VarReviewOutcome,
}

impl MatchEvent {
    pub fn new(
        minute: u8,
        extra_minute: u8,
        event_type: EventType,
        team_id: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            minute,
            extra_minute,
            event_type,
            team_id,
            player_id: None,
            target_player_id: None,
            details: None,
            description: description.into(),
        }
    }

    pub fn with_player(mut self, player_id: u32) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn with_target(mut self, target_player_id: u32) -> Self {
        self.target_player_id = Some(target_player_id);
        self
    }

    pub fn with_details(mut self, details: EventDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Sort key preserving insertion order within a minute.
    pub fn time_key(&self) -> (u8, u8) {
        (self.minute, self.extra_minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_event_type_serde_snake_case() {
        let json = serde_json::to_string(&EventType::YellowCard).unwrap();
        assert_eq!(json, "\"yellow_card\"");
        let back: EventType = serde_json::from_str("\"var_check\"").unwrap();
        assert_eq!(back, EventType::VarCheck);
    }

    #[test]
    fn test_every_event_type_round_trips() {
        for event_type in EventType::iter() {
            let json = serde_json::to_string(&event_type).unwrap();
            let back: EventType = serde_json::from_str(&json).unwrap();
            assert_eq!(event_type, back);
        }
    }

    #[test]
    fn test_extra_minute_skipped_when_zero() {
        let event = MatchEvent::new(45, 0, EventType::Foul, 1, "foul");
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("extra_minute"));

        let stoppage = MatchEvent::new(90, 3, EventType::Goal, 1, "late winner");
        let json = serde_json::to_string(&stoppage).unwrap();
        assert!(json.contains("\"extra_minute\":3"));
    }

    #[test]
    fn test_time_key_ordering() {
        let a = MatchEvent::new(90, 0, EventType::Chance, 1, "a");
        let b = MatchEvent::new(90, 2, EventType::Goal, 1, "b");
        assert!(a.time_key() < b.time_key());
    }
}
