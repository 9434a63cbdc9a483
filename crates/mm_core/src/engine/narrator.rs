//! Event commentary.
//!
//! Presentation-only: maps an event to a descriptive line for the log. Not
//! part of the simulation contract; the engine works the same if every
//! description is replaced.

use crate::models::EventType;

/// One commentary line for an event. `player` is the primary actor when the
/// event has one; `team` is the crediting side's name.
pub fn describe(event_type: EventType, team: &str, player: Option<&str>) -> String {
    let who = player.unwrap_or("the squad");
    match event_type {
        EventType::KickOff => format!("Kick-off! {} get the match underway.", team),
        EventType::Goal => format!("GOAL! {} scores for {}!", who, team),
        EventType::Chance => format!("{} lets fly for {}.", who, team),
        EventType::Save => format!("Great save by {} of {}.", who, team),
        EventType::Assist => format!("{} with the assist for {}.", who, team),
        EventType::Offside => format!("{} ({}) is flagged offside.", who, team),
        EventType::Foul => format!("Foul by {} ({}).", who, team),
        EventType::YellowCard => format!("Yellow card shown to {} ({}).", who, team),
        EventType::RedCard => format!("Red card! {} ({}) is sent off.", who, team),
        EventType::Injury => format!("{} ({}) is down injured.", who, team),
        EventType::Substitution => format!("Substitution for {}: {} comes on.", team, who),
        EventType::Corner => format!("Corner kick for {}.", team),
        EventType::VarCheck => format!("VAR check on the goal by {} ({}).", who, team),
        EventType::VarDecision => format!("VAR decision: goal by {} ({}) stands.", who, team),
        EventType::FullTime => format!("Full time. {} head for the tunnel.", team),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_event_type_has_a_line() {
        for event_type in EventType::iter() {
            let line = describe(event_type, "Test FC", Some("Nine"));
            assert!(!line.is_empty());
        }
    }

    #[test]
    fn test_player_name_is_used_when_given() {
        let line = describe(EventType::Goal, "Test FC", Some("Striker"));
        assert!(line.contains("Striker"));
        assert!(line.contains("Test FC"));
    }

    #[test]
    fn test_missing_player_falls_back() {
        let line = describe(EventType::Corner, "Test FC", None);
        assert!(line.contains("Test FC"));
    }
}
