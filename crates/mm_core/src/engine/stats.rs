//! Statistics aggregation over the event log.
//!
//! `compute_stats` is a pure fold: it can be called against any prefix of
//! the log, repeatedly, without touching the session — this is what makes
//! replay scrubbing safe. Rating finalization is the one place randomness
//! touches statistics, and it happens exactly once at full time.

use std::collections::BTreeMap;

use crate::engine::constants::rating;
use crate::engine::rng::RandomSource;
use crate::models::{EventType, LiveMatchStats, MatchEvent, PlayerMatchStat};

/// Fold an event-log prefix into the aggregate box score.
///
/// Idempotent and side-effect-free. Possession is not derivable from the
/// log and stays at the 50/50 default; the session overrides it from its
/// own possession counters when it builds the final report.
pub fn compute_stats(events: &[MatchEvent], home_id: u32, away_id: u32) -> LiveMatchStats {
    let mut stats = LiveMatchStats::default();

    for event in events {
        let is_home = event.team_id == home_id;
        if !is_home && event.team_id != away_id {
            continue;
        }
        match event.event_type {
            EventType::Goal => {
                bump_u8(&mut stats.goals_home, &mut stats.goals_away, is_home);
                bump_u16(&mut stats.shots_home, &mut stats.shots_away, is_home);
                bump_u16(
                    &mut stats.shots_on_target_home,
                    &mut stats.shots_on_target_away,
                    is_home,
                );
            }
            EventType::Chance => {
                bump_u16(&mut stats.shots_home, &mut stats.shots_away, is_home);
                let on_target = event
                    .details
                    .as_ref()
                    .and_then(|d| d.on_target)
                    .unwrap_or(false);
                if on_target {
                    bump_u16(
                        &mut stats.shots_on_target_home,
                        &mut stats.shots_on_target_away,
                        is_home,
                    );
                }
            }
            EventType::Foul => bump_u8(&mut stats.fouls_home, &mut stats.fouls_away, is_home),
            EventType::YellowCard => {
                bump_u8(&mut stats.yellow_cards_home, &mut stats.yellow_cards_away, is_home)
            }
            EventType::RedCard => {
                bump_u8(&mut stats.red_cards_home, &mut stats.red_cards_away, is_home)
            }
            EventType::Corner => {
                bump_u8(&mut stats.corners_home, &mut stats.corners_away, is_home)
            }
            EventType::Offside => {
                bump_u8(&mut stats.offsides_home, &mut stats.offsides_away, is_home)
            }
            _ => {}
        }
    }

    stats
}

fn bump_u8(home: &mut u8, away: &mut u8, is_home: bool) {
    if is_home {
        *home = home.saturating_add(1);
    } else {
        *away = away.saturating_add(1);
    }
}

fn bump_u16(home: &mut u16, away: &mut u16, is_home: bool) {
    if is_home {
        *home = home.saturating_add(1);
    } else {
        *away = away.saturating_add(1);
    }
}

/// Apply the one-time finalization pass: bounded normal perturbation on the
/// running rating, clamp to the legal range, and flag the single MVP.
///
/// The MVP is the highest-rated player with any minutes; ties break on
/// roster-map order (ascending player id), which keeps the result stable
/// across identical runs.
pub fn finalize_ratings(
    player_stats: &mut BTreeMap<u32, PlayerMatchStat>,
    rng: &mut RandomSource,
) {
    for stat in player_stats.values_mut() {
        let noise = rng
            .normal(0.0, rating::NOISE_STD)
            .clamp(-rating::NOISE_BOUND, rating::NOISE_BOUND);
        stat.rating = (stat.rating + noise as f32).clamp(rating::MIN, rating::MAX);
        stat.is_mvp = false;
    }

    let mvp = player_stats
        .values()
        .filter(|s| s.minutes_played > 0)
        .fold(None::<(u32, f32)>, |best, stat| match best {
            Some((_, rating)) if stat.rating <= rating => best,
            _ => Some((stat.player_id, stat.rating)),
        });
    if let Some((mvp_id, _)) = mvp {
        if let Some(stat) = player_stats.get_mut(&mvp_id) {
            stat.is_mvp = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventDetails, Player, Position};
    use proptest::prelude::*;

    const HOME: u32 = 1;
    const AWAY: u32 = 2;

    fn event(minute: u8, event_type: EventType, team_id: u32) -> MatchEvent {
        MatchEvent::new(minute, 0, event_type, team_id, "test")
    }

    fn chance(minute: u8, team_id: u32, on_target: bool) -> MatchEvent {
        event(minute, EventType::Chance, team_id).with_details(EventDetails {
            on_target: Some(on_target),
            ..EventDetails::default()
        })
    }

    #[test]
    fn test_goal_counts_as_shot_on_target() {
        let log = vec![event(10, EventType::Goal, HOME)];
        let stats = compute_stats(&log, HOME, AWAY);
        assert_eq!(stats.goals_home, 1);
        assert_eq!(stats.shots_home, 1);
        assert_eq!(stats.shots_on_target_home, 1);
        assert_eq!(stats.goals_away, 0);
    }

    #[test]
    fn test_chance_on_target_split() {
        let log = vec![chance(5, AWAY, true), chance(6, AWAY, false), chance(7, AWAY, false)];
        let stats = compute_stats(&log, HOME, AWAY);
        assert_eq!(stats.shots_away, 3);
        assert_eq!(stats.shots_on_target_away, 1);
    }

    #[test]
    fn test_cards_corners_offsides_fouls() {
        let log = vec![
            event(1, EventType::Foul, HOME),
            event(2, EventType::YellowCard, HOME),
            event(3, EventType::RedCard, AWAY),
            event(4, EventType::Corner, AWAY),
            event(5, EventType::Offside, HOME),
        ];
        let stats = compute_stats(&log, HOME, AWAY);
        assert_eq!(stats.fouls_home, 1);
        assert_eq!(stats.yellow_cards_home, 1);
        assert_eq!(stats.red_cards_away, 1);
        assert_eq!(stats.corners_away, 1);
        assert_eq!(stats.offsides_home, 1);
    }

    #[test]
    fn test_unknown_team_ignored() {
        let log = vec![event(1, EventType::Goal, 999)];
        let stats = compute_stats(&log, HOME, AWAY);
        assert_eq!(stats.total_goals(), 0);
    }

    #[test]
    fn test_idempotent_on_same_prefix() {
        let log = vec![
            event(10, EventType::Goal, HOME),
            chance(20, AWAY, true),
            event(30, EventType::Foul, AWAY),
        ];
        for k in 0..=log.len() {
            let first = compute_stats(&log[..k], HOME, AWAY);
            let second = compute_stats(&log[..k], HOME, AWAY);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_finalize_clamps_and_flags_single_mvp() {
        let mut stats = BTreeMap::new();
        for id in 0..4u32 {
            let player = Player::new(id, format!("P{}", id), Position::CM, 70);
            let mut stat = PlayerMatchStat::new(&player);
            stat.minutes_played = 90;
            stat.rating = 4.0 + id as f32 * 2.0; // 4.0, 6.0, 8.0, 10.0
            stats.insert(id, stat);
        }
        let mut rng = RandomSource::from_seed(42);
        finalize_ratings(&mut stats, &mut rng);

        for stat in stats.values() {
            assert!((1.0..=10.0).contains(&stat.rating), "rating {}", stat.rating);
        }
        let mvps: Vec<u32> =
            stats.values().filter(|s| s.is_mvp).map(|s| s.player_id).collect();
        assert_eq!(mvps.len(), 1);
    }

    #[test]
    fn test_mvp_requires_minutes() {
        let mut stats = BTreeMap::new();
        let bench = Player::new(0, "Bench", Position::CM, 70);
        let mut bench_stat = PlayerMatchStat::new(&bench);
        bench_stat.rating = 10.0;
        bench_stat.minutes_played = 0;
        stats.insert(0, bench_stat);

        let starter = Player::new(1, "Starter", Position::CM, 70);
        let mut starter_stat = PlayerMatchStat::new(&starter);
        starter_stat.minutes_played = 90;
        stats.insert(1, starter_stat);

        let mut rng = RandomSource::from_seed(1);
        finalize_ratings(&mut stats, &mut rng);
        assert!(!stats[&0].is_mvp);
        assert!(stats[&1].is_mvp);
    }

    fn arb_event() -> impl Strategy<Value = MatchEvent> {
        (
            0u8..=90,
            prop_oneof![
                Just(EventType::Goal),
                Just(EventType::Chance),
                Just(EventType::Foul),
                Just(EventType::YellowCard),
                Just(EventType::RedCard),
                Just(EventType::Corner),
                Just(EventType::Offside),
            ],
            prop_oneof![Just(HOME), Just(AWAY)],
            any::<bool>(),
        )
            .prop_map(|(minute, event_type, team, on_target)| {
                if event_type == EventType::Chance {
                    chance(minute, team, on_target)
                } else {
                    event(minute, event_type, team)
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_prefix_counts_are_monotonic(log in prop::collection::vec(arb_event(), 0..60)) {
            let mut previous = compute_stats(&log[..0], HOME, AWAY);
            for k in 1..=log.len() {
                let current = compute_stats(&log[..k], HOME, AWAY);
                prop_assert!(current.shots_home >= previous.shots_home);
                prop_assert!(current.shots_away >= previous.shots_away);
                prop_assert!(current.goals_home >= previous.goals_home);
                prop_assert!(current.goals_away >= previous.goals_away);
                prop_assert!(current.fouls_home >= previous.fouls_home);
                prop_assert!(current.fouls_away >= previous.fouls_away);
                previous = current;
            }
        }

        #[test]
        fn prop_aggregation_is_idempotent(log in prop::collection::vec(arb_event(), 0..60)) {
            let once = compute_stats(&log, HOME, AWAY);
            let twice = compute_stats(&log, HOME, AWAY);
            prop_assert_eq!(once, twice);
        }
    }
}
