//! Match lifecycle state machine and the per-minute simulation loop.
//!
//! `MatchEngine` owns one `MatchSession` and is the only writer to it. The
//! lifecycle is `NotStarted → Playing ⇄ Paused → Finished`; any operation
//! outside that table is rejected with a typed `StateConflict` and leaves
//! the session untouched. Nothing inside the loop aborts the match: bad or
//! missing data degrades to a skipped event.

use std::collections::{BTreeMap, HashMap};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::attack::{AttackContext, AttackOutcome, AttackResolver};
use crate::engine::constants::{attack, clock, momentum, possession, rating};
use crate::engine::events::{EventGenerator, Incident, IncidentKind};
use crate::engine::narrator;
use crate::engine::rng::RandomSource;
use crate::engine::stats::{compute_stats, finalize_ratings};
use crate::engine::strength::{evaluate_strength, StrengthProfile};
use crate::models::{
    EventDetails, EventType, LiveMatchStats, MatchEvent, MatchReport, Player, PlayerMatchStat,
    TeamContext, VarReviewDetails, VarReviewOutcome,
};

/// Side of the pitch a team plays from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn is_home(self) -> bool {
        matches!(self, TeamSide::Home)
    }
}

/// Weather scales shot accuracy; everything else is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Snow,
    Fog,
}

impl Weather {
    pub fn accuracy_multiplier(self) -> f32 {
        match self {
            Weather::Clear => 1.0,
            Weather::Rain => 0.92,
            Weather::Snow => 0.85,
            Weather::Fog => 0.88,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    NotStarted,
    Playing,
    Paused,
    Finished,
}

/// Typed rejection for an operation invalid in the current lifecycle state.
/// The session is guaranteed unchanged when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation `{operation}` is not valid in state {state:?}")]
pub struct StateConflict {
    pub operation: &'static str,
    pub state: MatchState,
}

/// Result of one accepted `simulate_minute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinuteOutcome {
    Played,
    FullTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}

/// Everything a caller may want to build a simulation from. Construct with
/// `MatchPlan::new` and override via the builder methods.
#[derive(Debug, Clone)]
pub struct MatchPlan {
    pub match_id: Option<Uuid>,
    pub home: TeamContext,
    pub away: TeamContext,
    pub seed: u64,
    pub weather: Weather,
    pub home_advantage: f32,
    pub medical_multiplier: f32,
}

impl MatchPlan {
    pub fn new(home: TeamContext, away: TeamContext, seed: u64) -> Self {
        Self {
            match_id: None,
            home,
            away,
            seed,
            weather: Weather::Clear,
            home_advantage: possession::HOME_ADVANTAGE,
            medical_multiplier: 1.0,
        }
    }

    pub fn with_match_id(mut self, match_id: Uuid) -> Self {
        self.match_id = Some(match_id);
        self
    }

    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    pub fn with_home_advantage(mut self, home_advantage: f32) -> Self {
        self.home_advantage = home_advantage.clamp(1.0, 1.5);
        self
    }

    pub fn with_medical_multiplier(mut self, multiplier: f32) -> Self {
        self.medical_multiplier = multiplier;
        self
    }
}

/// Mutable match state: exactly one per simulation run, owned by the engine
/// and immutable once `Finished`.
#[derive(Debug, Clone)]
pub struct MatchSession {
    match_id: Uuid,
    state: MatchState,
    minute: u8,
    extra_minute: u8,
    score: Score,
    /// Attacking side of the last simulated minute.
    possession: Option<TeamSide>,
    /// 0-100; above 50 favors the home side.
    momentum: f32,
    events: Vec<MatchEvent>,
    player_stats: BTreeMap<u32, PlayerMatchStat>,
}

impl MatchSession {
    pub fn match_id(&self) -> Uuid {
        self.match_id
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn extra_minute(&self) -> u8 {
        self.extra_minute
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn possession(&self) -> Option<TeamSide> {
        self.possession
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn player_stats(&self) -> &BTreeMap<u32, PlayerMatchStat> {
        &self.player_stats
    }
}

/// The orchestrator: drives the per-minute loop and is the only mutator of
/// its `MatchSession`.
pub struct MatchEngine {
    home: TeamContext,
    away: TeamContext,
    home_profile: StrengthProfile,
    away_profile: StrengthProfile,
    weather: Weather,
    home_advantage: f32,
    rng: RandomSource,
    /// Independent stream for rating finalization, forked at construction
    /// so in-match draw counts cannot shift it.
    rating_rng: RandomSource,
    resolver: AttackResolver,
    incidents: EventGenerator,
    session: MatchSession,
    stoppage: u8,
    on_field_home: Vec<u32>,
    on_field_away: Vec<u32>,
    bench_home: Vec<u32>,
    bench_away: Vec<u32>,
    subs_used_home: u8,
    subs_used_away: u8,
    yellow_counts: HashMap<u32, u8>,
    pending_corner: Option<TeamSide>,
    possession_home_minutes: u16,
    possession_total_minutes: u16,
    final_stats: Option<LiveMatchStats>,
}

fn eligible_players<'a>(team: &'a TeamContext, on_field: &[u32]) -> Vec<&'a Player> {
    on_field
        .iter()
        .filter_map(|id| team.roster.iter().find(|p| p.id == *id))
        .collect()
}

impl MatchEngine {
    pub fn new(plan: MatchPlan) -> Self {
        let mut rng = RandomSource::from_seed(plan.seed);
        let rating_rng = rng.fork();

        let home_profile = evaluate_strength(&plan.home);
        let away_profile = evaluate_strength(&plan.away);

        let mut player_stats = BTreeMap::new();
        for player in plan.home.starting_eleven().iter().chain(plan.away.starting_eleven()) {
            player_stats.insert(player.id, PlayerMatchStat::new(player));
        }

        let on_field_home: Vec<u32> = plan.home.starting_eleven().iter().map(|p| p.id).collect();
        let on_field_away: Vec<u32> = plan.away.starting_eleven().iter().map(|p| p.id).collect();
        let bench_home: Vec<u32> =
            plan.home.roster.iter().skip(11).map(|p| p.id).collect();
        let bench_away: Vec<u32> =
            plan.away.roster.iter().skip(11).map(|p| p.id).collect();

        let session = MatchSession {
            match_id: plan.match_id.unwrap_or_else(Uuid::new_v4),
            state: MatchState::NotStarted,
            minute: 0,
            extra_minute: 0,
            score: Score::default(),
            possession: None,
            momentum: momentum::NEUTRAL,
            events: Vec::new(),
            player_stats,
        };

        Self {
            home: plan.home,
            away: plan.away,
            home_profile,
            away_profile,
            weather: plan.weather,
            home_advantage: plan.home_advantage.clamp(1.0, 1.5),
            rng,
            rating_rng,
            resolver: AttackResolver::new(),
            incidents: EventGenerator::new().with_medical_multiplier(plan.medical_multiplier),
            session,
            stoppage: 0,
            on_field_home,
            on_field_away,
            bench_home,
            bench_away,
            subs_used_home: 0,
            subs_used_away: 0,
            yellow_counts: HashMap::new(),
            pending_corner: None,
            possession_home_minutes: 0,
            possession_total_minutes: 0,
            final_stats: None,
        }
    }

    pub fn session(&self) -> &MatchSession {
        &self.session
    }

    pub fn state(&self) -> MatchState {
        self.session.state
    }

    pub fn current_minute(&self) -> u8 {
        self.session.minute
    }

    pub fn current_score(&self) -> Score {
        self.session.score
    }

    /// Aggregate statistics over the log as it stands right now, with the
    /// tracked possession split applied. Safe to call in any state.
    pub fn live_stats(&self) -> LiveMatchStats {
        let mut stats =
            compute_stats(&self.session.events, self.home.team_id, self.away.team_id);
        self.apply_possession(&mut stats);
        stats
    }

    pub fn start(&mut self) -> Result<(), StateConflict> {
        self.guard(MatchState::NotStarted, "start")?;
        self.stoppage = self.rng.range(clock::STOPPAGE_MIN..=clock::STOPPAGE_MAX);
        self.session.state = MatchState::Playing;
        let description = narrator::describe(EventType::KickOff, &self.home.name, None);
        self.emit(MatchEvent::new(0, 0, EventType::KickOff, self.home.team_id, description));
        info!(
            "match {} kicked off: {} vs {} (stoppage {}')",
            self.session.match_id, self.home.name, self.away.name, self.stoppage
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), StateConflict> {
        self.guard(MatchState::Playing, "pause")?;
        self.session.state = MatchState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), StateConflict> {
        self.guard(MatchState::Paused, "resume")?;
        self.session.state = MatchState::Playing;
        Ok(())
    }

    /// Advance the match by one simulated minute. Only valid while Playing;
    /// the call that finds no time left performs the transition to Finished.
    pub fn simulate_minute(&mut self) -> Result<MinuteOutcome, StateConflict> {
        self.guard(MatchState::Playing, "simulate_minute")?;

        if self.session.minute >= clock::REGULATION_MINUTES
            && self.session.extra_minute >= self.stoppage
        {
            self.finish();
            return Ok(MinuteOutcome::FullTime);
        }

        if self.session.minute < clock::REGULATION_MINUTES {
            self.session.minute += 1;
        } else {
            self.session.extra_minute += 1;
        }

        let attacking = self.roll_possession();
        let mut goal_this_minute = false;

        if self.rng.chance(attack::MINUTE_ATTACK_PROB) {
            goal_this_minute = self.run_attack_phase(attacking);
        }

        self.run_incident_phase();

        if !goal_this_minute {
            let drift = (self.home_profile.midfield * self.home_profile.fitness_factor
                - self.away_profile.midfield * self.away_profile.fitness_factor)
                * momentum::DAMPING;
            self.session.momentum =
                (self.session.momentum + drift).clamp(momentum::MIN, momentum::MAX);
        }

        self.credit_minutes_played();

        Ok(MinuteOutcome::Played)
    }

    /// Drive the loop to full time. Valid from Playing.
    pub fn simulate_to_end(&mut self) -> Result<(), StateConflict> {
        loop {
            if let MinuteOutcome::FullTime = self.simulate_minute()? {
                return Ok(());
            }
        }
    }

    /// Consume the engine and hand out the final report. Only valid once
    /// Finished.
    pub fn into_report(mut self) -> Result<MatchReport, StateConflict> {
        if self.session.state != MatchState::Finished {
            return Err(StateConflict { operation: "into_report", state: self.session.state });
        }
        let statistics = match self.final_stats.take() {
            Some(stats) => stats,
            None => {
                let mut stats =
                    compute_stats(&self.session.events, self.home.team_id, self.away.team_id);
                self.apply_possession(&mut stats);
                stats
            }
        };
        Ok(MatchReport {
            match_id: self.session.match_id,
            home_team_id: self.home.team_id,
            away_team_id: self.away.team_id,
            home_team_name: self.home.name,
            away_team_name: self.away.name,
            score_home: self.session.score.home,
            score_away: self.session.score.away,
            events: self.session.events,
            player_stats: self.session.player_stats.into_values().collect(),
            statistics,
        })
    }

    // ------------------------------------------------------------------
    // Minute-loop internals
    // ------------------------------------------------------------------

    fn guard(&self, expected: MatchState, operation: &'static str) -> Result<(), StateConflict> {
        if self.session.state == expected {
            Ok(())
        } else {
            Err(StateConflict { operation, state: self.session.state })
        }
    }

    /// Decide which side attacks this minute: strength-weighted share with
    /// home advantage and morale bonus, biased by momentum.
    fn roll_possession(&mut self) -> TeamSide {
        let home_power = self.home_profile.overall * self.home_advantage
            + (self.home.average_morale() - 50.0) * possession::MORALE_BONUS_SCALE;
        let away_power = self.away_profile.overall
            + (self.away.average_morale() - 50.0) * possession::MORALE_BONUS_SCALE;
        let total = home_power + away_power;
        let mut home_chance = if total > 0.0 { 100.0 * home_power / total } else { 50.0 };
        home_chance += (self.session.momentum - momentum::NEUTRAL) * possession::MOMENTUM_BIAS;
        let home_chance = home_chance.clamp(5.0, 95.0);

        let side = if self.rng.uniform() * 100.0 < home_chance as f64 {
            TeamSide::Home
        } else {
            TeamSide::Away
        };

        self.possession_total_minutes += 1;
        if side.is_home() {
            self.possession_home_minutes += 1;
        }
        self.session.possession = Some(side);
        side
    }

    /// Run one attacking possession; returns true when a confirmed goal was
    /// scored.
    fn run_attack_phase(&mut self, attacking: TeamSide) -> bool {
        // A corner awarded to the other side stays pending until that side
        // next wins possession.
        let from_corner = self.pending_corner == Some(attacking);
        if from_corner {
            self.pending_corner = None;
        }

        let outcome = {
            let (attack_team, attack_ids, attack_profile) = match attacking {
                TeamSide::Home => (&self.home, &self.on_field_home, self.home_profile),
                TeamSide::Away => (&self.away, &self.on_field_away, self.away_profile),
            };
            let (defense_team, defense_ids, defense_profile) = match attacking {
                TeamSide::Home => (&self.away, &self.on_field_away, self.away_profile),
                TeamSide::Away => (&self.home, &self.on_field_home, self.home_profile),
            };
            let attackers = eligible_players(attack_team, attack_ids);
            let defenders = eligible_players(defense_team, defense_ids);
            let ctx = AttackContext {
                attackers: &attackers,
                defenders: &defenders,
                attack_profile,
                defense_profile,
                weather_multiplier: self.weather.accuracy_multiplier(),
                from_corner,
            };
            self.resolver.resolve(&mut self.rng, &ctx)
        };

        match outcome {
            Some(outcome) => self.apply_attack_outcome(attacking, outcome),
            None => false,
        }
    }

    fn apply_attack_outcome(&mut self, attacking: TeamSide, outcome: AttackOutcome) -> bool {
        let attacking_id = self.team_id(attacking);
        let defending_id = self.team_id(attacking.opponent());
        let attacking_name = self.team_name(attacking).to_string();
        let defending_name = self.team_name(attacking.opponent()).to_string();

        match outcome {
            AttackOutcome::Miss { shooter } => {
                self.emit_chance(attacking_id, &attacking_name, shooter, false);
                self.bump_stat(shooter, |s| s.shots_off_target += 1);
                self.bump_rating(shooter, rating::SHOT_OFF_TARGET);
                false
            }
            AttackOutcome::Blocked { shooter } => {
                self.emit_chance(attacking_id, &attacking_name, shooter, false);
                self.bump_stat(shooter, |s| s.shots_off_target += 1);
                self.bump_rating(shooter, rating::SHOT_OFF_TARGET);
                self.maybe_award_corner(attacking, attacking_id, &attacking_name);
                false
            }
            AttackOutcome::Save { shooter, keeper } => {
                self.emit_chance(attacking_id, &attacking_name, shooter, true);
                let description = narrator::describe(
                    EventType::Save,
                    &defending_name,
                    self.player_name(keeper).as_deref(),
                );
                let event = self
                    .event(EventType::Save, defending_id, description)
                    .with_player(keeper)
                    .with_target(shooter);
                self.emit(event);
                self.bump_stat(shooter, |s| s.shots_on_target += 1);
                self.bump_stat(keeper, |s| s.saves += 1);
                self.bump_rating(shooter, rating::SHOT_ON_TARGET);
                self.bump_rating(keeper, rating::SAVE);
                self.maybe_award_corner(attacking, attacking_id, &attacking_name);
                false
            }
            AttackOutcome::Offside { shooter, var_overturned } => {
                if var_overturned {
                    let description = narrator::describe(
                        EventType::VarCheck,
                        &attacking_name,
                        self.player_name(shooter).as_deref(),
                    );
                    let event = self
                        .event(EventType::VarCheck, attacking_id, description)
                        .with_player(shooter)
                        .with_details(EventDetails {
                            var_review: Some(VarReviewDetails {
                                reviewed_event_type: EventType::Goal,
                                outcome: VarReviewOutcome::Overturned,
                            }),
                            ..EventDetails::default()
                        });
                    self.emit(event);
                }
                let description = narrator::describe(
                    EventType::Offside,
                    &attacking_name,
                    self.player_name(shooter).as_deref(),
                );
                let event = self
                    .event(EventType::Offside, attacking_id, description)
                    .with_player(shooter);
                self.emit(event);
                self.bump_rating(shooter, rating::OFFSIDE);
                false
            }
            AttackOutcome::Goal { scorer, assister, var_reviewed } => {
                if var_reviewed {
                    let check = self
                        .event(
                            EventType::VarCheck,
                            attacking_id,
                            narrator::describe(
                                EventType::VarCheck,
                                &attacking_name,
                                self.player_name(scorer).as_deref(),
                            ),
                        )
                        .with_player(scorer);
                    self.emit(check);
                    let decision = self
                        .event(
                            EventType::VarDecision,
                            attacking_id,
                            narrator::describe(
                                EventType::VarDecision,
                                &attacking_name,
                                self.player_name(scorer).as_deref(),
                            ),
                        )
                        .with_player(scorer)
                        .with_details(EventDetails {
                            var_review: Some(VarReviewDetails {
                                reviewed_event_type: EventType::Goal,
                                outcome: VarReviewOutcome::Upheld,
                            }),
                            ..EventDetails::default()
                        });
                    self.emit(decision);
                }

                let mut goal = self
                    .event(
                        EventType::Goal,
                        attacking_id,
                        narrator::describe(
                            EventType::Goal,
                            &attacking_name,
                            self.player_name(scorer).as_deref(),
                        ),
                    )
                    .with_player(scorer);
                if let Some(assister) = assister {
                    goal = goal.with_target(assister);
                }
                self.emit(goal);

                match attacking {
                    TeamSide::Home => self.session.score.home += 1,
                    TeamSide::Away => self.session.score.away += 1,
                }
                self.bump_stat(scorer, |s| {
                    s.goals += 1;
                    s.shots_on_target += 1;
                });
                self.bump_rating(scorer, rating::GOAL);

                if let Some(assister) = assister {
                    let event = self
                        .event(
                            EventType::Assist,
                            attacking_id,
                            narrator::describe(
                                EventType::Assist,
                                &attacking_name,
                                self.player_name(assister).as_deref(),
                            ),
                        )
                        .with_player(assister)
                        .with_target(scorer);
                    self.emit(event);
                    self.bump_stat(assister, |s| s.assists += 1);
                    self.bump_rating(assister, rating::ASSIST);
                }

                // Momentum swings hard toward the scoring side.
                self.session.momentum = if attacking.is_home() {
                    momentum::POST_GOAL_SCORER
                } else {
                    momentum::POST_GOAL_CONCEDER
                };

                debug!(
                    "{}' goal for {} ({}-{})",
                    self.session.minute, attacking_name, self.session.score.home,
                    self.session.score.away
                );
                true
            }
        }
    }

    fn maybe_award_corner(&mut self, attacking: TeamSide, team_id: u32, team_name: &str) {
        if self.rng.chance(attack::CORNER_AWARD_PROB) {
            let description = narrator::describe(EventType::Corner, team_name, None);
            let event = self.event(EventType::Corner, team_id, description);
            self.emit(event);
            self.pending_corner = Some(attacking);
        }
    }

    fn run_incident_phase(&mut self) {
        let side = if self.rng.chance(0.5) { TeamSide::Home } else { TeamSide::Away };
        let incident = {
            let (team, ids) = match side {
                TeamSide::Home => (&self.home, &self.on_field_home),
                TeamSide::Away => (&self.away, &self.on_field_away),
            };
            let players = eligible_players(team, ids);
            self.incidents.roll(&mut self.rng, &players)
        };
        if let Some(incident) = incident {
            self.apply_incident(side, incident);
        }
    }

    fn apply_incident(&mut self, side: TeamSide, incident: Incident) {
        let team_id = self.team_id(side);
        let team_name = self.team_name(side).to_string();
        let player = incident.player_id;
        let player_name = self.player_name(player);

        match incident.kind {
            IncidentKind::Foul => {
                let victim = {
                    let (team, ids) = match side.opponent() {
                        TeamSide::Home => (&self.home, &self.on_field_home),
                        TeamSide::Away => (&self.away, &self.on_field_away),
                    };
                    let opponents = eligible_players(team, ids);
                    self.rng.pick(&opponents).map(|p| p.id)
                };
                let description =
                    narrator::describe(EventType::Foul, &team_name, player_name.as_deref());
                let mut event =
                    self.event(EventType::Foul, team_id, description).with_player(player);
                if let Some(victim) = victim {
                    event = event.with_target(victim);
                }
                self.emit(event);
                self.bump_stat(player, |s| s.fouls_committed += 1);
                self.bump_rating(player, rating::FOUL);
                if let Some(victim) = victim {
                    self.bump_stat(victim, |s| s.fouls_suffered += 1);
                    self.bump_rating(victim, rating::FOUL_SUFFERED);
                }
            }
            IncidentKind::YellowCard => {
                let description =
                    narrator::describe(EventType::YellowCard, &team_name, player_name.as_deref());
                let event =
                    self.event(EventType::YellowCard, team_id, description).with_player(player);
                self.emit(event);
                self.bump_stat(player, |s| s.yellow_cards += 1);
                self.bump_rating(player, rating::YELLOW_CARD);

                let count = self.yellow_counts.entry(player).or_insert(0);
                *count = count.saturating_add(1);
                if *count >= 2 {
                    // Second yellow: automatic red and ejection.
                    let description = narrator::describe(
                        EventType::RedCard,
                        &team_name,
                        player_name.as_deref(),
                    );
                    let event = self
                        .event(EventType::RedCard, team_id, description)
                        .with_player(player)
                        .with_details(EventDetails {
                            second_yellow: Some(true),
                            ..EventDetails::default()
                        });
                    self.emit(event);
                    self.bump_stat(player, |s| s.red_cards += 1);
                    self.bump_rating(player, rating::RED_CARD);
                    self.remove_from_field(side, player);
                }
            }
            IncidentKind::RedCard => {
                let description =
                    narrator::describe(EventType::RedCard, &team_name, player_name.as_deref());
                let event =
                    self.event(EventType::RedCard, team_id, description).with_player(player);
                self.emit(event);
                self.bump_stat(player, |s| s.red_cards += 1);
                self.bump_rating(player, rating::RED_CARD);
                self.remove_from_field(side, player);
            }
            IncidentKind::Injury => {
                let description =
                    narrator::describe(EventType::Injury, &team_name, player_name.as_deref());
                let event = self
                    .event(EventType::Injury, team_id, description)
                    .with_player(player)
                    .with_details(EventDetails {
                        injury: incident.injury,
                        ..EventDetails::default()
                    });
                self.emit(event);
                self.remove_from_field(side, player);
                self.try_substitute(side, player);
            }
        }
    }

    /// Replace an injured player from the bench, three substitutions max.
    /// A red-carded side plays on a player down instead.
    fn try_substitute(&mut self, side: TeamSide, going_off: u32) {
        let replacement = {
            let (bench, used) = match side {
                TeamSide::Home => (&mut self.bench_home, &mut self.subs_used_home),
                TeamSide::Away => (&mut self.bench_away, &mut self.subs_used_away),
            };
            if *used >= 3 || bench.is_empty() {
                None
            } else {
                *used += 1;
                Some(bench.remove(0))
            }
        };
        let Some(replacement) = replacement else {
            return;
        };

        let team = match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        };
        let Some(player) = team.roster.iter().find(|p| p.id == replacement) else {
            return;
        };
        let stat = PlayerMatchStat::new(player);
        let team_id = team.team_id;
        let team_name = team.name.clone();
        let player_name = player.name.clone();

        self.session.player_stats.entry(replacement).or_insert(stat);
        match side {
            TeamSide::Home => self.on_field_home.push(replacement),
            TeamSide::Away => self.on_field_away.push(replacement),
        }
        let description =
            narrator::describe(EventType::Substitution, &team_name, Some(&player_name));
        let event = self
            .event(EventType::Substitution, team_id, description)
            .with_player(replacement)
            .with_target(going_off);
        self.emit(event);
    }

    fn remove_from_field(&mut self, side: TeamSide, player: u32) {
        let on_field = match side {
            TeamSide::Home => &mut self.on_field_home,
            TeamSide::Away => &mut self.on_field_away,
        };
        on_field.retain(|id| *id != player);
    }

    fn credit_minutes_played(&mut self) {
        let ids: Vec<u32> = self
            .on_field_home
            .iter()
            .chain(self.on_field_away.iter())
            .copied()
            .collect();
        for id in ids {
            if let Some(stat) = self.session.player_stats.get_mut(&id) {
                stat.minutes_played = stat.minutes_played.saturating_add(1);
            }
        }
    }

    fn finish(&mut self) {
        let description = narrator::describe(EventType::FullTime, &self.home.name, None);
        let event = MatchEvent::new(
            clock::REGULATION_MINUTES,
            self.stoppage,
            EventType::FullTime,
            self.home.team_id,
            description,
        );
        self.session.events.push(event);

        finalize_ratings(&mut self.session.player_stats, &mut self.rating_rng);

        let mut stats = compute_stats(&self.session.events, self.home.team_id, self.away.team_id);
        self.apply_possession(&mut stats);
        self.final_stats = Some(stats);

        self.session.state = MatchState::Finished;
        info!(
            "match {} finished {} {} - {} {}",
            self.session.match_id,
            self.home.name,
            self.session.score.home,
            self.session.score.away,
            self.away.name
        );
    }

    fn apply_possession(&self, stats: &mut LiveMatchStats) {
        if self.possession_total_minutes > 0 {
            let home = 100.0 * self.possession_home_minutes as f32
                / self.possession_total_minutes as f32;
            stats.possession_home = home;
            stats.possession_away = 100.0 - home;
        }
    }

    fn team_id(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home.team_id,
            TeamSide::Away => self.away.team_id,
        }
    }

    fn team_name(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Home => &self.home.name,
            TeamSide::Away => &self.away.name,
        }
    }

    fn player_name(&self, player_id: u32) -> Option<String> {
        self.home
            .roster
            .iter()
            .chain(self.away.roster.iter())
            .find(|p| p.id == player_id)
            .map(|p| p.name.clone())
    }

    fn event(&self, event_type: EventType, team_id: u32, description: String) -> MatchEvent {
        MatchEvent::new(
            self.session.minute,
            self.session.extra_minute,
            event_type,
            team_id,
            description,
        )
    }

    fn emit(&mut self, event: MatchEvent) {
        debug!(
            "{}+{}' {:?} (team {})",
            event.minute, event.extra_minute, event.event_type, event.team_id
        );
        self.session.events.push(event);
    }

    /// Log a shot that did not score; the on-target flag feeds the
    /// shots-on-target fold in `stats::compute_stats`.
    fn emit_chance(&mut self, team_id: u32, team_name: &str, shooter: u32, on_target: bool) {
        let description =
            narrator::describe(EventType::Chance, team_name, self.player_name(shooter).as_deref());
        let event = self
            .event(EventType::Chance, team_id, description)
            .with_player(shooter)
            .with_details(EventDetails {
                on_target: Some(on_target),
                ..EventDetails::default()
            });
        self.emit(event);
    }

    fn bump_stat(&mut self, player_id: u32, apply: impl FnOnce(&mut PlayerMatchStat)) {
        if let Some(stat) = self.session.player_stats.get_mut(&player_id) {
            apply(stat);
        }
    }

    fn bump_rating(&mut self, player_id: u32, delta: f32) {
        self.bump_stat(player_id, |s| s.rating += delta);
    }
}

/// Run one complete match: construct, kick off, loop to full time, report.
pub fn run_match(plan: MatchPlan) -> Result<MatchReport, StateConflict> {
    let mut engine = MatchEngine::new(plan);
    engine.start()?;
    engine.simulate_to_end()?;
    engine.into_report()
}
