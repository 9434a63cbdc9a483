//! # mm_core - Deterministic minute-based football match simulation engine
//!
//! Simulates a full match one minute at a time: a seeded possession/attack
//! roll per minute, discipline and injury incidents, a VAR gate on goals,
//! and an event log everything else is derived from.
//!
//! ## Features
//! - 100% deterministic simulation (same inputs + seed = same result)
//! - Event-sourced: score and box score recomputable from the log
//! - Stepwise control (start/pause/resume/per-minute) or run-to-completion
//! - JSON API for easy integration with game engines and services

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use api::{simulate_match_json, MatchRequest, MatchResponse};
pub use engine::{
    run_match, simulate_batch, MatchEngine, MatchPlan, MatchState, MinuteOutcome, RandomSource,
    StateConflict, TeamSide, Weather,
};
pub use error::{MatchError, Result};
pub use models::{
    EventType, LiveMatchStats, MatchEvent, MatchReport, Player, PlayerMatchStat, Position,
    TeamContext,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// JSON API request/response schema version.
pub const SCHEMA_VERSION: u8 = 1;
