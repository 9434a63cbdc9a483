pub mod events;
pub mod match_result;
pub mod match_statistics;
pub mod player;
pub mod team;

pub use events::{
    EventDetails, EventType, InjuryDetails, InjurySeverity, MatchEvent, VarReviewDetails,
    VarReviewOutcome,
};
pub use match_result::{MatchReport, PlayerMatchStat};
pub use match_statistics::LiveMatchStats;
pub use player::{Player, PlayerAttributes, Position};
pub use team::{Mentality, Tactics, TeamContext};
