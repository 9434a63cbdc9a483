//! Attack possession resolution.
//!
//! One call resolves one attacking possession into at most one outcome.
//! The resolver is stateless; every probabilistic step draws from the
//! caller's `RandomSource`, and outcomes are a tagged variant handled by
//! pattern matching in the minute loop.

use crate::engine::constants::{attack, corner, var};
use crate::engine::rng::RandomSource;
use crate::engine::strength::StrengthProfile;
use crate::models::Player;

/// Outcome of one attacking possession. Carries enough identity to produce
/// the corresponding match events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    Goal {
        scorer: u32,
        assister: Option<u32>,
        /// True when a VAR review was opened and the goal upheld.
        var_reviewed: bool,
    },
    Save {
        shooter: u32,
        keeper: u32,
    },
    Miss {
        shooter: u32,
    },
    Blocked {
        shooter: u32,
    },
    Offside {
        shooter: u32,
        /// True when the flag came from a VAR review of an apparent goal;
        /// the caller must emit the review pair and no goal.
        var_overturned: bool,
    },
}

/// Per-possession inputs. Rosters are the on-field eligible players only
/// (ejected and injured players already filtered out).
pub struct AttackContext<'a> {
    pub attackers: &'a [&'a Player],
    pub defenders: &'a [&'a Player],
    pub attack_profile: StrengthProfile,
    pub defense_profile: StrengthProfile,
    pub weather_multiplier: f32,
    /// Set when this possession delivers a previously awarded corner.
    pub from_corner: bool,
}

#[derive(Debug, Default)]
pub struct AttackResolver;

impl AttackResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve one possession. `None` means the possession fizzled without
    /// a shot (or no attacker was available to shoot).
    pub fn resolve(&self, rng: &mut RandomSource, ctx: &AttackContext) -> Option<AttackOutcome> {
        if !rng.chance(attack::SHOT_GATE_PROB) {
            return None;
        }

        let shooter = self.select_shooter(rng, ctx.attackers)?;

        if ctx.from_corner {
            // Corner delivery has its own fixed distribution; no offside
            // from a corner kick.
            return Some(self.resolve_corner(rng, ctx, shooter));
        }

        let quality = shooter.shot_quality();
        let on_target =
            attack::BASE_ACCURACY * (quality as f64 / 100.0) * ctx.weather_multiplier as f64;
        if !rng.chance(on_target) {
            return Some(AttackOutcome::Miss { shooter: shooter.id });
        }

        if rng.chance(attack::OFFSIDE_PROB) {
            return Some(AttackOutcome::Offside { shooter: shooter.id, var_overturned: false });
        }

        if !rng.chance(self.beat_defense_probability(ctx, quality)) {
            return Some(AttackOutcome::Blocked { shooter: shooter.id });
        }

        match self.resolve_against_keeper(rng, ctx, shooter.id) {
            Some(save) => Some(save),
            None => Some(self.confirm_goal(rng, ctx, shooter.id)),
        }
    }

    /// Shooter selection weighted toward forwards, then midfielders, then
    /// any outfield player. Goalkeepers only shoot when nobody else can
    /// (uniform fallback on an all-zero weight set).
    fn select_shooter<'a>(
        &self,
        rng: &mut RandomSource,
        attackers: &'a [&'a Player],
    ) -> Option<&'a Player> {
        rng.pick_weighted(attackers, |p| {
            if p.position.is_forward() {
                attack::SHOOTER_WEIGHT_FORWARD
            } else if p.position.is_midfielder() {
                attack::SHOOTER_WEIGHT_MIDFIELDER
            } else if p.position.is_outfield() {
                attack::SHOOTER_WEIGHT_OUTFIELD
            } else {
                0.0
            }
        })
        .copied()
    }

    /// Pass-the-defense roll: attack power (fitness- and shooter-scaled)
    /// against defense power.
    fn beat_defense_probability(&self, ctx: &AttackContext, shooter_quality: f32) -> f64 {
        let shooter_bonus = 1.0 + shooter_quality / attack::SHOOTER_BONUS_SCALE;
        let attack_power =
            ctx.attack_profile.attack * ctx.attack_profile.fitness_factor * shooter_bonus;
        let defense_power = ctx.defense_profile.defense * ctx.defense_profile.fitness_factor;
        let total = attack_power + defense_power;
        if total <= 0.0 {
            return 0.5;
        }
        (attack_power / total) as f64
    }

    /// Save roll against the defending shot-stopper. Returns `None` when the
    /// keeper is beaten (goal pending VAR) or when nobody can stop the shot.
    fn resolve_against_keeper(
        &self,
        rng: &mut RandomSource,
        ctx: &AttackContext,
        shooter: u32,
    ) -> Option<AttackOutcome> {
        let (keeper, fallback) = self.shot_stopper(ctx.defenders)?;
        let mut save_chance =
            attack::SAVE_BASE + keeper.keeper_quality() as f64 / 100.0 * attack::SAVE_KEEPER_SCALE;
        if fallback {
            save_chance -= attack::FALLBACK_KEEPER_PENALTY;
        }
        if rng.chance(save_chance) {
            Some(AttackOutcome::Save { shooter, keeper: keeper.id })
        } else {
            None
        }
    }

    /// The designated goalkeeper, or the best-stopping defender at a reduced
    /// bonus, or nobody at all (open goal).
    fn shot_stopper<'a>(&self, defenders: &'a [&'a Player]) -> Option<(&'a Player, bool)> {
        if let Some(gk) = defenders.iter().find(|p| p.position.is_goalkeeper()) {
            return Some((gk, false));
        }
        defenders
            .iter()
            .filter(|p| p.position.is_defender())
            .max_by(|a, b| {
                a.keeper_quality()
                    .partial_cmp(&b.keeper_quality())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| (*p, true))
    }

    /// VAR gate plus assist attribution for a shot that beat the keeper.
    fn confirm_goal(&self, rng: &mut RandomSource, ctx: &AttackContext, scorer: u32) -> AttackOutcome {
        let mut var_reviewed = false;
        if rng.chance(var::REVIEW_PROB) {
            if rng.chance(var::OVERTURN_PROB) {
                return AttackOutcome::Offside { shooter: scorer, var_overturned: true };
            }
            var_reviewed = true;
        }
        let assister = self.attribute_assist(rng, ctx.attackers, scorer);
        AttackOutcome::Goal { scorer, assister, var_reviewed }
    }

    /// Only confirmed goals get an assist; candidates are weighted toward
    /// midfielders and never include the scorer or the goalkeeper.
    fn attribute_assist(
        &self,
        rng: &mut RandomSource,
        attackers: &[&Player],
        scorer: u32,
    ) -> Option<u32> {
        if !rng.chance(attack::ASSIST_PROB) {
            return None;
        }
        let candidates: Vec<&Player> = attackers
            .iter()
            .filter(|p| p.id != scorer && p.position.is_outfield())
            .copied()
            .collect();
        rng.pick_weighted(&candidates, |p| {
            if p.position.is_midfielder() {
                attack::ASSIST_WEIGHT_MIDFIELDER
            } else {
                attack::ASSIST_WEIGHT_OUTFIELD
            }
        })
        .map(|p| p.id)
    }

    fn resolve_corner(
        &self,
        rng: &mut RandomSource,
        ctx: &AttackContext,
        shooter: &Player,
    ) -> AttackOutcome {
        #[derive(Clone, Copy)]
        enum CornerOutcome {
            Goal,
            Save,
            Blocked,
            Miss,
        }
        let table = [
            (CornerOutcome::Goal, corner::GOAL_WEIGHT),
            (CornerOutcome::Save, corner::SAVE_WEIGHT),
            (CornerOutcome::Blocked, corner::BLOCKED_WEIGHT),
            (CornerOutcome::Miss, corner::MISS_WEIGHT),
        ];
        let picked = rng.pick_weighted(&table, |(_, w)| *w).map(|(o, _)| *o);
        match picked.unwrap_or(CornerOutcome::Miss) {
            CornerOutcome::Goal => self.corner_goal(rng, ctx, shooter.id),
            CornerOutcome::Save => match self.shot_stopper(ctx.defenders) {
                Some((keeper, _)) => AttackOutcome::Save { shooter: shooter.id, keeper: keeper.id },
                None => self.corner_goal(rng, ctx, shooter.id),
            },
            CornerOutcome::Blocked => AttackOutcome::Blocked { shooter: shooter.id },
            CornerOutcome::Miss => AttackOutcome::Miss { shooter: shooter.id },
        }
    }

    /// Corner goals skip the VAR gate: the review's overturn path converts a
    /// goal into an offside, which cannot exist on a corner delivery.
    fn corner_goal(&self, rng: &mut RandomSource, ctx: &AttackContext, scorer: u32) -> AttackOutcome {
        let assister = self.attribute_assist(rng, ctx.attackers, scorer);
        AttackOutcome::Goal { scorer, assister, var_reviewed: false }
    }
}
