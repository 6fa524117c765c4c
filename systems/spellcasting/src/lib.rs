#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides whether a hero may cast a spell this turn.
//!
//! Every spell passes the same shared checks before its situational
//! condition is considered: the target must be free of control effects and
//! shields, no other hero may already be casting on it, the caster's side
//! must afford the spell, and the target must be in range.

use arena_warden_core::{Spell, SpellKind, Vector2Int};
use arena_warden_system_targeting::TargetLedger;
use arena_warden_world::{Arena, EntityState, Hero};

/// Reasons a cast is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Refusal {
    /// The target is already under a control effect.
    CrowdControlled,
    /// Another hero cast on the target this turn.
    AlreadyCastUpon,
    /// The caster's side cannot afford the spell.
    InsufficientMana,
    /// The target is shielded.
    Shielded,
    /// The target is beyond the spell's range.
    OutOfRange,
    /// The archetype's situational condition does not hold.
    Situational,
}

/// Read-only inputs every cast decision needs.
#[derive(Clone, Copy, Debug)]
pub struct CastContext<'a> {
    /// Arena layout and creatures.
    pub arena: &'a Arena,
    /// Claims recorded so far this turn.
    pub ledger: &'a TargetLedger,
    /// Hero considering the cast.
    pub caster: &'a Hero,
    /// Mana available to the caster's side.
    pub mana: i32,
}

impl CastContext<'_> {
    /// Runs the checks shared by every spell against `target`.
    pub fn check(&self, kind: SpellKind, target: &EntityState) -> Result<(), Refusal> {
        if target.is_crowd_controlled() {
            return Err(Refusal::CrowdControlled);
        }
        if self
            .ledger
            .is_cast_upon_by_other(target.id(), self.caster.slot())
        {
            return Err(Refusal::AlreadyCastUpon);
        }
        if self.mana < kind.cost() {
            return Err(Refusal::InsufficientMana);
        }
        if target.is_shielded() {
            return Err(Refusal::Shielded);
        }
        if target.position().distance(self.caster.position()) > kind.range() {
            return Err(Refusal::OutOfRange);
        }
        Ok(())
    }

    fn toward_opponent_from(&self, origin: Vector2Int) -> Vector2Int {
        self.arena.opponent_base() - origin
    }
}

/// Redirects `target` toward the opponent base with a control spell while it
/// is within `max_base_distance` (inclusive) of the player's base.
pub fn redirect_toward_opponent(
    context: &CastContext<'_>,
    target: &EntityState,
    max_base_distance: f64,
) -> Result<Spell, Refusal> {
    context.check(SpellKind::Control, target)?;
    if target.position().distance(context.arena.player_base()) > max_base_distance {
        return Err(Refusal::Situational);
    }
    Ok(Spell::Control {
        target: target.id(),
        direction: context.toward_opponent_from(target.position()),
    })
}

/// Blows everything around the caster toward the opponent base while
/// `target` is strictly within `max_base_distance` of the player's base and
/// lies on the far side of the caster from the opponent base.
pub fn clear_from_base(
    context: &CastContext<'_>,
    target: &EntityState,
    max_base_distance: f64,
) -> Result<Spell, Refusal> {
    if target.position().distance(context.arena.player_base()) >= max_base_distance {
        return Err(Refusal::Situational);
    }
    context.check(SpellKind::Wind, target)?;
    if !behind_caster(context, target.position()) {
        return Err(Refusal::Situational);
    }
    Ok(Spell::Wind {
        direction: context.toward_opponent_from(context.caster.position()),
    })
}

/// Blows everything around the caster toward the opponent base when the
/// volley condition holds and the caster's side can afford it.
pub fn volley(context: &CastContext<'_>, ready: bool) -> Result<Spell, Refusal> {
    if !ready {
        return Err(Refusal::Situational);
    }
    if context.mana < SpellKind::Wind.cost() {
        return Err(Refusal::InsufficientMana);
    }
    Ok(Spell::Wind {
        direction: context.toward_opponent_from(context.caster.position()),
    })
}

/// Shields `target` from further spells.
pub fn shield(context: &CastContext<'_>, target: &EntityState) -> Result<Spell, Refusal> {
    context.check(SpellKind::Shield, target)?;
    Ok(Spell::Shield {
        target: target.id(),
    })
}

fn behind_caster(context: &CastContext<'_>, target: Vector2Int) -> bool {
    let caster = context.caster.position();
    let to_target = target - caster;
    let to_opponent = context.toward_opponent_from(caster);
    to_target.dot(to_opponent) < 0
}
