#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state management for Arena Warden.

mod creatures;
mod heroes;

use arena_warden_core::{
    Archetype, EntityId, EntityKind, EntitySnapshot, Event, Team, TurnSnapshot, UserResources,
    Vector2Int, X_MAX, X_MIN, Y_MAX, Y_MIN,
};
use thiserror::Error;

use creatures::CreatureRegistry;

pub use creatures::{threat_priority, Creature, IGNORED_PRIORITY};
pub use heroes::{Hero, Roster};

/// Failures that make a turn snapshot impossible to ingest safely.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    /// A sighted hero matches neither a bound id nor a free placeholder slot.
    #[error("hero {id} of team {team:?} does not match any roster slot")]
    UnknownHero {
        /// Side the hero was reported for.
        team: Team,
        /// Arena identifier of the unmatched hero.
        id: EntityId,
    },
}

/// Attributes shared by every visible entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityState {
    id: EntityId,
    kind: EntityKind,
    position: Vector2Int,
    trajectory: Vector2Int,
    speed: f64,
    health: i32,
    shield_rounds: i32,
    is_controlled: bool,
}

impl EntityState {
    pub(crate) fn from_snapshot(snapshot: &EntitySnapshot) -> Self {
        Self {
            id: snapshot.id,
            kind: snapshot.kind,
            position: snapshot.position,
            trajectory: snapshot.trajectory,
            speed: snapshot.kind.speed(),
            health: snapshot.health,
            shield_rounds: snapshot.shield_rounds,
            is_controlled: snapshot.is_controlled,
        }
    }

    pub(crate) fn placeholder(id: EntityId, kind: EntityKind) -> Self {
        Self {
            id,
            kind,
            position: Vector2Int::ZERO,
            trajectory: Vector2Int::ZERO,
            speed: kind.speed(),
            health: 0,
            shield_rounds: 0,
            is_controlled: false,
        }
    }

    pub(crate) fn refresh(&mut self, snapshot: &EntitySnapshot) {
        *self = Self::from_snapshot(snapshot);
    }

    /// Arena identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Category reported by the arena.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Vector2Int {
        self.position
    }

    /// Per-turn velocity.
    #[must_use]
    pub const fn trajectory(&self) -> Vector2Int {
        self.trajectory
    }

    /// Distance covered per turn, fixed by category.
    #[must_use]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Rounds of shield protection left.
    #[must_use]
    pub const fn shield_rounds(&self) -> i32 {
        self.shield_rounds
    }

    /// Whether a shield currently blocks control effects.
    #[must_use]
    pub const fn is_shielded(&self) -> bool {
        self.shield_rounds > 0
    }

    /// Whether a control effect is active this turn.
    #[must_use]
    pub const fn is_crowd_controlled(&self) -> bool {
        self.is_controlled
    }
}

/// Static base layout plus the creatures visible this turn.
#[derive(Debug)]
pub struct Arena {
    player_base: Vector2Int,
    opponent_base: Vector2Int,
    creatures: CreatureRegistry,
}

impl Arena {
    /// Derives the arena layout from the player's base position.
    ///
    /// The opponent always occupies the mirrored corner.
    #[must_use]
    pub fn new(player_base: Vector2Int) -> Self {
        let opponent_base = if is_top_left(player_base) {
            Vector2Int::new(X_MAX, Y_MAX)
        } else {
            Vector2Int::new(X_MIN, Y_MIN)
        };
        Self {
            player_base,
            opponent_base,
            creatures: CreatureRegistry::default(),
        }
    }

    /// Position of the base this engine defends.
    #[must_use]
    pub const fn player_base(&self) -> Vector2Int {
        self.player_base
    }

    /// Position of the opposing base.
    #[must_use]
    pub const fn opponent_base(&self) -> Vector2Int {
        self.opponent_base
    }

    /// Whether the player's base sits in the top-left corner.
    #[must_use]
    pub const fn is_top_left(&self) -> bool {
        is_top_left(self.player_base)
    }

    /// Centre of the arena.
    #[must_use]
    pub const fn midpoint(&self) -> Vector2Int {
        Vector2Int::new(X_MAX / 2, Y_MAX / 2)
    }

    /// Picks the coordinate matching the player's side of the arena.
    #[must_use]
    pub const fn mirrored(&self, top_left: Vector2Int, bottom_right: Vector2Int) -> Vector2Int {
        if self.is_top_left() {
            top_left
        } else {
            bottom_right
        }
    }

    /// Creature with the provided id, if it is visible this turn.
    #[must_use]
    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.creatures.get(id)
    }

    /// Visible creatures in ascending id order.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    /// Number of visible creatures.
    #[must_use]
    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    /// Whether any creature is visible.
    #[must_use]
    pub fn has_creatures(&self) -> bool {
        self.creature_count() > 0
    }
}

const fn is_top_left(player_base: Vector2Int) -> bool {
    player_base.x() < X_MAX / 2
}

/// One side of the match: its resources and its heroes.
#[derive(Debug)]
pub struct User {
    resources: UserResources,
    roster: Roster,
}

impl User {
    /// Creates a user owning the provided roster.
    #[must_use]
    pub fn new(roster: Roster) -> Self {
        Self {
            resources: UserResources::default(),
            roster,
        }
    }

    /// Remaining base health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.resources.health
    }

    /// Mana available for spells.
    #[must_use]
    pub const fn mana(&self) -> i32 {
        self.resources.mana
    }

    /// Deducts `cost` from the available mana.
    pub fn spend_mana(&mut self, cost: i32) {
        self.resources.mana -= cost;
    }

    /// Heroes owned by this side.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Mutable access to the heroes owned by this side.
    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }
}

/// Represents the authoritative Arena Warden world state.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    player: User,
    opponent: User,
    turn: u64,
}

impl World {
    /// Creates a world for a match where the player defends `player_base`.
    ///
    /// Both rosters are built in the provided order; roster order is the
    /// order heroes are bound on first sighting and decide every turn.
    #[must_use]
    pub fn new(
        player_base: Vector2Int,
        player_roster: &[Archetype],
        opponent_roster: &[Archetype],
    ) -> Self {
        Self {
            arena: Arena::new(player_base),
            player: User::new(Roster::new(Team::Player, player_roster)),
            opponent: User::new(Roster::new(Team::Opponent, opponent_roster)),
            turn: 0,
        }
    }

    /// Splits the world into the read-only arena and the player's side, so a
    /// decision pass can mutate heroes and mana while reading creatures.
    pub fn decision_view_mut(&mut self) -> (&Arena, &mut User) {
        (&self.arena, &mut self.player)
    }
}

/// Ingests a turn snapshot, mutating the world deterministically.
///
/// Creatures are created on first sighting, refreshed while visible and
/// removed the turn they disappear. Heroes are refreshed through their
/// rosters, binding placeholders on first sighting.
pub fn apply(
    world: &mut World,
    snapshot: &TurnSnapshot,
    out_events: &mut Vec<Event>,
) -> Result<(), IngestError> {
    world.turn = world.turn.saturating_add(1);
    world.player.resources = snapshot.player;
    world.opponent.resources = snapshot.opponent;

    let player_base = world.arena.player_base;
    let mut seen = Vec::with_capacity(snapshot.entities.len());

    for entity in &snapshot.entities {
        match entity.kind {
            EntityKind::Creature => {
                seen.push(entity.id);
                if world.arena.creatures.upsert(entity, player_base) {
                    out_events.push(Event::CreatureSighted {
                        creature: entity.id,
                    });
                }
            }
            EntityKind::PlayerHero => sight_hero(&mut world.player, entity, out_events)?,
            EntityKind::OpponentHero => sight_hero(&mut world.opponent, entity, out_events)?,
        }
    }

    for creature in world.arena.creatures.retain_seen(&seen) {
        out_events.push(Event::CreatureLost { creature });
    }

    Ok(())
}

fn sight_hero(
    user: &mut User,
    entity: &EntitySnapshot,
    out_events: &mut Vec<Event>,
) -> Result<(), IngestError> {
    if let Some(slot) = user.roster.sight(entity)? {
        out_events.push(Event::HeroBound {
            team: user.roster.team(),
            slot,
            id: entity.id,
        });
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Arena, User, World};

    /// Provides read-only access to the arena layout and its creatures.
    #[must_use]
    pub fn arena(world: &World) -> &Arena {
        &world.arena
    }

    /// Side controlled by this engine.
    #[must_use]
    pub fn player(world: &World) -> &User {
        &world.player
    }

    /// Opposing side.
    #[must_use]
    pub fn opponent(world: &World) -> &User {
        &world.opponent
    }

    /// Number of snapshots ingested so far.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }
}
