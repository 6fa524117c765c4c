#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arena Warden decision engine.
//!
//! This crate defines the vocabulary that connects the protocol adapter, the
//! authoritative world, and the pure decision systems. The adapter turns raw
//! protocol lines into [`TurnSnapshot`] values, the world ingests them and
//! broadcasts [`Event`] values describing what changed, and the decision
//! systems read the world and answer with one [`HeroOrder`] per hero.

use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

use serde::{Deserialize, Serialize};

/// Smallest x coordinate inside the arena.
pub const X_MIN: i32 = 0;
/// Largest x coordinate inside the arena.
pub const X_MAX: i32 = 17_630;
/// Smallest y coordinate inside the arena.
pub const Y_MIN: i32 = 0;
/// Largest y coordinate inside the arena.
pub const Y_MAX: i32 = 9_000;

/// Distance between the two opposing base corners, used to normalise threat.
pub const DISTANCE_BETWEEN_BASES: f64 = 19_794.365;

/// Units a hero travels per turn.
pub const HERO_SPEED: f64 = 800.0;
/// Units a creature travels per turn.
pub const CREATURE_SPEED: f64 = 400.0;

/// Number of heroes each side controls.
pub const HEROES_PER_SIDE: usize = 3;
/// Hard ceiling on the number of actions emitted in a single turn.
pub const MAX_COMMANDS_PER_TURN: usize = HEROES_PER_SIDE;

/// Immutable two-dimensional integer point or vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector2Int {
    x: i32,
    y: i32,
}

impl Vector2Int {
    /// Origin of the arena coordinate system.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new vector from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Squared Euclidean length, exact in integer arithmetic.
    #[must_use]
    pub const fn sqr_magnitude(self) -> i64 {
        let x = self.x as i64;
        let y = self.y as i64;
        x * x + y * y
    }

    /// Euclidean length.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        (self.sqr_magnitude() as f64).sqrt()
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }

    /// Dot product of two vectors.
    #[must_use]
    pub const fn dot(self, other: Self) -> i64 {
        self.x as i64 * other.x as i64 + self.y as i64 * other.y as i64
    }
}

impl fmt::Display for Vector2Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vector2Int {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2Int {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2Int {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Component-wise product.
impl Mul for Vector2Int {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<i32> for Vector2Int {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector2Int> for i32 {
    type Output = Vector2Int;

    fn mul(self, rhs: Vector2Int) -> Vector2Int {
        rhs * self
    }
}

impl Div<i32> for Vector2Int {
    type Output = Self;

    fn div(self, rhs: i32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Identifier the arena assigns to a visible entity.
///
/// Identifiers are unique per entity category within a turn and may be
/// recycled across turns. Heroes carry a negative placeholder until they are
/// first sighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(i32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Placeholder identifier used for the hero at `index` before it is sighted.
    #[must_use]
    pub const fn placeholder(index: usize) -> Self {
        Self(-(index as i32) - 1)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Reports whether the identifier is still a pre-sighting placeholder.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable position of a hero inside its roster, independent of arena ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroSlot(u32);

impl HeroSlot {
    /// Creates a slot for the provided roster index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Zero-based roster index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Category of a visible entity as reported by the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Neutral or hostile mobile entity.
    Creature,
    /// Hero controlled by this engine.
    PlayerHero,
    /// Hero controlled by the opponent.
    OpponentHero,
}

impl EntityKind {
    /// Decodes the numeric category used by the arena protocol.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Creature),
            1 => Some(Self::PlayerHero),
            2 => Some(Self::OpponentHero),
            _ => None,
        }
    }

    /// Default movement speed for entities of this category.
    #[must_use]
    pub const fn speed(self) -> f64 {
        match self {
            Self::Creature => CREATURE_SPEED,
            Self::PlayerHero | Self::OpponentHero => HERO_SPEED,
        }
    }
}

/// Side a hero fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Belongs to neither side.
    Neutral,
    /// The side controlled by this engine.
    Player,
    /// The opposing side.
    Opponent,
}

/// Base a creature is currently heading for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatSide {
    /// The creature threatens neither base.
    None,
    /// The creature threatens the player's base.
    Player,
    /// The creature threatens the opponent's base.
    Opponent,
}

impl ThreatSide {
    /// Decodes the numeric threat marker used by the arena protocol.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Player),
            2 => Some(Self::Opponent),
            _ => None,
        }
    }

    /// Ordinal weight contributed to a creature's threat priority.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Player => 1,
            Self::Opponent => 2,
        }
    }
}

/// Behavioral profile assigned to a hero when the roster is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    /// Patrols a lane and chases the most urgent creature anywhere.
    Balanced,
    /// Stays near the own base and only engages critical threats.
    Defender,
    /// Holds the arena midpoint and hunts nearby creatures.
    Attacker,
}

impl Archetype {
    /// Human readable name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Defender => "defender",
            Self::Attacker => "attacker",
        }
    }
}

/// Behavior state a hero can occupy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Holding or returning to the idle spot.
    Idle,
    /// Chasing a selected creature.
    Pursue,
}

/// Kinds of spells a hero may cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellKind {
    /// Pushes every entity near the caster along a direction.
    Wind,
    /// Redirects a single entity's trajectory.
    Control,
    /// Protects a single entity from spells for a few rounds.
    Shield,
}

impl SpellKind {
    /// Name used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wind => "WIND",
            Self::Control => "CONTROL",
            Self::Shield => "SHIELD",
        }
    }

    /// Maximum distance between caster and target.
    #[must_use]
    pub const fn range(self) -> f64 {
        match self {
            Self::Wind => 1_280.0,
            Self::Control | Self::Shield => 2_200.0,
        }
    }

    /// Mana deducted from the caster's side.
    #[must_use]
    pub const fn cost(self) -> i32 {
        match self {
            Self::Wind | Self::Control | Self::Shield => 10,
        }
    }
}

/// Fully parameterised spell request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spell {
    /// Push everything around the caster along `direction`.
    Wind {
        /// Direction of the push, relative to the caster.
        direction: Vector2Int,
    },
    /// Redirect `target` along `direction`.
    Control {
        /// Entity whose trajectory is overridden.
        target: EntityId,
        /// Direction the entity is sent toward.
        direction: Vector2Int,
    },
    /// Shield `target` from further spells.
    Shield {
        /// Entity receiving the shield.
        target: EntityId,
    },
}

impl Spell {
    /// Kind of the requested spell.
    #[must_use]
    pub const fn kind(&self) -> SpellKind {
        match self {
            Self::Wind { .. } => SpellKind::Wind,
            Self::Control { .. } => SpellKind::Control,
            Self::Shield { .. } => SpellKind::Shield,
        }
    }

    /// Entity the spell is aimed at, when it has a single target.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        match self {
            Self::Wind { .. } => None,
            Self::Control { target, .. } | Self::Shield { target } => Some(*target),
        }
    }
}

/// Single decision a hero submits for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Stay in place.
    Wait,
    /// Walk toward `position`.
    Move {
        /// Destination of the move.
        position: Vector2Int,
    },
    /// Cast the provided spell.
    Cast {
        /// Spell being cast.
        spell: Spell,
    },
}

/// Action attributed to the hero that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroOrder {
    /// Roster slot of the acting hero.
    pub hero: HeroSlot,
    /// Action requested by the hero.
    pub action: Action,
}

/// Health and mana of one side at the start of a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResources {
    /// Remaining base health.
    pub health: i32,
    /// Mana available for spells.
    pub mana: i32,
}

/// One visible entity as reported for the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Arena identifier of the entity.
    pub id: EntityId,
    /// Category of the entity.
    pub kind: EntityKind,
    /// Current position.
    pub position: Vector2Int,
    /// Remaining shield rounds; positive values block control effects.
    pub shield_rounds: i32,
    /// Whether the entity is under a control effect this turn.
    pub is_controlled: bool,
    /// Remaining health.
    pub health: i32,
    /// Per-turn velocity.
    pub trajectory: Vector2Int,
    /// Whether a creature is locked onto a base.
    pub near_base: bool,
    /// Base a creature threatens.
    pub threat_for: ThreatSide,
}

/// Everything visible at the start of a turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Resources of the side controlled by this engine.
    pub player: UserResources,
    /// Resources of the opposing side.
    pub opponent: UserResources,
    /// Every entity visible this turn.
    pub entities: Vec<EntitySnapshot>,
}

/// Events broadcast by the world after ingesting a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A creature appeared for the first time.
    CreatureSighted {
        /// Identifier of the new creature.
        creature: EntityId,
    },
    /// A creature from the previous turn is no longer visible.
    CreatureLost {
        /// Identifier of the removed creature.
        creature: EntityId,
    },
    /// A roster placeholder was bound to the hero's real arena id.
    HeroBound {
        /// Side owning the hero.
        team: Team,
        /// Roster slot that was bound.
        slot: HeroSlot,
        /// Arena identifier now attached to the slot.
        id: EntityId,
    },
}

#[cfg(test)]
mod tests {
    use super::{
        Action, EntityId, EntityKind, Spell, SpellKind, ThreatSide, Vector2Int, CREATURE_SPEED,
        HERO_SPEED,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn vector_arithmetic_matches_component_math() {
        let a = Vector2Int::new(3, -4);
        let b = Vector2Int::new(1, 2);
        assert_eq!(a + b, Vector2Int::new(4, -2));
        assert_eq!(a - b, Vector2Int::new(2, -6));
        assert_eq!(-a, Vector2Int::new(-3, 4));
        assert_eq!(a * b, Vector2Int::new(3, -8));
        assert_eq!(a * 2, Vector2Int::new(6, -8));
        assert_eq!(2 * a, a * 2);
        assert_eq!(Vector2Int::new(7, -7) / 2, Vector2Int::new(3, -3));
    }

    #[test]
    fn magnitude_and_distance_use_euclidean_metric() {
        let a = Vector2Int::new(3, 4);
        assert_eq!(a.sqr_magnitude(), 25);
        assert!((a.magnitude() - 5.0).abs() < f64::EPSILON);
        assert!((Vector2Int::ZERO.distance(a) - 5.0).abs() < f64::EPSILON);
        assert_eq!(a.dot(Vector2Int::new(-4, 3)), 0);
    }

    #[test]
    fn squared_magnitude_does_not_overflow_across_the_arena() {
        let corner = Vector2Int::new(super::X_MAX, super::Y_MAX);
        assert_eq!(corner.sqr_magnitude(), 17_630_i64 * 17_630 + 9_000 * 9_000);
    }

    #[test]
    fn placeholder_ids_are_negative_and_distinct() {
        let first = EntityId::placeholder(0);
        let third = EntityId::placeholder(2);
        assert_eq!(first.get(), -1);
        assert_eq!(third.get(), -3);
        assert!(first.is_placeholder());
        assert!(!EntityId::new(0).is_placeholder());
    }

    #[test]
    fn protocol_codes_decode_to_variants() {
        assert_eq!(EntityKind::from_code(0), Some(EntityKind::Creature));
        assert_eq!(EntityKind::from_code(2), Some(EntityKind::OpponentHero));
        assert_eq!(EntityKind::from_code(3), None);
        assert_eq!(ThreatSide::from_code(1), Some(ThreatSide::Player));
        assert_eq!(ThreatSide::from_code(-1), None);
        assert_eq!(ThreatSide::Opponent.ordinal(), 2);
        assert!((EntityKind::PlayerHero.speed() - HERO_SPEED).abs() < f64::EPSILON);
        assert!((EntityKind::Creature.speed() - CREATURE_SPEED).abs() < f64::EPSILON);
    }

    #[test]
    fn spell_catalog_matches_arena_rules() {
        assert_eq!(SpellKind::Wind.name(), "WIND");
        assert!((SpellKind::Wind.range() - 1_280.0).abs() < f64::EPSILON);
        assert!((SpellKind::Control.range() - 2_200.0).abs() < f64::EPSILON);
        assert!((SpellKind::Shield.range() - 2_200.0).abs() < f64::EPSILON);
        assert_eq!(SpellKind::Control.cost(), 10);

        let control = Spell::Control {
            target: EntityId::new(4),
            direction: Vector2Int::new(1, 0),
        };
        assert_eq!(control.kind(), SpellKind::Control);
        assert_eq!(control.target(), Some(EntityId::new(4)));
        assert_eq!(
            Spell::Wind {
                direction: Vector2Int::ZERO
            }
            .target(),
            None
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cast_action_round_trips_through_bincode() {
        assert_round_trip(&Action::Cast {
            spell: Spell::Control {
                target: EntityId::new(12),
                direction: Vector2Int::new(17_630, 9_000),
            },
        });
    }
}
