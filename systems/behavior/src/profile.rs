//! Archetype profiles specializing the shared Idle and Pursue states.

use std::fmt;

use arena_warden_core::{Archetype, EntityId, Spell, Vector2Int, X_MAX, X_MIN, Y_MAX, Y_MIN};
use arena_warden_system_spellcasting::{
    clear_from_base, redirect_toward_opponent, volley, CastContext, Refusal,
};
use arena_warden_system_targeting::{any_in, TargetLedger, Targeting, Zone};
use arena_warden_world::{Arena, EntityState, Hero};

const ZONE_RADIUS: f64 = 5_000.0;
const CONTROL_BASE_RADIUS: f64 = 5_000.0;
const WIND_BASE_RADIUS: f64 = 4_000.0;
const DEFENDER_OFFSET: i32 = 2_000;

/// How a pursuing hero closes in on its target when it cannot cast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChaseMode {
    /// Move straight to the target's current position.
    #[default]
    Direct,
    /// Move to the point where the target can be intercepted.
    Intercept,
}

/// Decides whether the attacker's wind volley should fire this turn.
pub type VolleyPredicate = fn(&Arena, &Hero) -> bool;

/// Volley predicate that never fires.
#[must_use]
pub fn never_volley(_arena: &Arena, _hero: &Hero) -> bool {
    false
}

/// Behavior that distinguishes one archetype from another.
///
/// The Idle and Pursue states are shared by every hero; they consult the
/// hero's profile for where to rest, when to engage, what to chase and which
/// spell to cast.
pub trait HeroProfile: fmt::Debug {
    /// Archetype this profile drives.
    fn archetype(&self) -> Archetype;

    /// Resting position of the hero with the given archetype index.
    fn idle_spot(&self, arena: &Arena, index: usize) -> Vector2Int;

    /// Whether an idle hero should start pursuing.
    fn should_engage(&self, arena: &Arena) -> bool;

    /// Creature the pursuing `hero` should chase, if any.
    fn select_target(
        &self,
        targeting: &mut Targeting,
        arena: &Arena,
        ledger: &TargetLedger,
        hero: &Hero,
    ) -> Option<EntityId>;

    /// Spell the hero casts on its pursued `target`, or why it holds off.
    fn cast(&self, context: &CastContext<'_>, target: &EntityState) -> Result<Spell, Refusal>;

    /// How the hero moves toward a target it cannot cast on.
    fn chase(&self) -> ChaseMode {
        ChaseMode::Direct
    }
}

/// Lane holder that engages anything and redirects nearby threats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balanced {
    chase: ChaseMode,
}

impl Balanced {
    /// Creates a balanced profile with the provided chase style.
    #[must_use]
    pub const fn new(chase: ChaseMode) -> Self {
        Self { chase }
    }
}

impl HeroProfile for Balanced {
    fn archetype(&self) -> Archetype {
        Archetype::Balanced
    }

    fn idle_spot(&self, arena: &Arena, index: usize) -> Vector2Int {
        let (top_left, bottom_right) = match index % 3 {
            0 => (Vector2Int::new(5_000, 900), Vector2Int::new(16_000, 4_000)),
            1 => (Vector2Int::new(4_000, 3_000), Vector2Int::new(14_500, 5_000)),
            _ => (Vector2Int::new(1_500, 4_700), Vector2Int::new(13_000, 7_000)),
        };
        arena.mirrored(top_left, bottom_right)
    }

    fn should_engage(&self, arena: &Arena) -> bool {
        arena.has_creatures()
    }

    fn select_target(
        &self,
        targeting: &mut Targeting,
        arena: &Arena,
        ledger: &TargetLedger,
        hero: &Hero,
    ) -> Option<EntityId> {
        targeting.most_urgent(arena, ledger, hero.slot())
    }

    fn cast(&self, context: &CastContext<'_>, target: &EntityState) -> Result<Spell, Refusal> {
        redirect_toward_opponent(context, target, CONTROL_BASE_RADIUS)
    }

    fn chase(&self) -> ChaseMode {
        self.chase
    }
}

/// Base guard that only engages critical threats and blows them away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Defender {
    chase: ChaseMode,
}

impl Defender {
    /// Creates a defender profile with the provided chase style.
    #[must_use]
    pub const fn new(chase: ChaseMode) -> Self {
        Self { chase }
    }

    fn zone(arena: &Arena) -> Zone {
        Zone::new(arena.player_base(), ZONE_RADIUS, 1.0)
    }
}

impl HeroProfile for Defender {
    fn archetype(&self) -> Archetype {
        Archetype::Defender
    }

    fn idle_spot(&self, arena: &Arena, _index: usize) -> Vector2Int {
        arena.mirrored(
            Vector2Int::new(X_MIN + DEFENDER_OFFSET, Y_MIN + DEFENDER_OFFSET),
            Vector2Int::new(X_MAX - DEFENDER_OFFSET, Y_MAX - DEFENDER_OFFSET),
        )
    }

    fn should_engage(&self, arena: &Arena) -> bool {
        any_in(arena, Self::zone(arena))
    }

    fn select_target(
        &self,
        targeting: &mut Targeting,
        arena: &Arena,
        _ledger: &TargetLedger,
        _hero: &Hero,
    ) -> Option<EntityId> {
        targeting.most_urgent_in(arena, Self::zone(arena))
    }

    fn cast(&self, context: &CastContext<'_>, target: &EntityState) -> Result<Spell, Refusal> {
        clear_from_base(context, target, WIND_BASE_RADIUS)
    }

    fn chase(&self) -> ChaseMode {
        self.chase
    }
}

/// Midfield rover that chases the nearest relevant creature.
#[derive(Clone, Copy)]
pub struct Attacker {
    chase: ChaseMode,
    volley: VolleyPredicate,
}

impl Attacker {
    /// Creates an attacker profile that never volleys.
    #[must_use]
    pub fn new(chase: ChaseMode) -> Self {
        Self::with_volley(chase, never_volley)
    }

    /// Creates an attacker profile with a custom volley predicate.
    #[must_use]
    pub const fn with_volley(chase: ChaseMode, volley: VolleyPredicate) -> Self {
        Self { chase, volley }
    }

    fn zone(arena: &Arena) -> Zone {
        Zone::new(arena.midpoint(), ZONE_RADIUS, 0.0)
    }
}

impl Default for Attacker {
    fn default() -> Self {
        Self::new(ChaseMode::Direct)
    }
}

impl fmt::Debug for Attacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attacker")
            .field("chase", &self.chase)
            .finish_non_exhaustive()
    }
}

impl HeroProfile for Attacker {
    fn archetype(&self) -> Archetype {
        Archetype::Attacker
    }

    fn idle_spot(&self, arena: &Arena, _index: usize) -> Vector2Int {
        arena.midpoint()
    }

    fn should_engage(&self, arena: &Arena) -> bool {
        any_in(arena, Self::zone(arena))
    }

    fn select_target(
        &self,
        targeting: &mut Targeting,
        arena: &Arena,
        _ledger: &TargetLedger,
        hero: &Hero,
    ) -> Option<EntityId> {
        targeting.nearest_in(arena, Self::zone(arena), hero.position())
    }

    fn cast(&self, context: &CastContext<'_>, _target: &EntityState) -> Result<Spell, Refusal> {
        volley(context, (self.volley)(context.arena, context.caster))
    }

    fn chase(&self) -> ChaseMode {
        self.chase
    }
}

/// One profile per archetype, looked up by each hero every turn.
#[derive(Debug)]
pub struct Profiles {
    balanced: Box<dyn HeroProfile>,
    defender: Box<dyn HeroProfile>,
    attacker: Box<dyn HeroProfile>,
}

impl Profiles {
    /// Builds the stock profiles, all chasing with `chase`.
    #[must_use]
    pub fn new(chase: ChaseMode) -> Self {
        Self {
            balanced: Box::new(Balanced::new(chase)),
            defender: Box::new(Defender::new(chase)),
            attacker: Box::new(Attacker::new(chase)),
        }
    }

    /// Replaces the profile for the archetype `profile` reports.
    #[must_use]
    pub fn with_profile(mut self, profile: Box<dyn HeroProfile>) -> Self {
        match profile.archetype() {
            Archetype::Balanced => self.balanced = profile,
            Archetype::Defender => self.defender = profile,
            Archetype::Attacker => self.attacker = profile,
        }
        self
    }

    /// Profile driving heroes of `archetype`.
    #[must_use]
    pub fn get(&self, archetype: Archetype) -> &dyn HeroProfile {
        match archetype {
            Archetype::Balanced => self.balanced.as_ref(),
            Archetype::Defender => self.defender.as_ref(),
            Archetype::Attacker => self.attacker.as_ref(),
        }
    }
}

impl Default for Profiles {
    fn default() -> Self {
        Self::new(ChaseMode::Direct)
    }
}
