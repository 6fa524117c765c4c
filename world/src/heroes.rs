//! Heroes and the rosters that own them.

use std::collections::BTreeMap;

use arena_warden_core::{
    Archetype, EntityId, EntityKind, EntitySnapshot, HeroSlot, StateKind, Team, Vector2Int,
};

use crate::{EntityState, IngestError};

/// Controllable agent owned by a roster.
///
/// A hero starts with a negative placeholder id and is rebound to its arena
/// id the first time it is sighted. Its behavior state and the target its
/// pursue state remembers live here for the whole match.
#[derive(Clone, Debug, PartialEq)]
pub struct Hero {
    slot: HeroSlot,
    archetype: Archetype,
    archetype_index: usize,
    team: Team,
    entity: EntityState,
    is_casting: bool,
    state: Option<StateKind>,
    pursuit_target: Option<EntityId>,
}

impl Hero {
    fn new(slot: HeroSlot, archetype: Archetype, team: Team) -> Self {
        let kind = match team {
            Team::Opponent => EntityKind::OpponentHero,
            Team::Player | Team::Neutral => EntityKind::PlayerHero,
        };
        Self {
            slot,
            archetype,
            archetype_index: slot.index(),
            team,
            entity: EntityState::placeholder(EntityId::placeholder(slot.index()), kind),
            is_casting: false,
            state: None,
            pursuit_target: None,
        }
    }

    /// Stable roster slot of the hero.
    #[must_use]
    pub const fn slot(&self) -> HeroSlot {
        self.slot
    }

    /// Behavioral profile assigned at creation.
    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Index selecting the hero's idle spot within its archetype.
    #[must_use]
    pub const fn archetype_index(&self) -> usize {
        self.archetype_index
    }

    /// Side the hero fights for.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Shared entity attributes.
    #[must_use]
    pub const fn entity(&self) -> &EntityState {
        &self.entity
    }

    /// Arena identifier, or the placeholder if the hero was never sighted.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.entity.id()
    }

    /// Current position of the hero.
    #[must_use]
    pub const fn position(&self) -> Vector2Int {
        self.entity.position()
    }

    /// Whether the hero issued a spell during the current turn.
    #[must_use]
    pub const fn is_casting(&self) -> bool {
        self.is_casting
    }

    /// Marks whether the hero cast a spell this turn.
    pub fn set_casting(&mut self, casting: bool) {
        self.is_casting = casting;
    }

    /// Current behavior state, `None` before the first decision.
    #[must_use]
    pub const fn state(&self) -> Option<StateKind> {
        self.state
    }

    /// Replaces the current behavior state.
    pub fn set_state(&mut self, state: StateKind) {
        self.state = Some(state);
    }

    /// Creature the pursue state locked onto during its last update.
    #[must_use]
    pub const fn pursuit_target(&self) -> Option<EntityId> {
        self.pursuit_target
    }

    /// Records the creature the pursue state is chasing.
    pub fn set_pursuit_target(&mut self, target: Option<EntityId>) {
        self.pursuit_target = target;
    }
}

/// Ordered set of heroes owned by one side.
#[derive(Clone, Debug)]
pub struct Roster {
    team: Team,
    heroes: Vec<Hero>,
    slots_by_id: BTreeMap<EntityId, HeroSlot>,
}

impl Roster {
    /// Builds a roster with one placeholder hero per archetype, in order.
    #[must_use]
    pub fn new(team: Team, archetypes: &[Archetype]) -> Self {
        let heroes: Vec<Hero> = archetypes
            .iter()
            .enumerate()
            .map(|(index, archetype)| {
                let slot = HeroSlot::new(u32::try_from(index).unwrap_or(u32::MAX));
                Hero::new(slot, *archetype, team)
            })
            .collect();
        let slots_by_id = heroes.iter().map(|hero| (hero.id(), hero.slot())).collect();
        Self {
            team,
            heroes,
            slots_by_id,
        }
    }

    /// Side owning the roster.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Heroes in roster order.
    #[must_use]
    pub fn heroes(&self) -> &[Hero] {
        &self.heroes
    }

    /// Mutable access to the heroes in roster order.
    pub fn heroes_mut(&mut self) -> &mut [Hero] {
        &mut self.heroes
    }

    /// Hero occupying `slot`.
    #[must_use]
    pub fn hero(&self, slot: HeroSlot) -> Option<&Hero> {
        self.heroes.get(slot.index())
    }

    /// Mutable access to the hero occupying `slot`.
    pub fn hero_mut(&mut self, slot: HeroSlot) -> Option<&mut Hero> {
        self.heroes.get_mut(slot.index())
    }

    /// Slot currently bound to the arena id `id`.
    #[must_use]
    pub fn slot_of(&self, id: EntityId) -> Option<HeroSlot> {
        self.slots_by_id.get(&id).copied()
    }

    /// Number of heroes in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heroes.len()
    }

    /// Reports whether the roster holds no heroes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }

    /// Refreshes the hero sighted in `snapshot`.
    ///
    /// Known ids are refreshed in place. An unknown id claims the first slot
    /// still carrying a placeholder, in roster order, and the claimed slot is
    /// returned so callers can announce the binding. An unknown id with no
    /// placeholder left is a data inconsistency.
    pub(crate) fn sight(&mut self, snapshot: &EntitySnapshot) -> Result<Option<HeroSlot>, IngestError> {
        if let Some(slot) = self.slot_of(snapshot.id) {
            if let Some(hero) = self.hero_mut(slot) {
                hero.entity.refresh(snapshot);
            }
            return Ok(None);
        }

        let Some(hero) = self.heroes.iter_mut().find(|hero| hero.id().is_placeholder()) else {
            return Err(IngestError::UnknownHero {
                team: self.team,
                id: snapshot.id,
            });
        };

        let placeholder = hero.id();
        let slot = hero.slot;
        hero.entity.refresh(snapshot);
        let _ = self.slots_by_id.remove(&placeholder);
        let _ = self.slots_by_id.insert(snapshot.id, slot);
        Ok(Some(slot))
    }
}
