//! Creature state tracked across turns.

use std::collections::BTreeMap;

use arena_warden_core::{
    EntityId, EntityKind, EntitySnapshot, ThreatSide, Vector2Int, DISTANCE_BETWEEN_BASES,
};

use crate::EntityState;

/// Priority assigned to creatures that only threaten the opponent.
pub const IGNORED_PRIORITY: f64 = -1.0;

/// Computes the threat priority of a creature from its side and distance to
/// the player's base.
///
/// Creatures heading for the opponent only are never worth chasing and score
/// [`IGNORED_PRIORITY`]. Everything else scores its side ordinal plus a
/// proximity bonus in `[0, 1]` that grows as the creature closes in.
#[must_use]
pub fn threat_priority(side: ThreatSide, distance_to_player_base: f64) -> f64 {
    if side == ThreatSide::Opponent {
        return IGNORED_PRIORITY;
    }

    let normalized = distance_to_player_base / DISTANCE_BETWEEN_BASES;
    f64::from(side.ordinal()) + (1.0 - normalized)
}

/// Neutral or hostile entity roaming the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Creature {
    entity: EntityState,
    max_health: i32,
    has_base_target: bool,
    threat_side: ThreatSide,
    threat_priority: f64,
}

impl Creature {
    pub(crate) fn sighted(snapshot: &EntitySnapshot, player_base: Vector2Int) -> Self {
        let mut creature = Self {
            entity: EntityState::from_snapshot(snapshot),
            max_health: snapshot.health,
            has_base_target: snapshot.near_base,
            threat_side: snapshot.threat_for,
            threat_priority: 0.0,
        };
        creature.recompute_priority(player_base);
        creature
    }

    pub(crate) fn refresh(&mut self, snapshot: &EntitySnapshot, player_base: Vector2Int) {
        self.entity.refresh(snapshot);
        self.has_base_target = snapshot.near_base;
        self.threat_side = snapshot.threat_for;
        self.recompute_priority(player_base);
    }

    fn recompute_priority(&mut self, player_base: Vector2Int) {
        let distance = self.entity.position().distance(player_base);
        self.threat_priority = threat_priority(self.threat_side, distance);
    }

    /// Shared entity attributes.
    #[must_use]
    pub const fn entity(&self) -> &EntityState {
        &self.entity
    }

    /// Arena identifier of the creature.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.entity.id()
    }

    /// Current position of the creature.
    #[must_use]
    pub const fn position(&self) -> Vector2Int {
        self.entity.position()
    }

    /// Health recorded when the creature was first sighted.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Fraction of health remaining, in `[0, 1]` for a healthy record.
    #[must_use]
    pub fn health_percent(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        f64::from(self.entity.health()) / f64::from(self.max_health)
    }

    /// Whether the creature is locked onto a base.
    #[must_use]
    pub const fn has_base_target(&self) -> bool {
        self.has_base_target
    }

    /// Base the creature is heading for.
    #[must_use]
    pub const fn threat_side(&self) -> ThreatSide {
        self.threat_side
    }

    /// Urgency score recomputed on every update; higher is more urgent.
    #[must_use]
    pub const fn threat_priority(&self) -> f64 {
        self.threat_priority
    }
}

/// Registry of the creatures visible during the latest turn.
#[derive(Debug, Default)]
pub(crate) struct CreatureRegistry {
    entries: BTreeMap<EntityId, Creature>,
}

impl CreatureRegistry {
    /// Inserts or refreshes a creature, reporting whether it is new.
    pub(crate) fn upsert(&mut self, snapshot: &EntitySnapshot, player_base: Vector2Int) -> bool {
        debug_assert_eq!(snapshot.kind, EntityKind::Creature);
        if let Some(existing) = self.entries.get_mut(&snapshot.id) {
            existing.refresh(snapshot, player_base);
            return false;
        }

        let _ = self
            .entries
            .insert(snapshot.id, Creature::sighted(snapshot, player_base));
        true
    }

    /// Removes every creature whose id is not in `seen`, returning the removed ids.
    pub(crate) fn retain_seen(&mut self, seen: &[EntityId]) -> Vec<EntityId> {
        let stale: Vec<EntityId> = self
            .entries
            .keys()
            .copied()
            .filter(|id| !seen.contains(id))
            .collect();
        for id in &stale {
            let _ = self.entries.remove(id);
        }
        stale
    }

    pub(crate) fn get(&self, id: EntityId) -> Option<&Creature> {
        self.entries.get(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
