#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that ranks visible creatures and picks hero targets.

mod ledger;

use std::cmp::Ordering;

use arena_warden_core::{EntityId, HeroSlot, Vector2Int};
use arena_warden_world::{Arena, Creature};

pub use ledger::{Claim, TargetLedger};

/// Circular region of interest with a minimum threat priority.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zone {
    /// Centre of the region.
    pub anchor: Vector2Int,
    /// Creatures must be strictly closer than this to the anchor.
    pub radius: f64,
    /// Creatures must score strictly above this priority.
    pub min_priority: f64,
}

impl Zone {
    /// Creates a new zone.
    #[must_use]
    pub const fn new(anchor: Vector2Int, radius: f64, min_priority: f64) -> Self {
        Self {
            anchor,
            radius,
            min_priority,
        }
    }

    /// Whether `creature` qualifies for this zone.
    #[must_use]
    pub fn contains(&self, creature: &Creature) -> bool {
        creature.threat_priority() > self.min_priority
            && creature.position().distance(self.anchor) < self.radius
    }
}

/// Target selection system that reuses a scratch buffer between heroes.
#[derive(Debug, Default)]
pub struct Targeting {
    candidates: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the most urgent creature anywhere in the arena for `hero`.
    ///
    /// Creatures are ranked by descending threat priority, ties broken by
    /// ascending id. When the top candidate is already claimed by another
    /// hero and a runner-up exists, the runner-up is chosen instead; a lone
    /// candidate is chosen even if claimed.
    pub fn most_urgent(
        &mut self,
        arena: &Arena,
        ledger: &TargetLedger,
        hero: HeroSlot,
    ) -> Option<EntityId> {
        self.prepare(arena);
        self.candidates.sort_by(Candidate::by_priority);

        let first = self.candidates.first()?;
        match self.candidates.get(1) {
            Some(second) if ledger.is_claimed_by_other(first.id, hero) => {
                tracing::trace!(
                    hero = hero.index(),
                    skipped = first.id.get(),
                    chosen = second.id.get(),
                    "top candidate already claimed"
                );
                Some(second.id)
            }
            _ => Some(first.id),
        }
    }

    /// Picks the highest-priority creature inside `zone`.
    pub fn most_urgent_in(&mut self, arena: &Arena, zone: Zone) -> Option<EntityId> {
        self.prepare(arena);
        self.candidates
            .iter()
            .filter(|candidate| candidate.in_zone(zone))
            .min_by(|left, right| Candidate::by_priority(left, right))
            .map(|candidate| candidate.id)
    }

    /// Picks the creature inside `zone` that is nearest to `from`.
    pub fn nearest_in(&mut self, arena: &Arena, zone: Zone, from: Vector2Int) -> Option<EntityId> {
        self.prepare(arena);
        self.candidates
            .iter()
            .filter(|candidate| candidate.in_zone(zone))
            .min_by(|left, right| {
                let left_distance = left.position.distance(from);
                let right_distance = right.position.distance(from);
                left_distance
                    .total_cmp(&right_distance)
                    .then_with(|| left.id.cmp(&right.id))
            })
            .map(|candidate| candidate.id)
    }

    fn prepare(&mut self, arena: &Arena) {
        self.candidates.clear();
        self.candidates.reserve(arena.creature_count());
        self.candidates.extend(arena.creatures().map(|creature| Candidate {
            id: creature.id(),
            position: creature.position(),
            priority: creature.threat_priority(),
        }));
    }
}

/// Reports whether any creature qualifies for `zone`.
#[must_use]
pub fn any_in(arena: &Arena, zone: Zone) -> bool {
    arena.creatures().any(|creature| zone.contains(creature))
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EntityId,
    position: Vector2Int,
    priority: f64,
}

impl Candidate {
    fn by_priority(left: &Self, right: &Self) -> Ordering {
        right
            .priority
            .total_cmp(&left.priority)
            .then_with(|| left.id.cmp(&right.id))
    }

    fn in_zone(&self, zone: Zone) -> bool {
        self.priority > zone.min_priority && self.position.distance(zone.anchor) < zone.radius
    }
}
