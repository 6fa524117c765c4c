//! Per-turn record of which hero is locked onto which creature.

use std::collections::BTreeMap;

use arena_warden_core::{EntityId, HeroSlot};

/// Hero currently locked onto a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Claim {
    /// Slot of the claiming hero.
    pub hero: HeroSlot,
    /// Whether the claiming hero cast a spell on the creature this turn.
    pub casting: bool,
}

/// Mapping from creature to the hero targeting it, rebuilt every turn.
///
/// Heroes decide in roster order, so a claim written by an earlier hero is
/// visible to every later hero of the same pass.
#[derive(Clone, Debug, Default)]
pub struct TargetLedger {
    claims: BTreeMap<EntityId, Claim>,
}

impl TargetLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every claim; called at the start of each decision pass.
    pub fn clear(&mut self) {
        self.claims.clear();
    }

    /// Records that `hero` is locked onto `creature`.
    ///
    /// A claim backed by a spell cast this turn is never overwritten by
    /// another hero.
    pub fn claim(&mut self, creature: EntityId, hero: HeroSlot) {
        if let Some(existing) = self.claims.get(&creature) {
            if existing.hero == hero || existing.casting {
                return;
            }
        }
        let _ = self.claims.insert(
            creature,
            Claim {
                hero,
                casting: false,
            },
        );
    }

    /// Records that `hero` cast a spell on `creature` this turn.
    pub fn mark_casting(&mut self, creature: EntityId, hero: HeroSlot) {
        let _ = self.claims.insert(
            creature,
            Claim {
                hero,
                casting: true,
            },
        );
    }

    /// Drops every claim held by `hero`.
    pub fn release(&mut self, hero: HeroSlot) {
        self.claims.retain(|_, claim| claim.hero != hero);
    }

    /// Claim currently recorded for `creature`.
    #[must_use]
    pub fn claim_on(&self, creature: EntityId) -> Option<Claim> {
        self.claims.get(&creature).copied()
    }

    /// Whether a hero other than `hero` is locked onto `creature`.
    #[must_use]
    pub fn is_claimed_by_other(&self, creature: EntityId, hero: HeroSlot) -> bool {
        self.claim_on(creature)
            .is_some_and(|claim| claim.hero != hero)
    }

    /// Whether a hero other than `hero` cast on `creature` this turn.
    #[must_use]
    pub fn is_cast_upon_by_other(&self, creature: EntityId, hero: HeroSlot) -> bool {
        self.claim_on(creature)
            .is_some_and(|claim| claim.casting && claim.hero != hero)
    }

    /// Number of creatures currently claimed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether no creature is claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}
