#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-turn decision pass driving every hero through its Idle/Pursue states.
//!
//! Each hero owns its current state; its archetype profile supplies the
//! idle spot, the engagement predicate, target selection and the cast gate.
//! The pass owns the per-turn target ledger and command budget, so heroes
//! later in roster order observe the claims and spending of earlier ones.

mod machine;
mod profile;

use arena_warden_core::{Archetype, HeroOrder, HeroSlot};
use arena_warden_system_command_budget::CommandBudget;
use arena_warden_system_targeting::{TargetLedger, Targeting};
use arena_warden_world::{Arena, User, World};

use machine::Turn;

pub use profile::{
    never_volley, Attacker, Balanced, ChaseMode, Defender, HeroProfile, Profiles, VolleyPredicate,
};

/// Decision system that turns the updated world into hero orders.
#[derive(Debug, Default)]
pub struct DecisionPass {
    ledger: TargetLedger,
    targeting: Targeting,
    budget: CommandBudget,
    profiles: Profiles,
    order: Vec<(HeroSlot, Archetype)>,
}

impl DecisionPass {
    /// Creates a decision pass using the provided archetype profiles.
    #[must_use]
    pub fn new(profiles: Profiles) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    /// Replaces the per-turn command budget.
    #[must_use]
    pub fn with_budget(mut self, budget: CommandBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Decides one action per player hero, in roster order.
    ///
    /// The budget and the ledger are reset before the first hero decides.
    pub fn run(&mut self, world: &mut World, out: &mut Vec<HeroOrder>) {
        self.budget.reset();
        self.ledger.clear();

        let (arena, user) = world.decision_view_mut();
        self.order.clear();
        self.order.extend(
            user.roster()
                .heroes()
                .iter()
                .map(|hero| (hero.slot(), hero.archetype())),
        );

        let order = std::mem::take(&mut self.order);
        for &(slot, archetype) in &order {
            self.process(arena, user, slot, archetype, out);
        }
        self.order = order;
    }

    /// Runs one state-machine step for the hero in `slot`.
    ///
    /// Emits at most one order into `out`, subject to the remaining budget.
    pub fn process(
        &mut self,
        arena: &Arena,
        user: &mut User,
        slot: HeroSlot,
        archetype: Archetype,
        out: &mut Vec<HeroOrder>,
    ) {
        let mut turn = Turn {
            arena,
            ledger: &mut self.ledger,
            targeting: &mut self.targeting,
            budget: &mut self.budget,
            out,
        };
        machine::process(&mut turn, user, slot, self.profiles.get(archetype));
    }

    /// Claims recorded during the last pass.
    #[must_use]
    pub const fn ledger(&self) -> &TargetLedger {
        &self.ledger
    }

    /// Budget state after the last pass.
    #[must_use]
    pub const fn budget(&self) -> &CommandBudget {
        &self.budget
    }
}
