//! Idle and Pursue states shared by every hero.

use arena_warden_core::{Action, EntityId, HeroOrder, HeroSlot, Spell, StateKind};
use arena_warden_system_command_budget::CommandBudget;
use arena_warden_system_interception::intercept;
use arena_warden_system_spellcasting::CastContext;
use arena_warden_system_targeting::{TargetLedger, Targeting};
use arena_warden_world::{Arena, Hero, User};

use crate::profile::{ChaseMode, HeroProfile};

const MAX_TRANSITIONS: usize = 2;

/// Mutable collaborators a single hero step reads and writes.
pub(crate) struct Turn<'a> {
    pub(crate) arena: &'a Arena,
    pub(crate) ledger: &'a mut TargetLedger,
    pub(crate) targeting: &'a mut Targeting,
    pub(crate) budget: &'a mut CommandBudget,
    pub(crate) out: &'a mut Vec<HeroOrder>,
}

/// Outcome of one state update.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    Act(Action),
    Cast { spell: Spell, target: EntityId },
    Transition(StateKind),
}

/// Drives one hero through a single state-machine step.
///
/// Emits at most one order through the budget.
pub(crate) fn process(
    turn: &mut Turn<'_>,
    user: &mut User,
    slot: HeroSlot,
    profile: &dyn HeroProfile,
) {
    let Some(hero) = user.roster_mut().hero_mut(slot) else {
        return;
    };
    hero.set_casting(false);
    let mut state = match hero.state() {
        Some(state) => state,
        None => {
            hero.set_state(StateKind::Idle);
            on_enter(hero, None, StateKind::Idle);
            StateKind::Idle
        }
    };

    let mut transitions = 0;
    let step = loop {
        match update(turn, user, slot, profile, state) {
            Step::Transition(next) if next == state => break Step::Act(Action::Wait),
            Step::Transition(next) => {
                if transitions == MAX_TRANSITIONS {
                    tracing::warn!(
                        hero = slot.index(),
                        state = ?state,
                        requested = ?next,
                        "transition limit reached, waiting this turn"
                    );
                    break Step::Act(Action::Wait);
                }
                transitions += 1;
                transition(turn, user, slot, state, next);
                state = next;
            }
            step => break step,
        }
    };

    emit(turn, user, slot, step);
}

fn transition(turn: &mut Turn<'_>, user: &mut User, slot: HeroSlot, from: StateKind, to: StateKind) {
    let Some(hero) = user.roster_mut().hero_mut(slot) else {
        return;
    };
    on_exit(turn, hero, from);
    hero.set_state(to);
    on_enter(hero, Some(from), to);
}

fn on_enter(hero: &Hero, from: Option<StateKind>, to: StateKind) {
    tracing::debug!(
        hero = hero.slot().index(),
        archetype = hero.archetype().name(),
        from = ?from,
        to = ?to,
        "state entered"
    );
}

fn on_exit(turn: &mut Turn<'_>, hero: &mut Hero, state: StateKind) {
    if state == StateKind::Pursue {
        if let Some(target) = hero.pursuit_target() {
            tracing::debug!(
                hero = hero.slot().index(),
                target = target.get(),
                "pursuit abandoned"
            );
        }
        hero.set_pursuit_target(None);
        turn.ledger.release(hero.slot());
    }
}

fn update(
    turn: &mut Turn<'_>,
    user: &mut User,
    slot: HeroSlot,
    profile: &dyn HeroProfile,
    state: StateKind,
) -> Step {
    match state {
        StateKind::Idle => update_idle(turn.arena, user, slot, profile),
        StateKind::Pursue => update_pursue(turn, user, slot, profile),
    }
}

fn update_idle(arena: &Arena, user: &User, slot: HeroSlot, profile: &dyn HeroProfile) -> Step {
    if profile.should_engage(arena) {
        return Step::Transition(StateKind::Pursue);
    }
    let Some(hero) = user.roster().hero(slot) else {
        return Step::Act(Action::Wait);
    };
    let spot = profile.idle_spot(arena, hero.archetype_index());
    if hero.position() == spot {
        Step::Act(Action::Wait)
    } else {
        Step::Act(Action::Move { position: spot })
    }
}

fn update_pursue(
    turn: &mut Turn<'_>,
    user: &mut User,
    slot: HeroSlot,
    profile: &dyn HeroProfile,
) -> Step {
    let arena = turn.arena;
    if !arena.has_creatures() {
        return Step::Transition(StateKind::Idle);
    }
    let Some(hero) = user.roster().hero(slot) else {
        return Step::Act(Action::Wait);
    };
    let Some(creature) = profile
        .select_target(turn.targeting, arena, turn.ledger, hero)
        .and_then(|id| arena.creature(id))
    else {
        return Step::Transition(StateKind::Idle);
    };
    let target = creature.id();
    if hero.pursuit_target() != Some(target) {
        tracing::debug!(
            hero = slot.index(),
            previous = ?hero.pursuit_target(),
            target = target.get(),
            "pursuit target selected"
        );
    }
    turn.ledger.claim(target, slot);

    let context = CastContext {
        arena,
        ledger: &*turn.ledger,
        caster: hero,
        mana: user.mana(),
    };
    let step = match profile.cast(&context, creature.entity()) {
        Ok(spell) => Step::Cast { spell, target },
        Err(refusal) => {
            tracing::trace!(
                hero = slot.index(),
                target = target.get(),
                refusal = ?refusal,
                "cast refused"
            );
            let position = match profile.chase() {
                ChaseMode::Direct => creature.position(),
                ChaseMode::Intercept => intercept(
                    hero.position(),
                    hero.entity().speed(),
                    creature.position(),
                    creature.entity().trajectory(),
                )
                .point(),
            };
            Step::Act(Action::Move { position })
        }
    };

    if let Some(hero) = user.roster_mut().hero_mut(slot) {
        hero.set_pursuit_target(Some(target));
    }
    step
}

fn emit(turn: &mut Turn<'_>, user: &mut User, slot: HeroSlot, step: Step) {
    match step {
        Step::Act(action) => {
            let _ = turn.budget.issue(HeroOrder { hero: slot, action }, turn.out);
        }
        Step::Cast { spell, target } => {
            let order = HeroOrder {
                hero: slot,
                action: Action::Cast { spell },
            };
            if !turn.budget.issue(order, turn.out) {
                return;
            }
            user.spend_mana(spell.kind().cost());
            turn.ledger.mark_casting(target, slot);
            if let Some(hero) = user.roster_mut().hero_mut(slot) {
                hero.set_casting(true);
            }
        }
        Step::Transition(_) => {}
    }
}
