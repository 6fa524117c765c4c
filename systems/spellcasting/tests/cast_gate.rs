use arena_warden_core::{
    Archetype, EntityId, EntityKind, EntitySnapshot, HeroSlot, Spell, ThreatSide, TurnSnapshot,
    UserResources, Vector2Int,
};
use arena_warden_system_spellcasting::{
    clear_from_base, redirect_toward_opponent, shield, volley, CastContext, Refusal,
};
use arena_warden_system_targeting::TargetLedger;
use arena_warden_world::{self as world, query, World};

const CREATURE: EntityId = EntityId::new(30);

fn hero_at(x: i32, y: i32) -> EntitySnapshot {
    EntitySnapshot {
        id: EntityId::new(0),
        kind: EntityKind::PlayerHero,
        position: Vector2Int::new(x, y),
        shield_rounds: 0,
        is_controlled: false,
        health: 0,
        trajectory: Vector2Int::ZERO,
        near_base: false,
        threat_for: ThreatSide::None,
    }
}

fn creature_at(x: i32, y: i32) -> EntitySnapshot {
    EntitySnapshot {
        id: CREATURE,
        kind: EntityKind::Creature,
        position: Vector2Int::new(x, y),
        shield_rounds: 0,
        is_controlled: false,
        health: 12,
        trajectory: Vector2Int::new(-300, -200),
        near_base: true,
        threat_for: ThreatSide::Player,
    }
}

fn world_with(hero: EntitySnapshot, creature: EntitySnapshot) -> World {
    let mut world = World::new(
        Vector2Int::new(0, 0),
        &[Archetype::Balanced],
        &[Archetype::Balanced],
    );
    let snapshot = TurnSnapshot {
        player: UserResources {
            health: 3,
            mana: 50,
        },
        opponent: UserResources::default(),
        entities: vec![hero, creature],
    };
    let mut events = Vec::new();
    world::apply(&mut world, &snapshot, &mut events).expect("snapshot ingests");
    world
}

fn decide<F>(world: &World, ledger: &TargetLedger, mana: i32, decision: F) -> Result<Spell, Refusal>
where
    F: Fn(&CastContext<'_>, &arena_warden_world::EntityState) -> Result<Spell, Refusal>,
{
    let arena = query::arena(world);
    let caster = &query::player(world).roster().heroes()[0];
    let context = CastContext {
        arena,
        ledger,
        caster,
        mana,
    };
    let target = arena.creature(CREATURE).expect("creature present");
    decision(&context, target.entity())
}

#[test]
fn control_sends_a_nearby_threat_toward_the_opponent() {
    let world = world_with(hero_at(2_000, 2_000), creature_at(3_000, 2_500));
    let ledger = TargetLedger::new();

    let spell = decide(&world, &ledger, 50, |context, target| {
        redirect_toward_opponent(context, target, 5_000.0)
    });
    assert_eq!(
        spell,
        Ok(Spell::Control {
            target: CREATURE,
            direction: Vector2Int::new(14_630, 6_500),
        })
    );
}

#[test]
fn control_requires_mana() {
    let world = world_with(hero_at(2_000, 2_000), creature_at(3_000, 2_500));
    let ledger = TargetLedger::new();

    let spell = decide(&world, &ledger, 9, |context, target| {
        redirect_toward_opponent(context, target, 5_000.0)
    });
    assert_eq!(spell, Err(Refusal::InsufficientMana));
}

#[test]
fn shielded_and_controlled_targets_are_refused() {
    let ledger = TargetLedger::new();

    let mut shielded = creature_at(3_000, 2_500);
    shielded.shield_rounds = 4;
    let world = world_with(hero_at(2_000, 2_000), shielded);
    let spell = decide(&world, &ledger, 50, |context, target| {
        redirect_toward_opponent(context, target, 5_000.0)
    });
    assert_eq!(spell, Err(Refusal::Shielded));

    let mut controlled = creature_at(3_000, 2_500);
    controlled.is_controlled = true;
    let world = world_with(hero_at(2_000, 2_000), controlled);
    let spell = decide(&world, &ledger, 50, |context, target| {
        redirect_toward_opponent(context, target, 5_000.0)
    });
    assert_eq!(spell, Err(Refusal::CrowdControlled));
}

#[test]
fn control_respects_range_and_base_distance() {
    let ledger = TargetLedger::new();

    let world = world_with(hero_at(2_000, 2_000), creature_at(4_500, 2_000));
    let spell = decide(&world, &ledger, 50, |context, target| {
        redirect_toward_opponent(context, target, 5_000.0)
    });
    assert_eq!(spell, Err(Refusal::OutOfRange));

    let world = world_with(hero_at(4_000, 2_000), creature_at(5_000, 2_000));
    let spell = decide(&world, &ledger, 50, |context, target| {
        redirect_toward_opponent(context, target, 5_000.0)
    });
    assert_eq!(spell, Err(Refusal::Situational));
}

#[test]
fn another_heros_cast_blocks_a_second_cast() {
    let world = world_with(hero_at(2_000, 2_000), creature_at(3_000, 2_500));
    let mut ledger = TargetLedger::new();
    ledger.mark_casting(CREATURE, HeroSlot::new(1));

    let spell = decide(&world, &ledger, 50, |context, target| {
        redirect_toward_opponent(context, target, 5_000.0)
    });
    assert_eq!(spell, Err(Refusal::AlreadyCastUpon));
}

#[test]
fn wind_clears_creatures_behind_the_defender() {
    let world = world_with(hero_at(2_000, 2_000), creature_at(1_500, 1_200));
    let ledger = TargetLedger::new();

    let spell = decide(&world, &ledger, 50, |context, target| {
        clear_from_base(context, target, 4_000.0)
    });
    assert_eq!(
        spell,
        Ok(Spell::Wind {
            direction: Vector2Int::new(15_630, 7_000),
        })
    );
}

#[test]
fn wind_is_held_for_creatures_ahead_or_far_from_base() {
    let ledger = TargetLedger::new();

    let world = world_with(hero_at(2_000, 2_000), creature_at(2_500, 2_500));
    let spell = decide(&world, &ledger, 50, |context, target| {
        clear_from_base(context, target, 4_000.0)
    });
    assert_eq!(spell, Err(Refusal::Situational));

    let world = world_with(hero_at(4_000, 3_000), creature_at(3_500, 2_500));
    let spell = decide(&world, &ledger, 50, |context, target| {
        clear_from_base(context, target, 4_000.0)
    });
    assert_eq!(spell, Err(Refusal::Situational));
}

#[test]
fn volley_is_gated_by_its_predicate_and_mana() {
    let world = world_with(hero_at(9_000, 4_000), creature_at(9_500, 4_200));
    let ledger = TargetLedger::new();

    assert_eq!(
        decide(&world, &ledger, 50, |context, _| volley(context, false)),
        Err(Refusal::Situational)
    );
    assert_eq!(
        decide(&world, &ledger, 0, |context, _| volley(context, true)),
        Err(Refusal::InsufficientMana)
    );
    assert_eq!(
        decide(&world, &ledger, 50, |context, _| volley(context, true)),
        Ok(Spell::Wind {
            direction: Vector2Int::new(8_630, 5_000),
        })
    );
}

#[test]
fn shield_targets_the_requested_entity() {
    let world = world_with(hero_at(2_000, 2_000), creature_at(3_000, 2_500));
    let ledger = TargetLedger::new();

    let spell = decide(&world, &ledger, 50, |context, target| shield(context, target));
    assert_eq!(spell, Ok(Spell::Shield { target: CREATURE }));
}
