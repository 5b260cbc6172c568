//! Behavioural scenarios for precalculation and replay.
//!
//! Each test builds a runtime with a fixed clock, precalculates or casts a
//! small spell and checks the snapshots and the live state it leaves behind.

use std::sync::Arc;
use std::time::Duration;

use spellcast_core::{
    Action, ActionIndex, Card, DamageAction, Element, ElementSet, FixedClock, GameState, Modifier,
    ModifierAction, StatusEffectAction, StatusEffectDefinition, StatusEffectId, StatusEffects,
    StatusOperation, Timestamp,
};
use spellcast_runtime::{Immediate, Runtime, RuntimeConfig};

fn runtime() -> Runtime {
    let config = RuntimeConfig {
        action_delay: Duration::ZERO,
        ..RuntimeConfig::default()
    };
    Runtime::builder()
        .config(config)
        .clock(Arc::new(FixedClock::at(1_000)))
        .build()
        .expect("runtime should build")
}

fn chill() -> StatusEffectDefinition {
    StatusEffectDefinition::new("chill", 10)
}

fn chilled(stacks: u32) -> GameState {
    let status = StatusEffects::empty()
        .with_stacks(&chill(), stacks, Timestamp::ZERO)
        .expect("stacks within bounds");
    GameState::new().with_status(status)
}

fn single(card: u32, action: Action) -> Card {
    Card::new(card, action.name.clone()).with_action(action)
}

// ================================================================
// A single unmodified damage action
// ================================================================

#[test]
fn single_damage_action_yields_one_unmodified_snapshot() {
    let runtime = runtime();
    let cards = vec![single(
        1,
        Action::damage(10, "Firebolt", DamageAction::flat(10, Element::Fire)),
    )];

    let snapshots = runtime
        .precalculate(&GameState::new(), &cards)
        .expect("precalculation succeeds");

    assert_eq!(snapshots.len(), 1);
    let result = snapshots[0].result();
    assert_eq!(result.final_value, 10);
    assert!(result.consumed_modifiers.is_empty());
    assert!(result.remaining_modifiers.is_empty());
    assert_eq!(snapshots[0].resulting_state().action_index(), ActionIndex(1));
}

// ================================================================
// A consumable fire-only modifier feeds the next fire hit
// ================================================================

#[test]
fn consumable_modifier_is_spent_by_next_matching_hit() {
    let runtime = runtime();
    let kindle = Modifier::additive(5).only(ElementSet::FIRE).consumable();
    let cards = vec![
        single(1, Action::modifier(1, "Kindle", ModifierAction::new(kindle.clone()))),
        single(
            2,
            Action::damage(2, "Firebolt", DamageAction::flat(10, Element::Fire)),
        ),
    ];

    let snapshots = runtime
        .precalculate(&GameState::new(), &cards)
        .expect("precalculation succeeds");

    assert_eq!(snapshots[0].resulting_state().modifiers(), &[kindle.clone()]);

    let hit = snapshots[1].result();
    assert_eq!(hit.final_value, 15);
    assert_eq!(hit.consumed_modifiers, vec![kindle]);
    assert!(hit.remaining_modifiers.is_empty());
    assert!(snapshots[1].resulting_state().modifiers().is_empty());
}

#[test]
fn modifier_for_another_element_survives_the_hit() {
    let runtime = runtime();
    let frost = Modifier::additive(5).only(ElementSet::COLD).consumable();
    let cards = vec![
        single(1, Action::modifier(1, "Frost Edge", ModifierAction::new(frost.clone()))),
        single(
            2,
            Action::damage(2, "Firebolt", DamageAction::flat(10, Element::Fire)),
        ),
    ];

    let snapshots = runtime.precalculate(&GameState::new(), &cards).unwrap();

    let hit = snapshots[1].result();
    assert_eq!(hit.final_value, 10);
    assert!(hit.consumed_modifiers.is_empty());
    assert_eq!(hit.remaining_modifiers, vec![frost]);
}

// ================================================================
// Damage scaled per stack of an effect
// ================================================================

#[test]
fn per_stack_damage_resolves_before_modifiers() {
    let runtime = runtime();
    let cards = vec![single(
        3,
        Action::damage(3, "Ice Shards", DamageAction::per_stack(4, Element::Cold, "chill")),
    )];

    let snapshots = runtime.precalculate(&chilled(3), &cards).unwrap();

    let result = snapshots[0].result();
    assert_eq!(result.raw_value, 12);
    assert_eq!(result.final_value, 12);
    assert_eq!(snapshots[0].resulting_state().spell().damage_of(Element::Cold), 12);
}

// ================================================================
// Setting an effect below its current stacks
// ================================================================

#[test]
fn set_operation_reports_removed_stacks() {
    let runtime = runtime();
    let set = StatusEffectAction::new(StatusOperation::Set {
        effect: chill(),
        stacks: 2,
    });
    let cards = vec![single(4, Action::status(4, "Thaw", set))];

    let snapshots = runtime.precalculate(&chilled(5), &cards).unwrap();

    let id = StatusEffectId::from("chill");
    assert_eq!(snapshots[0].resulting_state().status().stacks_of(&id), 2);
    let change = &snapshots[0].result().status_changes[0];
    assert_eq!(change.effect, id);
    assert_eq!(change.removed(), 3);
    assert_eq!(change.added(), 0);
    assert_eq!(snapshots[0].popup().headline, "Thaw: chill -3 (2)");
}

// ================================================================
// Replay through the pipeline
// ================================================================

#[test]
fn chained_combo_replays_to_precalculated_totals() {
    let mut runtime = runtime();
    let kindle = Modifier::additive(5).only(ElementSet::FIRE).consumable();
    let cards = vec![
        Card::new(1, "Ember Surge")
            .with_action(Action::modifier(1, "Kindle", ModifierAction::new(kindle)))
            .with_action(Action::damage(
                2,
                "Firebolt",
                DamageAction::flat(10, Element::Fire),
            )),
        Card::new(2, "Deep Freeze")
            .with_action(Action::status(
                3,
                "Chill",
                StatusEffectAction::new(StatusOperation::Add {
                    effect: chill(),
                    stacks: 2,
                }),
            ))
            .with_action(Action::damage(
                4,
                "Shatter",
                DamageAction::with_stack_bonus(6, Element::Cold, "chill", 2),
            )),
    ];

    let mut pipeline = runtime.begin_cast(chilled(1), cards);
    let summary = pipeline.run_with(&mut Immediate).expect("cast completes");

    // 10 + 5 fire, then 6 + 2 * 3 cold
    assert!(summary.success);
    assert_eq!(summary.total_damage, 27);
    assert_eq!(summary.popups.len(), 4);
    assert_eq!(summary.popups[1].headline, "Firebolt: 15 fire");

    let state = pipeline.into_state();
    assert!(!state.spell.active);
    assert_eq!(state.active_cast, None);
    assert_eq!(state.status.stacks_of(&StatusEffectId::from("chill")), 3);
    assert_eq!(state.spell.last_record().map(|r| r.total_damage), Some(27));
}
