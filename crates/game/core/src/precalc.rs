//! Ahead-of-time simulation of a whole spell.
//!
//! [`PrecalculationService`] walks the flattened action list once, threading
//! each resulting encounter state into the next action, and returns one
//! [`Snapshot`] per action in play order. It reads nothing but its inputs and
//! the injected clock, so the same inputs always yield the same snapshots.

use std::sync::Arc;

use crate::action::{Action, ActionKey, Card, flatten_cards};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{ErrorSeverity, SpellError};
use crate::logic::{LogicManager, Transition};
use crate::result::{ActionResult, Popup, PrecalcFault};
use crate::snapshot::Snapshot;
use crate::state::{EncounterSections, EncounterState, StateError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PrecalcError {
    #[error("spell has {count} actions (max: {max})")]
    TooManyActions { count: usize, max: usize },

    #[error(transparent)]
    State(#[from] StateError),
}

impl SpellError for PrecalcError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TooManyActions { .. } => ErrorSeverity::Validation,
            Self::State(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyActions { .. } => "PRECALC_TOO_MANY_ACTIONS",
            Self::State(err) => err.error_code(),
        }
    }
}

#[derive(Clone)]
pub struct PrecalculationService {
    logic: LogicManager,
    clock: Arc<dyn Clock>,
}

impl PrecalculationService {
    pub fn new(logic: LogicManager, clock: Arc<dyn Clock>) -> Self {
        Self { logic, clock }
    }

    pub fn with_config(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(LogicManager::new(config), clock)
    }

    pub fn logic(&self) -> &LogicManager {
        &self.logic
    }

    /// Simulates one action against `current` and packages the outcome.
    ///
    /// A simulation failure does not fail the call: the snapshot records a
    /// no-op transition (index advanced, nothing else changed) with the fault
    /// attached to its result.
    pub fn precalculate_action_with_snapshot(
        &self,
        action: &Action,
        current: &EncounterState,
    ) -> Result<Snapshot, PrecalcError> {
        let now = self.clock.now();
        let key = ActionKey::new(action.id, current.action_index());
        let base = current.clone().with_timestamp(now);

        let Transition { result, state } = match self.logic.simulate(action, &base) {
            Ok(transition) => transition,
            Err(err) => Transition {
                result: ActionResult::no_op(base.modifiers(), Some(PrecalcFault::from_error(&err))),
                state: base.advanced()?,
            },
        };

        let popup = Popup::for_result(action, &result);
        Ok(Snapshot::new(key, state, result, popup, now))
    }

    /// Snapshots for every action of `cards`, in card-then-action order.
    ///
    /// The first action is keyed at the live state's current action index and
    /// each following action at the next index.
    pub fn precalculate_spell_with_snapshots<S>(
        &self,
        initial: &S,
        cards: &[Card],
    ) -> Result<Vec<Snapshot>, PrecalcError>
    where
        S: EncounterSections + ?Sized,
    {
        let actions: Vec<&Action> = flatten_cards(cards).collect();
        if actions.len() > EngineConfig::MAX_ACTIONS_PER_CAST {
            return Err(PrecalcError::TooManyActions {
                count: actions.len(),
                max: EngineConfig::MAX_ACTIONS_PER_CAST,
            });
        }

        let mut running = EncounterState::capture(initial, self.clock.now())?;
        running.check_index()?;

        let mut snapshots = Vec::with_capacity(actions.len());
        for action in actions {
            let snapshot = self.precalculate_action_with_snapshot(action, &running)?;
            running = snapshot.resulting_state().clone();
            snapshots.push(snapshot);
        }

        Ok(snapshots)
    }
}

impl core::fmt::Debug for PrecalculationService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrecalculationService")
            .field("logic", &self.logic)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{
        ActionIndex, DamageAction, Element, ModifierAction, StatusEffectAction, StatusOperation,
    };
    use crate::clock::{FixedClock, SteppingClock};
    use crate::modifier::Modifier;
    use crate::state::{GameState, StatusEffectDefinition};

    fn service(clock: impl Clock + 'static) -> PrecalculationService {
        PrecalculationService::with_config(EngineConfig::new(), Arc::new(clock))
    }

    fn firebolt() -> Action {
        Action::damage(1, "Firebolt", DamageAction::flat(10, Element::Fire))
    }

    fn combo() -> Vec<Card> {
        vec![
            Card::new(1, "Kindle").with_action(Action::modifier(
                2,
                "Kindle",
                ModifierAction::new(Modifier::additive(5).only(Element::Fire).consumable()),
            )),
            Card::new(2, "Fire and Ice")
                .with_action(firebolt())
                .with_action(Action::status(
                    3,
                    "Chill",
                    StatusEffectAction::new(StatusOperation::Add {
                        effect: StatusEffectDefinition::new("chill", 5),
                        stacks: 2,
                    }),
                ))
                .with_action(Action::damage(
                    4,
                    "Shatter",
                    DamageAction::with_stack_bonus(6, Element::Cold, "chill", 2),
                )),
        ]
    }

    #[test]
    fn same_input_yields_identical_snapshots() {
        let state = GameState::new();
        let first = service(FixedClock::at(7))
            .precalculate_spell_with_snapshots(&state, &combo())
            .unwrap();
        let second = service(FixedClock::at(7))
            .precalculate_spell_with_snapshots(&state, &combo())
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_clocks_only_change_timestamps() {
        let state = GameState::new();
        let fixed = service(FixedClock::at(0))
            .precalculate_spell_with_snapshots(&state, &combo())
            .unwrap();
        let stepping = service(SteppingClock::new(1_000, 3))
            .precalculate_spell_with_snapshots(&state, &combo())
            .unwrap();

        assert_eq!(fixed.len(), stepping.len());
        assert!(fixed.iter().zip(&stepping).all(|(a, b)| a.same_outcome(b)));
    }

    #[test]
    fn indices_increase_by_one_per_action() {
        let snapshots = service(FixedClock::at(0))
            .precalculate_spell_with_snapshots(&GameState::new(), &combo())
            .unwrap();

        for (i, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.key().index, ActionIndex(i as u32));
            assert_eq!(snapshot.resulting_state().action_index(), ActionIndex(i as u32 + 1));
        }
    }

    #[test]
    fn each_action_sees_the_previous_resulting_state() {
        let snapshots = service(FixedClock::at(0))
            .precalculate_spell_with_snapshots(&GameState::new(), &combo())
            .unwrap();

        assert_eq!(snapshots[1].result().final_value, 15);
        assert!(snapshots[1].resulting_state().modifiers().is_empty());
        assert_eq!(snapshots[3].result().final_value, 10);
        assert_eq!(snapshots[3].resulting_state().total_damage(), 25);
    }

    #[test]
    fn recurring_action_gets_distinct_keys() {
        let cards = vec![Card::new(1, "Twin").with_action(firebolt()).with_action(firebolt())];
        let snapshots = service(FixedClock::at(0))
            .precalculate_spell_with_snapshots(&GameState::new(), &cards)
            .unwrap();
        assert_ne!(snapshots[0].key(), snapshots[1].key());
        assert_eq!(snapshots[0].key().action, snapshots[1].key().action);
    }

    #[test]
    fn failed_simulation_becomes_no_op() {
        let kindled = GameState {
            spell: crate::state::SpellProgress {
                modifiers: vec![Modifier::additive(1)],
                ..Default::default()
            },
            ..GameState::default()
        };
        let bad = Action::damage(9, "Broken", DamageAction::flat(-1, Element::Fire));
        let cards = vec![Card::new(1, "Broken").with_action(bad).with_action(firebolt())];

        let snapshots = service(FixedClock::at(0))
            .precalculate_spell_with_snapshots(&kindled, &cards)
            .unwrap();

        let fault = snapshots[0].result().fault.as_ref().unwrap();
        assert_eq!(fault.code, "LOGIC_NEGATIVE_AMOUNT");
        assert_eq!(snapshots[0].result().remaining_modifiers, vec![Modifier::additive(1)]);
        assert_eq!(snapshots[0].resulting_state().action_index(), ActionIndex(1));
        assert_eq!(snapshots[0].resulting_state().total_damage(), 0);
        assert_eq!(snapshots[1].result().final_value, 11);
    }

    #[test]
    fn oversized_spell_is_rejected() {
        let card = (0..=EngineConfig::MAX_ACTIONS_PER_CAST)
            .fold(Card::new(1, "Huge"), |card, _| card.with_action(firebolt()));
        let err = service(FixedClock::at(0))
            .precalculate_spell_with_snapshots(&GameState::new(), &[card])
            .unwrap_err();
        assert!(matches!(err, PrecalcError::TooManyActions { .. }));
    }
}
