//! Per-action simulation.
//!
//! The [`LogicManager`] is the pure reducer behind precalculation. Given an
//! action and an [`EncounterState`] it produces the [`ActionResult`] and the
//! encounter state that follows it, advancing the action index by exactly
//! one. Status effect transitions live in [`status`].

mod error;
pub mod status;

pub use error::LogicError;
pub use status::StatusTransition;

use crate::action::{Action, ActionKind, DamageAction, ModifierAction, StatusOperation};
use crate::combat::DamageCalculator;
use crate::config::EngineConfig;
use crate::result::{ActionResult, StatusChange, TriggeredEffect};
use crate::state::{DecayMode, EncounterState, PropertyValue, TriggerTiming};

/// Result and follow-up state of one simulated action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub result: ActionResult,
    pub state: EncounterState,
}

/// Encounter-level outcome of a status effect transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusOutcome {
    pub state: EncounterState,
    pub changes: Vec<StatusChange>,
    pub triggered: Vec<TriggeredEffect>,
}

impl StatusOutcome {
    /// Sum of every triggered value.
    pub fn triggered_value(&self) -> i64 {
        self.triggered
            .iter()
            .fold(0i64, |sum, t| sum.saturating_add(t.value))
    }
}

#[derive(Clone, Debug, Default)]
pub struct LogicManager {
    config: EngineConfig,
    damage: DamageCalculator,
}

impl LogicManager {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            damage: DamageCalculator::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn damage(&self) -> &DamageCalculator {
        &self.damage
    }

    /// Result `action` would have against `state`.
    pub fn precalculate_action_result(
        &self,
        action: &Action,
        state: &EncounterState,
    ) -> Result<ActionResult, LogicError> {
        self.simulate(action, state).map(|t| t.result)
    }

    /// Result of `action` against `state` and the state that follows it.
    pub fn simulate(&self, action: &Action, state: &EncounterState) -> Result<Transition, LogicError> {
        let transition = match &action.kind {
            ActionKind::Damage(damage) => self.simulate_damage(action, damage, state)?,
            ActionKind::Modifier(modifier) => self.simulate_modifier(modifier, state)?,
            ActionKind::StatusEffect(status) => self.simulate_status(&status.operation, state)?,
        };

        Ok(Transition {
            state: transition.state.advanced()?,
            result: transition.result,
        })
    }

    fn simulate_damage(
        &self,
        action: &Action,
        damage: &DamageAction,
        state: &EncounterState,
    ) -> Result<Transition, LogicError> {
        if damage.amount < 0 {
            return Err(LogicError::NegativeAmount {
                action: action.id,
                amount: damage.amount,
            });
        }

        let applied = self.damage.apply_damage_modifiers(damage, state);
        let next = state
            .clone()
            .with_modifiers(applied.remaining.clone())?
            .with_damage(applied.final_value, damage.element)
            .with_counter("hits")
            .with_property("last_element", PropertyValue::Text(damage.element.to_string()));

        Ok(Transition {
            result: ActionResult {
                raw_value: applied.raw_value,
                final_value: applied.final_value,
                element: Some(damage.element),
                consumed_modifiers: applied.consumed,
                remaining_modifiers: applied.remaining,
                ..ActionResult::default()
            },
            state: next,
        })
    }

    fn simulate_modifier(
        &self,
        modifier: &ModifierAction,
        state: &EncounterState,
    ) -> Result<Transition, LogicError> {
        let mut remaining = state.modifiers().to_vec();
        remaining.push(modifier.modifier.clone());
        let next = state.clone().with_modifiers(remaining.clone())?;

        Ok(Transition {
            result: ActionResult {
                remaining_modifiers: remaining,
                ..ActionResult::default()
            },
            state: next,
        })
    }

    fn simulate_status(
        &self,
        operation: &StatusOperation,
        state: &EncounterState,
    ) -> Result<Transition, LogicError> {
        let outcome = self.apply_status_effect_to_encounter(state, operation)?;
        let value = outcome.triggered_value();

        Ok(Transition {
            result: ActionResult {
                raw_value: value,
                final_value: value,
                remaining_modifiers: state.modifiers().to_vec(),
                status_changes: outcome.changes,
                triggered: outcome.triggered,
                ..ActionResult::default()
            },
            state: outcome.state,
        })
    }

    /// Applies one status operation to the encounter's status effects.
    pub fn apply_status_effect_to_encounter(
        &self,
        state: &EncounterState,
        operation: &StatusOperation,
    ) -> Result<StatusOutcome, LogicError> {
        let now = state.timestamp();
        let transition = match operation {
            StatusOperation::Add { effect, stacks } => {
                status::add_stacks(state.status(), effect, *stacks, now, &self.config)?
            }
            StatusOperation::Remove { effect, stacks } => {
                status::remove_stacks(state.status(), effect, *stacks, now)?
            }
            StatusOperation::Set { effect, stacks } => {
                status::set_stacks(state.status(), effect, *stacks, now, &self.config)?
            }
            StatusOperation::Trigger(timing) => return self.trigger_effects_in_encounter(state, *timing),
            StatusOperation::Decay(mode) => return self.process_decay_in_encounter(state, *mode),
        };

        Ok(Self::commit(state, transition))
    }

    /// Fires the effects matching `timing`. Triggered values count as damage of
    /// each effect's element.
    pub fn trigger_effects_in_encounter(
        &self,
        state: &EncounterState,
        timing: TriggerTiming,
    ) -> Result<StatusOutcome, LogicError> {
        let transition = status::trigger_effects(state.status(), timing, state.timestamp())?;
        Ok(Self::commit(state, transition))
    }

    pub fn process_decay_in_encounter(
        &self,
        state: &EncounterState,
        mode: DecayMode,
    ) -> Result<StatusOutcome, LogicError> {
        let transition = status::process_decay(state.status(), mode, state.timestamp())?;
        Ok(Self::commit(state, transition))
    }

    fn commit(state: &EncounterState, transition: StatusTransition) -> StatusOutcome {
        let next = transition
            .triggered
            .iter()
            .fold(state.clone().with_status(transition.status), |acc, t| {
                acc.with_damage(t.value, t.element)
            });

        StatusOutcome {
            state: next,
            changes: transition.changes,
            triggered: transition.triggered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionIndex, Element, StatusEffectAction};
    use crate::clock::Timestamp;
    use crate::modifier::Modifier;
    use crate::state::{DecayPolicy, SpellProgress, StatusEffectDefinition, StatusEffects};

    fn state_with(modifiers: Vec<Modifier>, status: StatusEffects) -> EncounterState {
        let spell = SpellProgress {
            modifiers,
            ..SpellProgress::default()
        };
        EncounterState::new(spell, status, Timestamp(0)).unwrap()
    }

    fn firebolt() -> Action {
        Action::damage(1, "Firebolt", DamageAction::flat(10, Element::Fire))
    }

    #[test]
    fn consumable_modifier_applies_once_and_is_removed() {
        let logic = LogicManager::default();
        let boost = Modifier::additive(5).only(Element::Fire).consumable();
        let state = state_with(vec![boost.clone()], StatusEffects::empty());

        let t = logic.simulate(&firebolt(), &state).unwrap();
        assert_eq!(t.result.final_value, 15);
        assert_eq!(t.result.consumed_modifiers, vec![boost]);
        assert!(t.result.remaining_modifiers.is_empty());
        assert!(t.state.modifiers().is_empty());
        assert_eq!(t.state.total_damage(), 15);
        assert_eq!(t.state.action_index(), ActionIndex(1));
    }

    #[test]
    fn non_matching_category_leaves_modifier_in_place() {
        let logic = LogicManager::default();
        let boost = Modifier::additive(5).only(Element::Fire).consumable();
        let state = state_with(vec![boost.clone()], StatusEffects::empty());
        let frost = Action::damage(2, "Frost Shard", DamageAction::flat(8, Element::Cold));

        let t = logic.simulate(&frost, &state).unwrap();
        assert_eq!(t.result.final_value, 8);
        assert!(t.result.consumed_modifiers.is_empty());
        assert_eq!(t.result.remaining_modifiers, vec![boost.clone()]);
        assert_eq!(t.state.modifiers(), &[boost]);
    }

    #[test]
    fn modifier_action_appends_to_active_list() {
        let logic = LogicManager::default();
        let existing = Modifier::additive(1);
        let state = state_with(vec![existing.clone()], StatusEffects::empty());
        let added = Modifier::multiplicative(200).only(Element::Lightning);
        let action = Action::modifier(3, "Overcharge", ModifierAction::new(added.clone()));

        let t = logic.simulate(&action, &state).unwrap();
        assert_eq!(t.result.final_value, 0);
        assert_eq!(t.state.modifiers(), &[existing, added]);
    }

    #[test]
    fn modifier_capacity_is_an_error() {
        let logic = LogicManager::default();
        let full = vec![Modifier::additive(1); EngineConfig::MAX_ACTIVE_MODIFIERS];
        let state = state_with(full, StatusEffects::empty());
        let action = Action::modifier(3, "One more", ModifierAction::new(Modifier::additive(1)));

        let err = logic.simulate(&action, &state).unwrap_err();
        assert!(matches!(err, LogicError::State(crate::state::StateError::ModifierCapacity { .. })));
    }

    #[test]
    fn negative_damage_amount_is_rejected() {
        let logic = LogicManager::default();
        let state = state_with(Vec::new(), StatusEffects::empty());
        let action = Action::damage(4, "Heal?", DamageAction::flat(-3, Element::Arcane));
        assert!(matches!(
            logic.precalculate_action_result(&action, &state),
            Err(LogicError::NegativeAmount { amount: -3, .. })
        ));
    }

    #[test]
    fn damage_sets_hit_properties() {
        let logic = LogicManager::default();
        let state = state_with(Vec::new(), StatusEffects::empty());
        let t = logic.simulate(&firebolt(), &state).unwrap();
        let t = logic.simulate(&firebolt(), &t.state).unwrap();

        assert_eq!(t.state.spell().property("hits"), Some(&PropertyValue::Int(2)));
        assert_eq!(
            t.state.spell().property("last_element"),
            Some(&PropertyValue::Text("fire".into()))
        );
    }

    #[test]
    fn triggered_effects_add_to_running_total() {
        let logic = LogicManager::default();
        let burn = StatusEffectDefinition::new("burn", 5)
            .per_stack(3, Element::Fire)
            .fires_on(TriggerTiming::SpellCast, DecayPolicy::RemoveAll);
        let status = StatusEffects::empty()
            .with_stacks(&burn, 2, Timestamp(0))
            .unwrap();
        let state = state_with(Vec::new(), status);
        let detonate = Action::status(
            5,
            "Detonate",
            StatusEffectAction::new(StatusOperation::Trigger(TriggerTiming::SpellCast)),
        );

        let t = logic.simulate(&detonate, &state).unwrap();
        assert_eq!(t.result.final_value, 6);
        assert_eq!(t.state.total_damage(), 6);
        assert_eq!(t.state.spell().damage_of(Element::Fire), 6);
        assert!(t.state.status().is_empty());
        assert_eq!(t.result.status_changes[0].removed(), 2);
    }

    #[test]
    fn input_state_is_not_modified() {
        let logic = LogicManager::default();
        let state = state_with(vec![Modifier::additive(5).consumable()], StatusEffects::empty());
        let before = state.clone();
        let _ = logic.simulate(&firebolt(), &state).unwrap();
        assert_eq!(state, before);
    }
}
