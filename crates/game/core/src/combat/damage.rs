//! Damage calculation and modifier application.

use crate::action::{DamageAction, DamageScaling};
use crate::modifier::Modifier;
use crate::state::EncounterState;

/// Result of running a damage action through the active modifiers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifierApplication {
    pub raw_value: i64,
    pub final_value: i64,
    pub consumed: Vec<Modifier>,
    pub remaining: Vec<Modifier>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DamageCalculator;

impl DamageCalculator {
    pub const fn new() -> Self {
        Self
    }

    /// Unmodified damage of `action` against `state`.
    ///
    /// # Formula
    ///
    /// ```text
    /// Flat:       amount
    /// PerStack:   amount × stacks(effect)
    /// StackBonus: amount + per_stack × stacks(effect)
    /// ```
    pub fn raw_damage(&self, action: &DamageAction, state: &EncounterState) -> i64 {
        match &action.scaling {
            DamageScaling::Flat => action.amount,
            DamageScaling::PerStack { effect } => {
                let stacks = i64::from(state.status().stacks_of(effect));
                action.amount.saturating_mul(stacks)
            }
            DamageScaling::StackBonus { effect, per_stack } => {
                let stacks = i64::from(state.status().stacks_of(effect));
                action.amount.saturating_add(per_stack.saturating_mul(stacks))
            }
        }
    }

    /// Applies the active modifiers of `state` to `action`.
    ///
    /// Modifiers whose category and conditions accept the action are applied in
    /// list order. Applied consumables are moved to `consumed`; every other
    /// modifier stays in `remaining` in its original order. The final value is
    /// clamped at zero.
    pub fn apply_damage_modifiers(
        &self,
        action: &DamageAction,
        state: &EncounterState,
    ) -> ModifierApplication {
        let raw_value = self.raw_damage(action, state);
        let mut value = raw_value;
        let mut consumed = Vec::new();
        let mut remaining = Vec::with_capacity(state.modifiers().len());

        for modifier in state.modifiers() {
            if !modifier.accepts(action.element, raw_value, state.status()) {
                remaining.push(modifier.clone());
                continue;
            }
            value = modifier.apply(value);
            if modifier.consumable {
                consumed.push(modifier.clone());
            } else {
                remaining.push(modifier.clone());
            }
        }

        ModifierApplication {
            raw_value,
            final_value: value.max(0),
            consumed,
            remaining,
        }
    }
}
