use crate::action::Element;
use crate::modifier::Modifier;
use crate::state::{DecayMode, StatusEffectDefinition, StatusEffectId, TriggerTiming};

/// Deals damage of one element.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageAction {
    pub amount: i64,
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scaling: DamageScaling,
}

impl DamageAction {
    pub fn flat(amount: i64, element: Element) -> Self {
        Self {
            amount,
            element,
            scaling: DamageScaling::Flat,
        }
    }

    /// `amount` for every stack of `effect`.
    pub fn per_stack(amount: i64, element: Element, effect: impl Into<StatusEffectId>) -> Self {
        Self {
            amount,
            element,
            scaling: DamageScaling::PerStack {
                effect: effect.into(),
            },
        }
    }

    /// `amount` plus `per_stack` for every stack of `effect`.
    pub fn with_stack_bonus(
        amount: i64,
        element: Element,
        effect: impl Into<StatusEffectId>,
        per_stack: i64,
    ) -> Self {
        Self {
            amount,
            element,
            scaling: DamageScaling::StackBonus {
                effect: effect.into(),
                per_stack,
            },
        }
    }
}

/// How raw damage reacts to the encounter's status effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageScaling {
    #[default]
    Flat,
    PerStack {
        effect: StatusEffectId,
    },
    StackBonus {
        effect: StatusEffectId,
        per_stack: i64,
    },
}

/// Adds a modifier for the rest of the cast.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierAction {
    pub modifier: Modifier,
}

impl ModifierAction {
    pub fn new(modifier: Modifier) -> Self {
        Self { modifier }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectAction {
    pub operation: StatusOperation,
}

impl StatusEffectAction {
    pub fn new(operation: StatusOperation) -> Self {
        Self { operation }
    }
}

/// Status transition requested by an action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusOperation {
    /// Adds stacks, creating the instance if needed. Clamped to the maximum.
    Add {
        effect: StatusEffectDefinition,
        stacks: u32,
    },
    /// Removes stacks. The instance disappears at zero.
    Remove { effect: StatusEffectId, stacks: u32 },
    /// Sets an absolute stack count, clamped to the maximum.
    Set {
        effect: StatusEffectDefinition,
        stacks: u32,
    },
    /// Fires every instance whose trigger matches.
    Trigger(TriggerTiming),
    /// Applies scheduled decay for one decay window.
    Decay(DecayMode),
}

impl StatusOperation {
    pub const fn stacks(&self) -> u32 {
        match self {
            Self::Add { stacks, .. } | Self::Remove { stacks, .. } | Self::Set { stacks, .. } => {
                *stacks
            }
            Self::Trigger(_) | Self::Decay(_) => 0,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Set { .. } => "set",
            Self::Trigger(_) => "trigger",
            Self::Decay(_) => "decay",
        }
    }
}
