//! Damage modifiers.
//!
//! Modifiers are applied in list order, each to the running value:
//! `Additive` adds its magnitude, `Multiplicative` scales by an integer
//! percentage (150 = ×1.5, truncating toward zero) and `SetTo` replaces the
//! running value. The caller clamps the final result at zero.

use core::fmt;

use crate::action::{Element, ElementSet};
use crate::state::{StatusEffectId, StatusEffects};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ModifierKind {
    Additive,
    Multiplicative,
    SetTo,
}

/// Extra requirement checked before a modifier applies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierCondition {
    /// Raw damage (before any modifier) must be at least this much.
    MinimumRawDamage(i64),
    /// The encounter must carry at least `min_stacks` of `effect`.
    RequiresStatus {
        effect: StatusEffectId,
        min_stacks: u32,
    },
}

impl ModifierCondition {
    fn holds(&self, raw: i64, status: &StatusEffects) -> bool {
        match self {
            Self::MinimumRawDamage(min) => raw >= *min,
            Self::RequiresStatus { effect, min_stacks } => status.stacks_of(effect) >= *min_stacks,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub kind: ModifierKind,
    pub magnitude: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub applies_to: ElementSet,
    /// Removed from the active list the first time it applies.
    #[cfg_attr(feature = "serde", serde(default))]
    pub consumable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<ModifierCondition>,
}

impl Modifier {
    fn of(kind: ModifierKind, magnitude: i64) -> Self {
        Self {
            kind,
            magnitude,
            applies_to: ElementSet::all(),
            consumable: false,
            conditions: Vec::new(),
        }
    }

    pub fn additive(amount: i64) -> Self {
        Self::of(ModifierKind::Additive, amount)
    }

    /// Percentage multiplier (150 = ×1.5).
    pub fn multiplicative(percent: i64) -> Self {
        Self::of(ModifierKind::Multiplicative, percent)
    }

    pub fn set_to(value: i64) -> Self {
        Self::of(ModifierKind::SetTo, value)
    }

    #[must_use]
    pub fn only(mut self, elements: impl Into<ElementSet>) -> Self {
        self.applies_to = elements.into();
        self
    }

    #[must_use]
    pub fn consumable(mut self) -> Self {
        self.consumable = true;
        self
    }

    #[must_use]
    pub fn when(mut self, condition: ModifierCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Whether this modifier applies to damage of `element` with the given raw
    /// value against the given status effects.
    pub fn accepts(&self, element: Element, raw: i64, status: &StatusEffects) -> bool {
        self.applies_to.accepts(element) && self.conditions.iter().all(|c| c.holds(raw, status))
    }

    pub fn apply(&self, value: i64) -> i64 {
        match self.kind {
            ModifierKind::Additive => value.saturating_add(self.magnitude),
            ModifierKind::Multiplicative => value.saturating_mul(self.magnitude) / 100,
            ModifierKind::SetTo => self.magnitude,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ModifierKind::Additive if self.magnitude >= 0 => write!(f, "+{}", self.magnitude)?,
            ModifierKind::Additive => write!(f, "{}", self.magnitude)?,
            ModifierKind::Multiplicative => write!(f, "x{}%", self.magnitude)?,
            ModifierKind::SetTo => write!(f, "={}", self.magnitude)?,
        }
        if !self.applies_to.is_all() {
            write!(f, " {}", self.applies_to)?;
        }
        if self.consumable {
            f.write_str(" (once)")?;
        }
        Ok(())
    }
}
