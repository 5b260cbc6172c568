//! Action domain.
//!
//! A spell is an ordered list of [`Card`]s, each holding one or more
//! [`Action`]s. Actions are pure data: the logic layer decides what they do to
//! an encounter.
//!
//! - `variants`: per-kind payloads (damage, modifier, status effect)
//! - `card`: cards and the card-then-action flattening order

mod card;
mod variants;

pub use card::{Card, CardId, flatten_cards};
pub use variants::{DamageAction, DamageScaling, ModifierAction, StatusEffectAction, StatusOperation};

use core::fmt;

use bitflags::bitflags;
use strum::IntoEnumIterator;

/// Identity of an action definition. Reused when the same action recurs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionId(pub u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of an action within a cast, counted from the start of the spell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActionIndex(pub u32);

impl ActionIndex {
    pub const ZERO: Self = Self(0);

    /// The following index, `None` on overflow.
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(next) => Some(Self(next)),
            None => None,
        }
    }

    pub fn offset(self, by: usize) -> Option<Self> {
        u32::try_from(by)
            .ok()
            .and_then(|by| self.0.checked_add(by))
            .map(Self)
    }
}

impl fmt::Display for ActionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite lookup key: which action, at which point in the cast.
///
/// Two occurrences of the same action in one spell carry different indices and
/// therefore different keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionKey {
    pub action: ActionId,
    pub index: ActionIndex,
}

impl ActionKey {
    pub const fn new(action: ActionId, index: ActionIndex) -> Self {
        Self { action, index }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.action, self.index)
    }
}

/// Damage category. Modifiers filter on these and running totals are kept per
/// category.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    #[default]
    Physical,
    Fire,
    Cold,
    Lightning,
    Poison,
    Arcane,
}

impl Element {
    pub const fn mask(self) -> ElementSet {
        match self {
            Self::Physical => ElementSet::PHYSICAL,
            Self::Fire => ElementSet::FIRE,
            Self::Cold => ElementSet::COLD,
            Self::Lightning => ElementSet::LIGHTNING,
            Self::Poison => ElementSet::POISON,
            Self::Arcane => ElementSet::ARCANE,
        }
    }
}

bitflags! {
    /// Set of damage categories a modifier accepts.
    ///
    /// The default is every category.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ElementSet: u8 {
        const PHYSICAL  = 1 << 0;
        const FIRE      = 1 << 1;
        const COLD      = 1 << 2;
        const LIGHTNING = 1 << 3;
        const POISON    = 1 << 4;
        const ARCANE    = 1 << 5;
    }
}

impl ElementSet {
    pub const fn accepts(self, element: Element) -> bool {
        self.contains(element.mask())
    }
}

impl Default for ElementSet {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Element> for ElementSet {
    fn from(element: Element) -> Self {
        element.mask()
    }
}

impl fmt::Display for ElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("any");
        }
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for element in Element::iter().filter(|e| self.accepts(*e)) {
            if !first {
                f.write_str("/")?;
            }
            f.write_str(element.as_ref())?;
            first = false;
        }
        Ok(())
    }
}

/// One step of a spell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub id: ActionId,
    pub name: String,
    pub kind: ActionKind,
}

impl Action {
    pub fn new(id: ActionId, name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
        }
    }

    pub fn damage(id: u32, name: impl Into<String>, damage: DamageAction) -> Self {
        Self::new(ActionId(id), name, ActionKind::Damage(damage))
    }

    pub fn modifier(id: u32, name: impl Into<String>, modifier: ModifierAction) -> Self {
        Self::new(ActionId(id), name, ActionKind::Modifier(modifier))
    }

    pub fn status(id: u32, name: impl Into<String>, status: StatusEffectAction) -> Self {
        Self::new(ActionId(id), name, ActionKind::StatusEffect(status))
    }

    /// Unmodified value shown when no precalculated result is available.
    pub fn base_value(&self) -> i64 {
        match &self.kind {
            ActionKind::Damage(damage) => damage.amount,
            ActionKind::Modifier(modifier) => modifier.modifier.magnitude,
            ActionKind::StatusEffect(status) => i64::from(status.operation.stacks()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    Damage(DamageAction),
    Modifier(ModifierAction),
    StatusEffect(StatusEffectAction),
}

impl ActionKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Damage(_) => "damage",
            Self::Modifier(_) => "modifier",
            Self::StatusEffect(_) => "status_effect",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_key_displays_action_and_index() {
        let key = ActionKey::new(ActionId(7), ActionIndex(3));
        assert_eq!(key.to_string(), "#7@3");
    }

    #[test]
    fn element_set_default_accepts_every_element() {
        let any = ElementSet::default();
        assert!(Element::iter().all(|e| any.accepts(e)));
        assert_eq!(any.to_string(), "any");
    }

    #[test]
    fn element_set_display_lists_members_in_declaration_order() {
        let set = ElementSet::COLD | ElementSet::FIRE;
        assert_eq!(set.to_string(), "fire/cold");
        assert!(!set.accepts(Element::Physical));
    }

    #[test]
    fn element_parses_case_insensitively() {
        assert_eq!("Lightning".parse::<Element>().ok(), Some(Element::Lightning));
    }

    #[test]
    fn index_offset_detects_overflow() {
        assert_eq!(ActionIndex(2).offset(3), Some(ActionIndex(5)));
        assert_eq!(ActionIndex(u32::MAX).checked_next(), None);
    }
}
