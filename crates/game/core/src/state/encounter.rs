use crate::action::{ActionIndex, Element};
use crate::clock::Timestamp;
use crate::config::EngineConfig;
use crate::modifier::Modifier;
use crate::state::{PropertyValue, SpellProgress, StateError, StatusEffects};

/// Live-state sections an encounter snapshot reads and replaces.
pub trait EncounterSections {
    fn spell_progress(&self) -> &SpellProgress;
    fn status_effects(&self) -> &StatusEffects;

    /// Replaces both sections together. Everything else is left as it was.
    fn replace_sections(&mut self, spell: SpellProgress, status: StatusEffects);
}

/// Immutable view of one point in a cast.
///
/// Every `with_*` derivation consumes the value and returns a new one; nothing
/// mutates a state another snapshot already holds. The encounter action index
/// and the spell progress index always agree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterState {
    spell: SpellProgress,
    status: StatusEffects,
    timestamp: Timestamp,
    action_index: ActionIndex,
}

impl EncounterState {
    pub fn new(
        spell: SpellProgress,
        status: StatusEffects,
        timestamp: Timestamp,
    ) -> Result<Self, StateError> {
        status.validate()?;
        if spell.modifiers.len() > EngineConfig::MAX_ACTIVE_MODIFIERS {
            return Err(StateError::ModifierCapacity {
                max: EngineConfig::MAX_ACTIVE_MODIFIERS,
            });
        }
        Ok(Self {
            action_index: spell.action_index,
            spell,
            status,
            timestamp,
        })
    }

    /// Copies the spell-relevant sections of a live state.
    pub fn capture<S: EncounterSections + ?Sized>(
        live: &S,
        now: Timestamp,
    ) -> Result<Self, StateError> {
        Self::new(live.spell_progress().clone(), live.status_effects().clone(), now)
    }

    pub fn spell(&self) -> &SpellProgress {
        &self.spell
    }

    pub fn status(&self) -> &StatusEffects {
        &self.status
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn action_index(&self) -> ActionIndex {
        self.action_index
    }

    pub fn modifiers(&self) -> &[Modifier] {
        &self.spell.modifiers
    }

    pub fn total_damage(&self) -> i64 {
        self.spell.total_damage
    }

    /// Checks that both index counters agree.
    pub fn check_index(&self) -> Result<(), StateError> {
        if self.action_index == self.spell.action_index {
            Ok(())
        } else {
            Err(StateError::IndexDesync {
                encounter: self.action_index,
                spell: self.spell.action_index,
            })
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Moves the action index forward to `index`. Moving backwards is rejected.
    pub fn with_action_index(mut self, index: ActionIndex) -> Result<Self, StateError> {
        if index < self.action_index {
            return Err(StateError::IndexRegression {
                current: self.action_index,
                requested: index,
            });
        }
        self.action_index = index;
        self.spell.action_index = index;
        Ok(self)
    }

    /// Advances the action index by one.
    pub fn advanced(self) -> Result<Self, StateError> {
        let next = self
            .action_index
            .checked_next()
            .ok_or(StateError::IndexOverflow {
                current: self.action_index,
            })?;
        self.with_action_index(next)
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Result<Self, StateError> {
        if modifiers.len() > EngineConfig::MAX_ACTIVE_MODIFIERS {
            return Err(StateError::ModifierCapacity {
                max: EngineConfig::MAX_ACTIVE_MODIFIERS,
            });
        }
        self.spell.modifiers = modifiers;
        Ok(self)
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusEffects) -> Self {
        self.status = status;
        self
    }

    /// Adds `amount` to the running totals, overall and for `element`.
    #[must_use]
    pub fn with_damage(mut self, amount: i64, element: Element) -> Self {
        self.spell.total_damage = self.spell.total_damage.saturating_add(amount);
        let slot = self.spell.damage_by_element.entry(element).or_insert(0);
        *slot = slot.saturating_add(amount);
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.spell.properties.insert(key.into(), value);
        self
    }

    /// Increments an integer property, starting from zero.
    #[must_use]
    pub fn with_counter(self, key: &str) -> Self {
        let current = self
            .spell
            .property(key)
            .and_then(PropertyValue::as_int)
            .unwrap_or(0);
        self.with_property(key, PropertyValue::Int(current.saturating_add(1)))
    }

    pub fn into_sections(self) -> (SpellProgress, StatusEffects) {
        (self.spell, self.status)
    }
}
