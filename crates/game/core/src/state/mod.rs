//! Encounter and live game state.
//!
//! [`GameState`] is the live, authoritative state the runtime mutates.
//! [`EncounterState`] is the immutable copy of its spell-relevant sections
//! that precalculation simulates against. Snapshots carry encounter states
//! forward and [`crate::snapshot::apply_encounter_snapshot`] writes them back.
mod encounter;
mod error;
pub mod types;

pub use encounter::{EncounterSections, EncounterState};
pub use error::StateError;
pub use types::{
    CastId, CastRecord, DecayMode, DecayPolicy, PropertyValue, SpellProgress,
    StatusEffectDefinition, StatusEffectId, StatusEffectInstance, StatusEffects, TriggerTiming,
};

use crate::config::EngineConfig;

/// Live state owned by the command pipeline during a cast.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameState {
    pub spell: SpellProgress,
    pub status: StatusEffects,

    /// Cast currently being replayed, if any.
    pub active_cast: Option<CastId>,

    /// Turn counter of the surrounding encounter. Never touched by a cast.
    pub turn: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusEffects) -> Self {
        self.status = status;
        self
    }

    /// Checks invariants of a state built outside the engine.
    pub fn validate(&self) -> Result<(), StateError> {
        self.status.validate()?;
        if self.spell.modifiers.len() > EngineConfig::MAX_ACTIVE_MODIFIERS {
            return Err(StateError::ModifierCapacity {
                max: EngineConfig::MAX_ACTIVE_MODIFIERS,
            });
        }
        Ok(())
    }
}

impl EncounterSections for GameState {
    fn spell_progress(&self) -> &SpellProgress {
        &self.spell
    }

    fn status_effects(&self) -> &StatusEffects {
        &self.status
    }

    fn replace_sections(&mut self, spell: SpellProgress, status: StatusEffects) {
        self.spell = spell;
        self.status = status;
    }
}
