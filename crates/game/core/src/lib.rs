//! Deterministic spell precalculation.
//!
//! `spellcast-core` holds the encounter data model, the pure per-action logic
//! and the [`PrecalculationService`] that turns an ordered card list into one
//! [`Snapshot`] per action. Nothing here performs I/O or reads ambient state;
//! time comes from an injected [`Clock`].
pub mod action;
pub mod clock;
pub mod combat;
pub mod config;
pub mod error;
pub mod logic;
pub mod modifier;
pub mod precalc;
pub mod result;
pub mod snapshot;
pub mod state;

pub use action::{
    Action, ActionId, ActionIndex, ActionKey, ActionKind, Card, CardId, DamageAction,
    DamageScaling, Element, ElementSet, ModifierAction, StatusEffectAction, StatusOperation,
    flatten_cards,
};
pub use clock::{Clock, FixedClock, SteppingClock, Timestamp};
pub use combat::{DamageCalculator, ModifierApplication};
pub use config::EngineConfig;
pub use error::{ErrorSeverity, SpellError};
pub use logic::{LogicError, LogicManager, StatusOutcome, Transition};
pub use modifier::{Modifier, ModifierCondition, ModifierKind};
pub use precalc::{PrecalcError, PrecalculationService};
pub use result::{ActionResult, Popup, PrecalcFault, StatusChange, TriggeredEffect};
pub use snapshot::{Snapshot, apply_encounter_snapshot};
#[cfg(feature = "serde")]
pub use snapshot::sequence_digest;
pub use state::{
    CastId, CastRecord, DecayMode, DecayPolicy, EncounterSections, EncounterState, GameState,
    PropertyValue, SpellProgress, StateError, StatusEffectDefinition, StatusEffectId,
    StatusEffectInstance, StatusEffects, TriggerTiming,
};
