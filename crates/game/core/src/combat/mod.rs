//! Damage resolution.
//!
//! Pure functions over an [`EncounterState`](crate::state::EncounterState):
//! raw damage from an action's scaling, then the active modifier list applied
//! in order. Nothing here writes state.

pub mod damage;

pub use damage::{DamageCalculator, ModifierApplication};
