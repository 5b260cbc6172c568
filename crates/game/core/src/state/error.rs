//! State management errors.
//!
//! Errors raised while building or deriving encounter state: capacity limits,
//! stack bounds and action index ordering.

use crate::action::ActionIndex;
use crate::error::{ErrorSeverity, SpellError};
use crate::state::StatusEffectId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateError {
    /// Stack count outside `1..=max` for an instance.
    #[error("status effect {effect} cannot hold {stacks} stacks (max: {max})")]
    StackOverflow {
        effect: StatusEffectId,
        stacks: u32,
        max: u32,
    },

    /// Two instances share one effect id.
    #[error("status effect {effect} appears more than once")]
    DuplicateEffect { effect: StatusEffectId },

    /// Status list is full (max capacity reached).
    #[error("status effect list is full (max: {max})")]
    StatusCapacity { max: usize },

    /// Active modifier list is full (max capacity reached).
    #[error("active modifier list is full (max: {max})")]
    ModifierCapacity { max: usize },

    /// Action index may only move forward within a cast.
    #[error("action index cannot move from {current} back to {requested}")]
    IndexRegression {
        current: ActionIndex,
        requested: ActionIndex,
    },

    #[error("action index overflow (current: {current})")]
    IndexOverflow { current: ActionIndex },

    /// Encounter and spell progress disagree on the action index.
    #[error("encounter index {encounter} does not match spell index {spell}")]
    IndexDesync {
        encounter: ActionIndex,
        spell: ActionIndex,
    },
}

impl SpellError for StateError {
    fn severity(&self) -> ErrorSeverity {
        use StateError::*;
        match self {
            // Capacity errors are recoverable: precalculation falls back to a no-op
            StatusCapacity { .. } | ModifierCapacity { .. } => ErrorSeverity::Recoverable,

            StackOverflow { .. } | DuplicateEffect { .. } | IndexRegression { .. } => {
                ErrorSeverity::Validation
            }

            IndexDesync { .. } => ErrorSeverity::Internal,

            IndexOverflow { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use StateError::*;
        match self {
            StackOverflow { .. } => "STATE_STACK_OVERFLOW",
            DuplicateEffect { .. } => "STATE_DUPLICATE_EFFECT",
            StatusCapacity { .. } => "STATE_STATUS_CAPACITY",
            ModifierCapacity { .. } => "STATE_MODIFIER_CAPACITY",
            IndexRegression { .. } => "STATE_INDEX_REGRESSION",
            IndexOverflow { .. } => "STATE_INDEX_OVERFLOW",
            IndexDesync { .. } => "STATE_INDEX_DESYNC",
        }
    }
}
