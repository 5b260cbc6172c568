//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the snapshot store, precalculation and command replay
//! so the pipeline can log and return them with consistent context.

use spellcast_core::{
    ActionIndex, ActionKey, CastId, ErrorSeverity, PrecalcError, SpellError, StateError,
};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no snapshot stored for {key} in {cast}")]
    MissingSnapshot { cast: CastId, key: ActionKey },

    #[error("snapshot {key} leads to index {found}, expected {expected}")]
    IndexMismatch {
        key: ActionKey,
        expected: ActionIndex,
        found: ActionIndex,
    },

    #[error("{command} is not allowed while the cast is {phase}")]
    InvalidPhase {
        command: &'static str,
        phase: &'static str,
    },

    #[error("spell has no actions to cast")]
    EmptyCast,

    #[error("no spell is active for {cast}")]
    SpellNotActive { cast: CastId },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("hook {hook} failed: {message}")]
    Hook { hook: &'static str, message: String },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Precalc(#[from] PrecalcError),

    #[error(transparent)]
    State(#[from] StateError),
}

impl SpellError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        use RuntimeError::*;
        match self {
            MissingSnapshot { .. } | IndexMismatch { .. } => ErrorSeverity::Internal,
            InvalidPhase { .. } | EmptyCast | SpellNotActive { .. } => ErrorSeverity::Validation,
            InvalidConfig(_) | InvalidScenario(_) => ErrorSeverity::Validation,
            Hook { .. } => ErrorSeverity::Internal,
            Repository(err) => err.severity(),
            Precalc(err) => err.severity(),
            State(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use RuntimeError::*;
        match self {
            MissingSnapshot { .. } => "RUNTIME_MISSING_SNAPSHOT",
            IndexMismatch { .. } => "RUNTIME_INDEX_MISMATCH",
            InvalidPhase { .. } => "RUNTIME_INVALID_PHASE",
            EmptyCast => "RUNTIME_EMPTY_CAST",
            SpellNotActive { .. } => "RUNTIME_SPELL_NOT_ACTIVE",
            InvalidConfig(_) => "RUNTIME_INVALID_CONFIG",
            InvalidScenario(_) => "RUNTIME_INVALID_SCENARIO",
            Hook { .. } => "RUNTIME_HOOK_FAILED",
            Repository(err) => err.error_code(),
            Precalc(err) => err.error_code(),
            State(err) => err.error_code(),
        }
    }
}
