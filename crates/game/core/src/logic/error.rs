use crate::action::ActionId;
use crate::error::{ErrorSeverity, SpellError};
use crate::state::StateError;

/// Errors raised while simulating a single action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogicError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error("action {action} has a negative damage amount ({amount})")]
    NegativeAmount { action: ActionId, amount: i64 },
}

impl SpellError for LogicError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::State(err) => err.severity(),
            Self::NegativeAmount { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::State(err) => err.error_code(),
            Self::NegativeAmount { .. } => "LOGIC_NEGATIVE_AMOUNT",
        }
    }
}
