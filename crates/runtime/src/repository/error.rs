//! Error types raised by repository implementations.

use spellcast_core::{ActionKey, CastId, ErrorSeverity, SpellError};
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("snapshot repository lock was poisoned")]
    LockPoisoned,

    #[error("snapshots for {0} are already stored")]
    CastAlreadyStored(CastId),

    #[error("duplicate snapshot key {key} in {cast}")]
    DuplicateKey { cast: CastId, key: ActionKey },
}

impl SpellError for RepositoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LockPoisoned => ErrorSeverity::Fatal,
            Self::CastAlreadyStored(_) | Self::DuplicateKey { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "REPOSITORY_LOCK_POISONED",
            Self::CastAlreadyStored(_) => "REPOSITORY_CAST_ALREADY_STORED",
            Self::DuplicateKey { .. } => "REPOSITORY_DUPLICATE_KEY",
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
