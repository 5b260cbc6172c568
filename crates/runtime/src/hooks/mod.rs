//! Cast lifecycle hooks.
//!
//! Hooks run once when a cast finishes, whether it completed, was cancelled
//! or failed. They are sorted by priority (lower values first) and always
//! include [`SnapshotCleanupHook`], which drops the cast's snapshots.

mod cleanup;
mod registry;

pub use cleanup::SnapshotCleanupHook;
pub use registry::HookRegistry;

use spellcast_core::{CastId, CastRecord};

use crate::api::Result;
use crate::repository::SnapshotRepository;

/// Defines the criticality level of a hook for error handling.
///
/// - Critical hooks must succeed or the finishing command fails
/// - Important hooks log errors but allow continuation
/// - Optional hooks can fail silently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCriticality {
    Critical,
    Important,
    Optional,
}

/// How a cast ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishReason {
    Completed,
    Cancelled,
    Failed,
}

impl FinishReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

/// Context handed to hooks when a cast finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastFinished {
    pub cast: CastId,
    pub reason: FinishReason,
    pub record: CastRecord,
}

pub trait CastLifecycleHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging and debugging).
    fn name(&self) -> &'static str;

    /// Lower values execute first. Typical ranges:
    /// - `-100..0`: system hooks that must run early
    /// - `0`: default
    /// - `1..100`: optional or cosmetic hooks
    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    fn on_finished(&self, event: &CastFinished, store: &dyn SnapshotRepository) -> Result<()>;
}
