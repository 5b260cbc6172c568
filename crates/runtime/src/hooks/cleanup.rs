use tracing::debug;

use super::{CastFinished, CastLifecycleHook, HookCriticality};
use crate::api::Result;
use crate::repository::SnapshotRepository;

/// Drops every snapshot of a finished cast.
pub struct SnapshotCleanupHook;

impl CastLifecycleHook for SnapshotCleanupHook {
    fn name(&self) -> &'static str {
        "snapshot_cleanup"
    }

    fn priority(&self) -> i32 {
        -100
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn on_finished(&self, event: &CastFinished, store: &dyn SnapshotRepository) -> Result<()> {
        let removed = store.clear(event.cast)?;
        debug!(
            target: "runtime::hooks",
            cast = %event.cast,
            reason = event.reason.as_str(),
            removed,
            "cleared cast snapshots"
        );
        Ok(())
    }
}
