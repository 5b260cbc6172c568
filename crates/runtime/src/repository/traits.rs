//! Repository contract for precalculated snapshots.

use spellcast_core::{ActionKey, CastId, Snapshot};

use super::error::Result;

/// Store of precalculated snapshots, grouped by cast.
///
/// Lookups never fail because a snapshot is absent; they return `None`.
pub trait SnapshotRepository: Send + Sync {
    /// Stores every snapshot of one cast.
    ///
    /// Fails if the cast is already stored or two snapshots share a key. On
    /// success returns the casts evicted to respect the retention bound,
    /// oldest first.
    fn store(&self, cast: CastId, snapshots: Vec<Snapshot>) -> Result<Vec<CastId>>;

    /// Snapshot of `cast` for `key`, if any.
    fn get_for_action(&self, cast: CastId, key: &ActionKey) -> Result<Option<Snapshot>>;

    /// Every snapshot of `cast`, in the order they were stored.
    fn get_all(&self, cast: CastId) -> Result<Vec<Snapshot>>;

    /// Drops every snapshot of `cast`. Returns whether anything was removed.
    fn clear(&self, cast: CastId) -> Result<bool>;

    /// Casts currently held, in insertion order.
    fn cast_ids(&self) -> Result<Vec<CastId>>;

    fn contains(&self, cast: CastId) -> bool {
        self.cast_ids()
            .map(|ids| ids.contains(&cast))
            .unwrap_or(false)
    }

    fn len(&self) -> usize {
        self.cast_ids().map(|ids| ids.len()).unwrap_or(0)
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
