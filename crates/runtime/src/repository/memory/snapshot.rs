//! In-memory SnapshotRepository with a bounded number of casts.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use spellcast_core::{ActionKey, CastId, Snapshot};

use crate::repository::{RepositoryError, Result, SnapshotRepository};

#[derive(Default)]
struct CastSnapshots {
    ordered: Vec<Snapshot>,
    by_key: HashMap<ActionKey, usize>,
}

#[derive(Default)]
struct Inner {
    casts: HashMap<CastId, CastSnapshots>,
    order: VecDeque<CastId>,
}

/// In-memory implementation of SnapshotRepository.
///
/// Keeps at most `retention` casts. Storing past the bound evicts the oldest
/// casts first.
pub struct InMemorySnapshotStore {
    inner: RwLock<Inner>,
    retention: usize,
}

impl InMemorySnapshotStore {
    pub const DEFAULT_RETENTION: usize = 16;

    pub fn new() -> Self {
        Self::with_retention(Self::DEFAULT_RETENTION)
    }

    /// Create a store keeping at most `retention` casts (at least one).
    pub fn with_retention(retention: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            retention: retention.max(1),
        }
    }

    pub fn retention(&self) -> usize {
        self.retention
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotRepository for InMemorySnapshotStore {
    fn store(&self, cast: CastId, snapshots: Vec<Snapshot>) -> Result<Vec<CastId>> {
        let mut by_key = HashMap::with_capacity(snapshots.len());
        for (position, snapshot) in snapshots.iter().enumerate() {
            let key = snapshot.key();
            if by_key.insert(key, position).is_some() {
                return Err(RepositoryError::DuplicateKey { cast, key });
            }
        }

        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if inner.casts.contains_key(&cast) {
            return Err(RepositoryError::CastAlreadyStored(cast));
        }

        inner.casts.insert(
            cast,
            CastSnapshots {
                ordered: snapshots,
                by_key,
            },
        );
        inner.order.push_back(cast);

        let mut evicted = Vec::new();
        while inner.order.len() > self.retention {
            if let Some(oldest) = inner.order.pop_front() {
                inner.casts.remove(&oldest);
                evicted.push(oldest);
            }
        }
        Ok(evicted)
    }

    fn get_for_action(&self, cast: CastId, key: &ActionKey) -> Result<Option<Snapshot>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inner.casts.get(&cast).and_then(|entry| {
            entry
                .by_key
                .get(key)
                .and_then(|&position| entry.ordered.get(position))
                .cloned()
        }))
    }

    fn get_all(&self, cast: CastId) -> Result<Vec<Snapshot>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inner
            .casts
            .get(&cast)
            .map(|entry| entry.ordered.clone())
            .unwrap_or_default())
    }

    fn clear(&self, cast: CastId) -> Result<bool> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let removed = inner.casts.remove(&cast).is_some();
        if removed {
            inner.order.retain(|id| *id != cast);
        }
        Ok(removed)
    }

    fn cast_ids(&self) -> Result<Vec<CastId>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(inner.order.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spellcast_core::{
        ActionId, ActionIndex, ActionResult, EncounterState, Popup, SpellProgress, StatusEffects,
        Timestamp,
    };

    fn snapshot(action: u32, index: u32) -> Snapshot {
        let spell = SpellProgress {
            action_index: ActionIndex(index + 1),
            ..SpellProgress::default()
        };
        let state = EncounterState::new(spell, StatusEffects::empty(), Timestamp(0)).unwrap();
        Snapshot::new(
            ActionKey::new(ActionId(action), ActionIndex(index)),
            state,
            ActionResult::default(),
            Popup::default(),
            Timestamp(0),
        )
    }

    #[test]
    fn lookup_by_key_and_in_order() {
        let store = InMemorySnapshotStore::new();
        store
            .store(CastId(1), vec![snapshot(7, 0), snapshot(7, 1)])
            .unwrap();

        let key = ActionKey::new(ActionId(7), ActionIndex(1));
        let found = store.get_for_action(CastId(1), &key).unwrap().unwrap();
        assert_eq!(found.key(), key);

        let all = store.get_all(CastId(1)).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].key().index, ActionIndex(0));
    }

    #[test]
    fn absent_entries_are_none() {
        let store = InMemorySnapshotStore::new();
        let key = ActionKey::new(ActionId(1), ActionIndex(0));
        assert!(store.get_for_action(CastId(9), &key).unwrap().is_none());
        assert!(store.get_all(CastId(9)).unwrap().is_empty());
    }

    #[test]
    fn clear_removes_only_that_cast() {
        let store = InMemorySnapshotStore::new();
        store.store(CastId(1), vec![snapshot(1, 0)]).unwrap();
        store.store(CastId(2), vec![snapshot(1, 0)]).unwrap();

        assert!(store.clear(CastId(1)).unwrap());
        assert!(!store.clear(CastId(1)).unwrap());
        assert!(store.get_all(CastId(1)).unwrap().is_empty());
        assert_eq!(store.cast_ids().unwrap(), vec![CastId(2)]);
    }

    #[test]
    fn restoring_a_cast_is_rejected() {
        let store = InMemorySnapshotStore::new();
        store.store(CastId(1), vec![snapshot(1, 0)]).unwrap();
        let err = store.store(CastId(1), vec![snapshot(2, 0)]).unwrap_err();
        assert!(matches!(err, RepositoryError::CastAlreadyStored(CastId(1))));
    }

    #[test]
    fn duplicate_keys_are_rejected_without_storing() {
        let store = InMemorySnapshotStore::new();
        let err = store
            .store(CastId(1), vec![snapshot(3, 0), snapshot(3, 0)])
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateKey { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn retention_evicts_oldest_first() {
        let store = InMemorySnapshotStore::with_retention(2);
        assert!(store.store(CastId(1), vec![snapshot(1, 0)]).unwrap().is_empty());
        assert!(store.store(CastId(2), vec![snapshot(1, 0)]).unwrap().is_empty());

        let evicted = store.store(CastId(3), vec![snapshot(1, 0)]).unwrap();
        assert_eq!(evicted, vec![CastId(1)]);
        assert_eq!(store.cast_ids().unwrap(), vec![CastId(2), CastId(3)]);
        assert_eq!(store.len(), 2);
    }
}
