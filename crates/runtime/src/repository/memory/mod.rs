//! In-memory repository implementations for tests and local runs.

mod snapshot;

pub use snapshot::InMemorySnapshotStore;
