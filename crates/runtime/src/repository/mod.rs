//! Repository layer for precalculated snapshots.
//!
//! Snapshots live only for the duration of a cast: they are stored when the
//! cast starts, read while it replays and cleared when it finishes.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemorySnapshotStore;
pub use traits::SnapshotRepository;
