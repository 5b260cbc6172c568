//! Public runtime API surface.
mod errors;

pub use errors::{RepositoryError, Result, RuntimeError};
