//! Runtime orchestration for spell casts.
//!
//! This crate stores precalculated snapshots and replays them through a
//! command pipeline. Consumers embed [`Runtime`] to begin casts and advance
//! the returned [`CastPipeline`] at their own pace.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`commands`] implements the start, execute, complete and cancel commands
//! - [`hooks`] runs lifecycle hooks when a cast finishes
//! - [`repository`] provides the snapshot store
pub mod api;
pub mod clock;
pub mod commands;
pub mod hooks;
pub mod pipeline;
pub mod repository;
pub mod runtime;
pub mod scenario;

pub use api::{Result, RuntimeError};
pub use clock::SystemClock;
pub use commands::{CastCommand, Command, CommandOutcome};
pub use hooks::{
    CastFinished, CastLifecycleHook, FinishReason, HookCriticality, HookRegistry,
    SnapshotCleanupHook,
};
pub use pipeline::{CastPhase, CastPipeline, CastSummary, Continuation, Immediate, StepOutcome};
pub use repository::{InMemorySnapshotStore, RepositoryError, SnapshotRepository};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scenario::CastScenario;
