//! High-level runtime orchestrator.
//!
//! The runtime owns the snapshot store, the precalculation service and the
//! lifecycle hooks, allocates cast ids and hands out a [`CastPipeline`] per
//! cast. Configuration comes from [`RuntimeConfig`], optionally read from the
//! environment.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use spellcast_core::{
    ActionKey, Card, CastId, Clock, EngineConfig, GameState, LogicManager, PrecalculationService,
    Snapshot,
};

use crate::api::{Result, RuntimeError};
use crate::clock::SystemClock;
use crate::commands::prepare_cast;
use crate::hooks::{CastLifecycleHook, HookRegistry};
use crate::pipeline::{CastPipeline, CastServices};
use crate::repository::{InMemorySnapshotStore, SnapshotRepository};

/// Runtime configuration shared by the store and every pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Maximum number of casts whose snapshots are kept at once.
    pub snapshot_retention: usize,
    /// Delay between two commands of a cast.
    pub action_delay: Duration,
}

impl RuntimeConfig {
    pub const DEFAULT_SNAPSHOT_RETENTION: usize = 16;
    pub const DEFAULT_ACTION_DELAY: Duration = Duration::from_millis(250);

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SPELLCAST_SNAPSHOT_RETENTION` - Casts kept in the snapshot store (default: 16)
    /// - `SPELLCAST_ACTION_DELAY_MS` - Delay between commands in milliseconds (default: 250)
    /// - `SPELLCAST_DEFAULT_MAX_STACKS` - Stack ceiling for unbounded effects (default: 99)
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(retention) = read_env::<usize>("SPELLCAST_SNAPSHOT_RETENTION") {
            config.snapshot_retention = retention.max(1);
        }

        if let Some(millis) = read_env::<u64>("SPELLCAST_ACTION_DELAY_MS") {
            config.action_delay = Duration::from_millis(millis);
        }

        if let Some(stacks) = read_env::<u32>("SPELLCAST_DEFAULT_MAX_STACKS") {
            config.engine = EngineConfig::with_default_max_stacks(stacks);
        }

        config
    }

    pub fn validate(&self) -> Result<()> {
        if self.snapshot_retention == 0 {
            return Err(RuntimeError::InvalidConfig(
                "snapshot_retention must be at least 1".to_owned(),
            ));
        }
        if self.engine.default_max_stacks == 0 {
            return Err(RuntimeError::InvalidConfig(
                "default_max_stacks must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            snapshot_retention: Self::DEFAULT_SNAPSHOT_RETENTION,
            action_delay: Self::DEFAULT_ACTION_DELAY,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

pub struct Runtime {
    config: RuntimeConfig,
    services: CastServices,
    next_cast: u64,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn SnapshotRepository> {
        &self.services.store
    }

    pub fn precalculation(&self) -> &PrecalculationService {
        &self.services.precalc
    }

    /// Allocates a cast id and queues the cast of `cards` against `state`.
    ///
    /// Nothing runs until the returned pipeline is advanced.
    pub fn begin_cast(&mut self, state: GameState, cards: Vec<Card>) -> CastPipeline {
        self.next_cast += 1;
        CastPipeline::new(
            CastId(self.next_cast),
            state,
            cards,
            self.services.clone(),
            self.config.action_delay,
        )
    }

    /// Snapshots a cast of `cards` from `state` would store, without storing
    /// them. The state is prepared the way the start command prepares it.
    pub fn precalculate(&self, state: &GameState, cards: &[Card]) -> Result<Vec<Snapshot>> {
        let prepared = prepare_cast(state, cards, self.services.clock.now());
        Ok(self
            .services
            .precalc
            .precalculate_spell_with_snapshots(&prepared, cards)?)
    }

    pub fn snapshot(&self, cast: CastId, key: &ActionKey) -> Result<Option<Snapshot>> {
        Ok(self.services.store.get_for_action(cast, key)?)
    }

    pub fn snapshots(&self, cast: CastId) -> Result<Vec<Snapshot>> {
        Ok(self.services.store.get_all(cast)?)
    }

    pub fn clear_snapshots(&self, cast: CastId) -> Result<bool> {
        Ok(self.services.store.clear(cast)?)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    store: Option<Arc<dyn SnapshotRepository>>,
    clock: Option<Arc<dyn Clock>>,
    hooks: Vec<Arc<dyn CastLifecycleHook>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            store: None,
            clock: None,
            hooks: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom snapshot store instead of the in-memory one.
    pub fn store(mut self, store: Arc<dyn SnapshotRepository>) -> Self {
        self.store = Some(store);
        self
    }

    /// Time source for precalculation and cast durations (default: system clock).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Adds a lifecycle hook. The snapshot cleanup hook is always installed.
    pub fn hook(mut self, hook: Arc<dyn CastLifecycleHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> Result<Runtime> {
        self.config.validate()?;

        let store = self.store.unwrap_or_else(|| {
            Arc::new(InMemorySnapshotStore::with_retention(
                self.config.snapshot_retention,
            ))
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let precalc = PrecalculationService::new(
            LogicManager::new(self.config.engine.clone()),
            Arc::clone(&clock),
        );

        Ok(Runtime {
            services: CastServices {
                store,
                precalc: Arc::new(precalc),
                clock,
                hooks: Arc::new(HookRegistry::new(self.hooks)),
            },
            config: self.config,
            next_cast: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_retention_is_rejected() {
        let config = RuntimeConfig {
            snapshot_retention: 0,
            ..RuntimeConfig::default()
        };
        let err = Runtime::builder().config(config).build().err().unwrap();
        assert!(matches!(err, RuntimeError::InvalidConfig(_)));
    }

    #[test]
    fn cast_ids_are_never_reused() {
        let mut runtime = Runtime::builder().build().unwrap();
        let first = runtime.begin_cast(GameState::new(), Vec::new()).cast();
        let second = runtime.begin_cast(GameState::new(), Vec::new()).cast();
        assert!(second > first);
    }
}
