//! Hook registry for managing and executing lifecycle hooks.

use std::sync::Arc;

use tracing::{debug, error};

use super::{CastFinished, CastLifecycleHook, HookCriticality, SnapshotCleanupHook};
use crate::api::{Result, RuntimeError};
use crate::repository::SnapshotRepository;

pub struct HookRegistry {
    hooks: Arc<[Arc<dyn CastLifecycleHook>]>,
}

impl HookRegistry {
    /// Creates a registry from `extra` hooks plus the snapshot cleanup hook.
    ///
    /// Hooks are sorted by priority (lower values first). The sort is stable,
    /// so hooks sharing a priority keep the order they were given in.
    pub fn new(extra: Vec<Arc<dyn CastLifecycleHook>>) -> Self {
        let mut hooks: Vec<Arc<dyn CastLifecycleHook>> =
            vec![Arc::new(SnapshotCleanupHook) as Arc<dyn CastLifecycleHook>];
        hooks.extend(
            extra
                .into_iter()
                .filter(|h| h.name() != SnapshotCleanupHook.name()),
        );
        hooks.sort_by_key(|h| h.priority());

        Self {
            hooks: hooks.into(),
        }
    }

    /// Registry with only the default hooks.
    pub fn default_hooks() -> Self {
        Self::new(Vec::new())
    }

    /// Runs every hook for a finished cast.
    ///
    /// # Error Handling
    ///
    /// - `Critical`: returns the error immediately, remaining hooks are skipped
    /// - `Important`: logs the error and continues
    /// - `Optional`: logs at debug level and continues
    pub fn cast_finished(&self, event: &CastFinished, store: &dyn SnapshotRepository) -> Result<()> {
        for hook in self.hooks.iter() {
            if let Err(e) = hook.on_finished(event, store) {
                self.handle_hook_error(hook.as_ref(), e)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hook names and priorities in execution order (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }

    fn handle_hook_error(&self, hook: &dyn CastLifecycleHook, err: RuntimeError) -> Result<()> {
        match hook.criticality() {
            HookCriticality::Critical => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "critical",
                    error = %err,
                    "critical hook failed"
                );
                Err(RuntimeError::Hook {
                    hook: hook.name(),
                    message: err.to_string(),
                })
            }
            HookCriticality::Important => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "important",
                    error = %err,
                    "hook failed, continuing"
                );
                Ok(())
            }
            HookCriticality::Optional => {
                debug!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "optional",
                    error = %err,
                    "optional hook failed"
                );
                Ok(())
            }
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}
