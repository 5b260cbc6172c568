use tracing::info;

use spellcast_core::CastRecord;

use super::{Command, CommandContext, CommandOutcome};
use crate::api::Result;
use crate::hooks::{CastFinished, FinishReason};

/// Closes the cast: records it in the spell history, resets the spell to idle
/// and runs the lifecycle hooks (which clear the cast's snapshots).
#[derive(Debug, Clone)]
pub struct CompleteSpellCommand {
    success: bool,
}

impl CompleteSpellCommand {
    pub fn new(success: bool) -> Self {
        Self { success }
    }

    pub fn succeeded() -> Self {
        Self::new(true)
    }
}

impl Command for CompleteSpellCommand {
    fn name(&self) -> &'static str {
        "complete"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
        let reason = if self.success {
            FinishReason::Completed
        } else {
            FinishReason::Failed
        };
        finish_cast(ctx, reason).map(CommandOutcome::Finished)
    }
}

/// Shared ending of completion, cancellation and failure.
///
/// Hooks run before the live state is touched, so a failing critical hook
/// leaves the state as it was.
pub(crate) fn finish_cast(ctx: &mut CommandContext<'_>, reason: FinishReason) -> Result<CastRecord> {
    let now = ctx.clock.now();
    let started_at = ctx.state.spell.started_at.unwrap_or(now);
    let record = CastRecord {
        cast: ctx.cast,
        success: reason == FinishReason::Completed,
        total_damage: ctx.state.spell.total_damage,
        duration_ms: now.millis_since(started_at),
    };

    let event = CastFinished {
        cast: ctx.cast,
        reason,
        record: record.clone(),
    };
    ctx.hooks.cast_finished(&event, ctx.store)?;

    ctx.state.spell = std::mem::take(&mut ctx.state.spell).finished(record.clone());
    ctx.state.active_cast = None;

    info!(
        target: "runtime::pipeline",
        cast = %ctx.cast,
        reason = reason.as_str(),
        success = record.success,
        total_damage = record.total_damage,
        duration_ms = record.duration_ms,
        "spell cast finished"
    );
    Ok(record)
}
