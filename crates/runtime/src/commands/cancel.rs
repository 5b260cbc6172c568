use super::{Command, CommandContext, CommandOutcome, finish_cast};
use crate::api::Result;
use crate::hooks::FinishReason;

/// Aborts a cast in flight. Recorded in the history as unsuccessful.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelSpellCommand;

impl Command for CancelSpellCommand {
    fn name(&self) -> &'static str {
        "cancel"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
        finish_cast(ctx, FinishReason::Cancelled).map(CommandOutcome::Finished)
    }
}
