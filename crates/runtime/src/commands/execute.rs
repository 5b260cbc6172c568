use tracing::debug;

use spellcast_core::{Action, ActionKey, StateError, apply_encounter_snapshot};

use super::{Command, CommandContext, CommandOutcome};
use crate::api::{Result, RuntimeError};

/// Replays one action from its stored snapshot.
///
/// Nothing is recomputed: the snapshot keyed by the action and the live action
/// index is looked up and its resulting sections replace the live ones.
#[derive(Debug, Clone)]
pub struct ExecuteActionCommand {
    action: Action,
}

impl ExecuteActionCommand {
    pub fn new(action: Action) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}

impl Command for ExecuteActionCommand {
    fn name(&self) -> &'static str {
        "execute"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
        if !ctx.state.spell.active || ctx.state.active_cast != Some(ctx.cast) {
            return Err(RuntimeError::SpellNotActive { cast: ctx.cast });
        }

        let current = ctx.state.spell.action_index;
        let key = ActionKey::new(self.action.id, current);
        let snapshot = ctx
            .store
            .get_for_action(ctx.cast, &key)?
            .ok_or(RuntimeError::MissingSnapshot { cast: ctx.cast, key })?;

        let expected = current
            .checked_next()
            .ok_or(StateError::IndexOverflow { current })?;
        let found = snapshot.resulting_state().action_index();
        if found != expected {
            return Err(RuntimeError::IndexMismatch {
                key,
                expected,
                found,
            });
        }

        *ctx.state = apply_encounter_snapshot(&*ctx.state, &snapshot);
        debug!(
            target: "runtime::pipeline",
            cast = %ctx.cast,
            key = %key,
            value = snapshot.result().final_value,
            "replayed action"
        );

        Ok(CommandOutcome::Executed {
            key,
            popup: snapshot.popup().clone(),
        })
    }
}
