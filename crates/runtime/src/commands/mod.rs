//! Cast commands.
//!
//! A cast replays as a queue of commands: one [`StartSpellCommand`], one
//! [`ExecuteActionCommand`] per action and a closing
//! [`CompleteSpellCommand`]. [`CancelSpellCommand`] aborts a cast in flight.
//! Each command reads and writes the live state only through its
//! [`CommandContext`].

mod cancel;
mod complete;
mod execute;
mod start;

pub use cancel::CancelSpellCommand;
pub use complete::CompleteSpellCommand;
pub use execute::ExecuteActionCommand;
pub use start::{StartSpellCommand, prepare_cast};

pub(crate) use complete::finish_cast;

use spellcast_core::{ActionKey, CastId, CastRecord, Clock, GameState, Popup, PrecalculationService};

use crate::api::Result;
use crate::hooks::HookRegistry;
use crate::repository::SnapshotRepository;

/// Everything a command may touch while it runs.
pub struct CommandContext<'a> {
    pub cast: CastId,
    pub state: &'a mut GameState,
    pub store: &'a dyn SnapshotRepository,
    pub precalc: &'a PrecalculationService,
    pub clock: &'a dyn Clock,
    pub hooks: &'a HookRegistry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Started { actions: usize },
    Executed { key: ActionKey, popup: Popup },
    Finished(CastRecord),
}

pub trait Command {
    fn name(&self) -> &'static str;

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandOutcome>;
}

/// Queued command of a cast.
#[derive(Debug, Clone)]
pub enum CastCommand {
    Start(StartSpellCommand),
    Execute(ExecuteActionCommand),
    Complete(CompleteSpellCommand),
}

impl Command for CastCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Start(command) => command.name(),
            Self::Execute(command) => command.name(),
            Self::Complete(command) => command.name(),
        }
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
        match self {
            Self::Start(command) => command.execute(ctx),
            Self::Execute(command) => command.execute(ctx),
            Self::Complete(command) => command.execute(ctx),
        }
    }
}
