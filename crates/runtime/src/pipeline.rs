//! Cast pipeline: drives the command queue of one cast.
//!
//! ```text
//! Idle ──start──▶ Started ──execute──▶ Executing ──execute──▶ … ──complete──▶ Completed
//!                    │                     │
//!                    └───────cancel────────┴──────────────────────────────▶ Cancelled
//! ```
//!
//! Every command runs against a scratch copy of the live state that replaces
//! it only on success. A failing command therefore leaves the state as it was;
//! the pipeline then finishes the cast unsuccessfully and returns the error.
//! A refused start finishes nothing, since no spell progress belongs to the
//! cast yet.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use spellcast_core::{
    Card, CastId, CastRecord, Clock, GameState, Popup, PrecalculationService, SpellError,
    flatten_cards,
};

use crate::api::{Result, RuntimeError};
use crate::commands::{
    CancelSpellCommand, CastCommand, Command, CommandContext, CommandOutcome,
    CompleteSpellCommand, ExecuteActionCommand, StartSpellCommand, finish_cast,
};
use crate::hooks::{FinishReason, HookRegistry};
use crate::repository::SnapshotRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastPhase {
    Idle,
    Started,
    Executing,
    Completed,
    Cancelled,
}

impl CastPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Started => "started",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    fn accepts(self, command: &CastCommand) -> bool {
        match command {
            CastCommand::Start(_) => matches!(self, Self::Idle),
            CastCommand::Execute(_) | CastCommand::Complete(_) => {
                matches!(self, Self::Started | Self::Executing)
            }
        }
    }
}

/// Final report of a cast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastSummary {
    pub cast: CastId,
    pub success: bool,
    pub total_damage: i64,
    pub duration_ms: u64,
    pub popups: Vec<Popup>,
}

impl CastSummary {
    fn new(record: &CastRecord, popups: Vec<Popup>) -> Self {
        Self {
            cast: record.cast,
            success: record.success,
            total_damage: record.total_damage,
            duration_ms: record.duration_ms,
            popups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// More commands are queued. The driver waits `delay` before advancing.
    Continue {
        delay: Duration,
        popup: Option<Popup>,
    },
    Finished(CastSummary),
}

/// How a driver waits between commands.
pub trait Continuation {
    fn wait(&mut self, delay: Duration);
}

/// Continues immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Continuation for Immediate {
    fn wait(&mut self, _delay: Duration) {}
}

/// Shared services a pipeline runs its commands against.
#[derive(Clone)]
pub(crate) struct CastServices {
    pub store: Arc<dyn SnapshotRepository>,
    pub precalc: Arc<PrecalculationService>,
    pub clock: Arc<dyn Clock>,
    pub hooks: Arc<HookRegistry>,
}

pub struct CastPipeline {
    cast: CastId,
    state: GameState,
    phase: CastPhase,
    queue: VecDeque<CastCommand>,
    services: CastServices,
    delay: Duration,
    popups: Vec<Popup>,
    summary: Option<CastSummary>,
}

impl CastPipeline {
    pub(crate) fn new(
        cast: CastId,
        state: GameState,
        cards: Vec<Card>,
        services: CastServices,
        delay: Duration,
    ) -> Self {
        let mut queue: VecDeque<CastCommand> = flatten_cards(&cards)
            .cloned()
            .map(|action| CastCommand::Execute(ExecuteActionCommand::new(action)))
            .collect();
        queue.push_front(CastCommand::Start(StartSpellCommand::new(cards)));
        queue.push_back(CastCommand::Complete(CompleteSpellCommand::succeeded()));

        Self {
            cast,
            state,
            phase: CastPhase::Idle,
            queue,
            services,
            delay,
            popups: Vec::new(),
            summary: None,
        }
    }

    pub fn cast(&self) -> CastId {
        self.cast
    }

    pub fn phase(&self) -> CastPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Commands still queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn summary(&self) -> Option<&CastSummary> {
        self.summary.as_ref()
    }

    /// Runs the next queued command.
    pub fn advance(&mut self) -> Result<StepOutcome> {
        if let Some(summary) = &self.summary {
            return Ok(StepOutcome::Finished(summary.clone()));
        }
        let Some(command) = self.queue.pop_front() else {
            return Err(RuntimeError::InvalidPhase {
                command: "advance",
                phase: self.phase.as_str(),
            });
        };

        let outcome = if self.phase.accepts(&command) {
            self.run(&command)
        } else {
            Err(RuntimeError::InvalidPhase {
                command: command.name(),
                phase: self.phase.as_str(),
            })
        };

        match outcome {
            Ok(outcome) => Ok(self.record(outcome)),
            Err(err) => Err(self.fail(&command, err)),
        }
    }

    /// Drives the cast to its end, waiting on `continuation` between commands.
    pub fn run_with<C>(&mut self, continuation: &mut C) -> Result<CastSummary>
    where
        C: Continuation + ?Sized,
    {
        loop {
            match self.advance()? {
                StepOutcome::Continue { delay, .. } => continuation.wait(delay),
                StepOutcome::Finished(summary) => return Ok(summary),
            }
        }
    }

    /// Aborts the cast. Only valid once started and before it finished.
    pub fn cancel(&mut self) -> Result<CastSummary> {
        if matches!(self.phase, CastPhase::Idle) || self.phase.is_terminal() {
            return Err(RuntimeError::InvalidPhase {
                command: CancelSpellCommand.name(),
                phase: self.phase.as_str(),
            });
        }

        let record = match self.run(&CancelSpellCommand)? {
            CommandOutcome::Finished(record) => record,
            _ => {
                return Err(RuntimeError::InvalidPhase {
                    command: CancelSpellCommand.name(),
                    phase: self.phase.as_str(),
                });
            }
        };

        self.queue.clear();
        self.phase = CastPhase::Cancelled;
        let summary = CastSummary::new(&record, std::mem::take(&mut self.popups));
        self.summary = Some(summary.clone());
        Ok(summary)
    }

    /// Runs `command` against a scratch copy, committing it on success.
    fn run(&mut self, command: &dyn Command) -> Result<CommandOutcome> {
        let mut scratch = self.state.clone();
        let outcome = {
            let mut ctx = Self::context(self.cast, &self.services, &mut scratch);
            command.execute(&mut ctx)?
        };
        self.state = scratch;
        Ok(outcome)
    }

    fn context<'a>(
        cast: CastId,
        services: &'a CastServices,
        state: &'a mut GameState,
    ) -> CommandContext<'a> {
        CommandContext {
            cast,
            state,
            store: services.store.as_ref(),
            precalc: services.precalc.as_ref(),
            clock: services.clock.as_ref(),
            hooks: services.hooks.as_ref(),
        }
    }

    fn record(&mut self, outcome: CommandOutcome) -> StepOutcome {
        match outcome {
            CommandOutcome::Started { .. } => {
                self.phase = CastPhase::Started;
                StepOutcome::Continue {
                    delay: self.delay,
                    popup: None,
                }
            }
            CommandOutcome::Executed { popup, .. } => {
                self.phase = CastPhase::Executing;
                self.popups.push(popup.clone());
                StepOutcome::Continue {
                    delay: self.delay,
                    popup: Some(popup),
                }
            }
            CommandOutcome::Finished(record) => {
                self.phase = CastPhase::Completed;
                let summary = CastSummary::new(&record, std::mem::take(&mut self.popups));
                self.summary = Some(summary.clone());
                StepOutcome::Finished(summary)
            }
        }
    }

    /// Finishes the cast unsuccessfully after `command` failed with `err`.
    fn fail(&mut self, command: &CastCommand, err: RuntimeError) -> RuntimeError {
        error!(
            target: "runtime::pipeline",
            cast = %self.cast,
            command = command.name(),
            code = err.error_code(),
            severity = err.severity().as_str(),
            error = %err,
            "command failed"
        );

        if let (CastCommand::Execute(execute), RuntimeError::MissingSnapshot { .. }) = (command, &err) {
            self.popups.push(Popup::fallback(execute.action()));
        }
        self.queue.clear();

        // A refused start never owned the live spell progress.
        if matches!(self.phase, CastPhase::Idle) {
            let record = CastRecord {
                cast: self.cast,
                success: false,
                total_damage: 0,
                duration_ms: 0,
            };
            self.phase = CastPhase::Completed;
            self.summary = Some(CastSummary::new(&record, std::mem::take(&mut self.popups)));
            return err;
        }

        let mut scratch = self.state.clone();
        let finished = {
            let mut ctx = Self::context(self.cast, &self.services, &mut scratch);
            finish_cast(&mut ctx, FinishReason::Failed)
        };
        let record = match finished {
            Ok(record) => {
                self.state = scratch;
                record
            }
            Err(finish_err) => {
                error!(
                    target: "runtime::pipeline",
                    cast = %self.cast,
                    code = finish_err.error_code(),
                    error = %finish_err,
                    "failed to finish cast after command failure"
                );
                CastRecord {
                    cast: self.cast,
                    success: false,
                    total_damage: self.state.spell.total_damage,
                    duration_ms: 0,
                }
            }
        };

        self.phase = CastPhase::Completed;
        self.summary = Some(CastSummary::new(&record, std::mem::take(&mut self.popups)));
        err
    }
}
