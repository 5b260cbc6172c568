use tracing::{info, warn};

use spellcast_core::{Card, GameState, PropertyValue, Timestamp, flatten_cards};

use super::{Command, CommandContext, CommandOutcome};
use crate::api::{Result, RuntimeError};

/// Marks the spell active, precalculates every action and stores the
/// snapshots under the command's cast.
///
/// The live state is only written once precalculation and storage have both
/// succeeded.
#[derive(Debug, Clone)]
pub struct StartSpellCommand {
    cards: Vec<Card>,
}

impl StartSpellCommand {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Command for StartSpellCommand {
    fn name(&self) -> &'static str {
        "start"
    }

    fn execute(&self, ctx: &mut CommandContext<'_>) -> Result<CommandOutcome> {
        let actions = flatten_cards(&self.cards).count();
        if actions == 0 {
            return Err(RuntimeError::EmptyCast);
        }
        if ctx.state.spell.active {
            return Err(RuntimeError::InvalidPhase {
                command: self.name(),
                phase: "active",
            });
        }

        let mut started = prepare_cast(ctx.state, &self.cards, ctx.clock.now());
        started.active_cast = Some(ctx.cast);

        let snapshots = ctx
            .precalc
            .precalculate_spell_with_snapshots(&started, &self.cards)?;

        for snapshot in snapshots.iter() {
            if let Some(fault) = &snapshot.result().fault {
                warn!(
                    target: "runtime::precalc",
                    cast = %ctx.cast,
                    key = %snapshot.key(),
                    code = %fault.code,
                    "precalculation fell back to a no-op: {}",
                    fault.message
                );
            }
        }

        let evicted = ctx.store.store(ctx.cast, snapshots)?;
        for old in evicted {
            warn!(
                target: "runtime::store",
                cast = %ctx.cast,
                evicted = %old,
                "snapshot retention exceeded, evicted oldest cast"
            );
        }

        *ctx.state = started;
        info!(
            target: "runtime::pipeline",
            cast = %ctx.cast,
            cards = self.cards.len(),
            actions,
            "spell cast started"
        );
        Ok(CommandOutcome::Started { actions })
    }
}

/// The state a cast of `cards` is precalculated against.
///
/// Spell progress restarts from scratch and keeps only its history, so
/// modifiers or an action index left from before the cast do not carry over.
pub fn prepare_cast(state: &GameState, cards: &[Card], now: Timestamp) -> GameState {
    let mut prepared = state.clone();
    prepared.spell = std::mem::take(&mut prepared.spell).started(now);
    prepared.spell.properties.insert(
        "cards_played".to_owned(),
        PropertyValue::Int(i64::try_from(cards.len()).unwrap_or(i64::MAX)),
    );
    prepared
}
