//! Spellcast client binary.
//!
//! Loads a cast scenario, precalculates it and replays it command by command,
//! printing each popup and waiting the configured delay in between.
//!
//! ```bash
//! SPELLCAST_ACTION_DELAY_MS=100 cargo run -p spellcast-client -- crates/client/scenarios/frost_combo.ron
//! ```
//!
//! Ctrl-C cancels the cast in flight.

mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use spellcast_core::sequence_digest;
use spellcast_runtime::{CastPipeline, CastScenario, CastSummary, Runtime, RuntimeConfig, StepOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    logging::init()?;

    let config = RuntimeConfig::from_env();
    let path = scenario_path()?;
    let scenario = CastScenario::load_from_file(&path)
        .with_context(|| format!("loading scenario {}", path.display()))?;

    let mut runtime = Runtime::builder().config(config).build()?;

    let preview = runtime.precalculate(&scenario.initial, &scenario.cards)?;
    let digest = sequence_digest(&preview).context("digesting precalculated snapshots")?;
    tracing::info!(
        scenario = %scenario.name,
        snapshots = preview.len(),
        digest = %hex::encode(digest),
        "precalculated scenario"
    );

    let mut pipeline = runtime.begin_cast(scenario.initial, scenario.cards);
    let summary = drive(&mut pipeline).await?;

    println!(
        "{} {}: {} damage in {} ms",
        summary.cast,
        if summary.success { "succeeded" } else { "failed" },
        summary.total_damage,
        summary.duration_ms
    );
    Ok(())
}

/// Scenario file from `SPELLCAST_SCENARIO`, or the first argument.
fn scenario_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("SPELLCAST_SCENARIO") {
        return Ok(PathBuf::from(path));
    }
    match std::env::args_os().nth(1) {
        Some(path) => Ok(PathBuf::from(path)),
        None => bail!("usage: spellcast <scenario.ron> (or set SPELLCAST_SCENARIO)"),
    }
}

async fn drive(pipeline: &mut CastPipeline) -> Result<CastSummary> {
    loop {
        match pipeline.advance()? {
            StepOutcome::Continue { delay, popup } => {
                if let Some(popup) = popup {
                    println!("{popup}");
                }
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = tokio::signal::ctrl_c() => {
                        tracing::warn!(cast = %pipeline.cast(), "interrupted, cancelling cast");
                        return Ok(pipeline.cancel()?);
                    }
                }
            }
            StepOutcome::Finished(summary) => return Ok(summary),
        }
    }
}
