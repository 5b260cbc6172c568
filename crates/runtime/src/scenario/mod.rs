//! Cast scenarios loaded from RON.
//!
//! A scenario pairs the encounter a spell starts from with the cards played,
//! so the same cast can be replayed from a file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use spellcast_core::{Card, GameState, flatten_cards};

use crate::api::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastScenario {
    #[serde(default)]
    pub name: String,

    /// Live state before the cast starts.
    #[serde(default)]
    pub initial: GameState,

    /// Cards in play order.
    pub cards: Vec<Card>,
}

impl CastScenario {
    pub fn new(name: impl Into<String>, initial: GameState, cards: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            initial,
            cards,
        }
    }

    pub fn from_ron_str(content: &str) -> Result<Self> {
        let scenario: CastScenario = ron::from_str(content).map_err(|e| {
            RuntimeError::InvalidScenario(format!("Failed to parse scenario RON: {}", e))
        })?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load scenario from a RON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RuntimeError::InvalidScenario(format!(
                "Failed to read scenario file {}: {}",
                path.display(),
                e
            ))
        })?;

        let scenario = Self::from_ron_str(&content)?;
        tracing::info!(
            target: "runtime::scenario",
            name = %scenario.name,
            cards = scenario.cards.len(),
            actions = flatten_cards(&scenario.cards).count(),
            "loaded scenario"
        );
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        self.initial
            .validate()
            .map_err(|e| RuntimeError::InvalidScenario(format!("Invalid initial state: {}", e)))?;

        if flatten_cards(&self.cards).next().is_none() {
            return Err(RuntimeError::InvalidScenario(
                "scenario plays no actions".to_owned(),
            ));
        }
        Ok(())
    }
}
