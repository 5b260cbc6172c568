//! Outcome of simulating one action, and its display form.

use core::fmt;

use crate::action::{Action, ActionKind, Element};
use crate::error::SpellError;
use crate::modifier::Modifier;
use crate::state::StatusEffectId;

/// Stack count of one effect before and after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusChange {
    pub effect: StatusEffectId,
    pub before: u32,
    pub after: u32,
}

impl StatusChange {
    pub fn removed(&self) -> u32 {
        self.before.saturating_sub(self.after)
    }

    pub fn added(&self) -> u32 {
        self.after.saturating_sub(self.before)
    }

    pub fn is_unchanged(&self) -> bool {
        self.before == self.after
    }
}

impl fmt::Display for StatusChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.after >= self.before {
            write!(f, "{} +{} ({})", self.effect, self.added(), self.after)
        } else {
            write!(f, "{} -{} ({})", self.effect, self.removed(), self.after)
        }
    }
}

/// Value produced by a status effect firing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggeredEffect {
    pub effect: StatusEffectId,
    pub element: Element,
    pub value: i64,
}

/// Why a precalculation degraded to a no-op transition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrecalcFault {
    pub code: String,
    pub message: String,
}

impl PrecalcFault {
    pub fn from_error<E: SpellError>(error: &E) -> Self {
        Self {
            code: error.error_code().to_owned(),
            message: error.to_string(),
        }
    }
}

/// What an action does to an encounter, computed ahead of time.
///
/// `remaining_modifiers` is the modifier list the next action sees. For damage
/// actions the consumed and remaining lists partition the active list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionResult {
    pub raw_value: i64,
    pub final_value: i64,
    pub element: Option<Element>,
    pub consumed_modifiers: Vec<Modifier>,
    pub remaining_modifiers: Vec<Modifier>,
    pub status_changes: Vec<StatusChange>,
    pub triggered: Vec<TriggeredEffect>,
    pub fault: Option<PrecalcFault>,
}

impl ActionResult {
    /// Result of an action that changes nothing but the action index.
    pub fn no_op(active: &[Modifier], fault: Option<PrecalcFault>) -> Self {
        Self {
            remaining_modifiers: active.to_vec(),
            fault,
            ..Self::default()
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fault.is_some()
    }
}

/// Display payload for one action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Popup {
    pub headline: String,
    pub consumed: Vec<String>,
    pub remaining: Vec<String>,
}

impl Popup {
    pub fn for_result(action: &Action, result: &ActionResult) -> Self {
        let headline = if result.is_fallback() {
            format!("{}: no effect", action.name)
        } else {
            match &action.kind {
                ActionKind::Damage(damage) => {
                    format!("{}: {} {}", action.name, result.final_value, damage.element)
                }
                ActionKind::Modifier(modifier) => format!("{}: {}", action.name, modifier.modifier),
                ActionKind::StatusEffect(_) => status_headline(action, result),
            }
        };

        Self {
            headline,
            consumed: result.consumed_modifiers.iter().map(ToString::to_string).collect(),
            remaining: result.remaining_modifiers.iter().map(ToString::to_string).collect(),
        }
    }

    /// Degraded display from the unmodified action when no snapshot exists.
    pub fn fallback(action: &Action) -> Self {
        Self {
            headline: format!("{}: {}", action.name, action.base_value()),
            consumed: Vec::new(),
            remaining: Vec::new(),
        }
    }
}

fn status_headline(action: &Action, result: &ActionResult) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !result.triggered.is_empty() {
        parts.push(format!("{}", result.final_value));
    }
    parts.extend(
        result
            .status_changes
            .iter()
            .filter(|c| !c.is_unchanged())
            .map(ToString::to_string),
    );
    if parts.is_empty() {
        format!("{}: no change", action.name)
    } else {
        format!("{}: {}", action.name, parts.join(", "))
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline)?;
        if !self.consumed.is_empty() {
            write!(f, "\n  consumed: {}", self.consumed.join(", "))?;
        }
        if !self.remaining.is_empty() {
            write!(f, "\n  remaining: {}", self.remaining.join(", "))?;
        }
        Ok(())
    }
}
