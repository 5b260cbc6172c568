//! Spell progress: the spell-side half of an encounter.

use core::fmt;
use std::collections::BTreeMap;

use crate::action::{ActionIndex, Element};
use crate::clock::Timestamp;
use crate::modifier::Modifier;

/// Correlation id of one cast. Allocated by the runtime, never reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CastId(pub u64);

impl fmt::Display for CastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cast-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    Int(i64),
    Flag(bool),
    Text(String),
}

impl PropertyValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Flag(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Outcome of a finished cast, appended to the spell history.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastRecord {
    pub cast: CastId,
    pub success: bool,
    pub total_damage: i64,
    pub duration_ms: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellProgress {
    pub active: bool,
    pub properties: BTreeMap<String, PropertyValue>,
    /// Active modifiers in application order.
    pub modifiers: Vec<Modifier>,
    pub total_damage: i64,
    pub damage_by_element: BTreeMap<Element, i64>,
    pub history: Vec<CastRecord>,
    pub started_at: Option<Timestamp>,
    pub action_index: ActionIndex,
}

impl SpellProgress {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn damage_of(&self, element: Element) -> i64 {
        self.damage_by_element.get(&element).copied().unwrap_or(0)
    }

    /// Fresh per-cast progress. History is carried over.
    #[must_use]
    pub fn started(self, now: Timestamp) -> Self {
        Self {
            active: true,
            started_at: Some(now),
            history: self.history,
            ..Self::default()
        }
    }

    /// Idle progress with `record` appended to the history.
    #[must_use]
    pub fn finished(self, record: CastRecord) -> Self {
        let mut history = self.history;
        history.push(record);
        Self {
            history,
            ..Self::default()
        }
    }

    pub fn last_record(&self) -> Option<&CastRecord> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_finish_keep_history_only() {
        let mut progress = SpellProgress::idle().started(Timestamp(10));
        progress.total_damage = 42;
        progress.modifiers.push(Modifier::additive(1));
        progress.action_index = ActionIndex(3);

        let record = CastRecord {
            cast: CastId(1),
            success: true,
            total_damage: 42,
            duration_ms: 5,
        };
        let idle = progress.finished(record.clone());
        assert!(!idle.active);
        assert_eq!(idle.total_damage, 0);
        assert!(idle.modifiers.is_empty());
        assert_eq!(idle.action_index, ActionIndex::ZERO);
        assert_eq!(idle.last_record(), Some(&record));

        let again = idle.started(Timestamp(20));
        assert_eq!(again.history.len(), 1);
        assert_eq!(again.started_at, Some(Timestamp(20)));
    }
}
