//! Stackable status effects carried by an encounter.
//!
//! Instances are kept in insertion order with at most one instance per effect
//! id. Every instance satisfies `1 <= stacks <= max_stacks`; reaching zero
//! stacks removes the instance.

use core::fmt;

use arrayvec::ArrayVec;

use crate::action::Element;
use crate::clock::Timestamp;
use crate::config::EngineConfig;
use crate::state::StateError;

/// Identity of a status effect type, e.g. `chill`.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffectId(pub String);

impl StatusEffectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatusEffectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for StatusEffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// When an effect with a trigger fires.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerTiming {
    SpellCast,
    DamageDealt,
    TurnStart,
    TurnEnd,
}

/// What happens to an instance's stacks after it fires.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DecayPolicy {
    RemoveStack,
    RemoveAll,
    #[default]
    Keep,
}

/// Decay window an effect fades in.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DecayMode {
    EndOfStep,
    EndOfTurn,
    EndOfEncounter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectDefinition {
    pub id: StatusEffectId,
    /// Stack ceiling. Zero means "use the engine default".
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_stacks: u32,
    /// Value contributed by each stack when the effect fires.
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_stack_value: i64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: Option<TriggerTiming>,
    /// Applied to the instance after it fires.
    #[cfg_attr(feature = "serde", serde(default))]
    pub decay: DecayPolicy,
    /// Window in which the instance loses one stack without firing.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scheduled_decay: Option<DecayMode>,
}

impl StatusEffectDefinition {
    pub fn new(id: impl Into<StatusEffectId>, max_stacks: u32) -> Self {
        Self {
            id: id.into(),
            max_stacks,
            per_stack_value: 0,
            element: Element::default(),
            trigger: None,
            decay: DecayPolicy::Keep,
            scheduled_decay: None,
        }
    }

    #[must_use]
    pub fn per_stack(mut self, value: i64, element: Element) -> Self {
        self.per_stack_value = value;
        self.element = element;
        self
    }

    #[must_use]
    pub fn fires_on(mut self, timing: TriggerTiming, decay: DecayPolicy) -> Self {
        self.trigger = Some(timing);
        self.decay = decay;
        self
    }

    #[must_use]
    pub fn fades_on(mut self, mode: DecayMode) -> Self {
        self.scheduled_decay = Some(mode);
        self
    }

    /// Replaces an unset stack ceiling with the engine default.
    #[must_use]
    pub fn resolved(mut self, config: &EngineConfig) -> Self {
        if self.max_stacks == 0 {
            self.max_stacks = config.default_max_stacks;
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectInstance {
    pub definition: StatusEffectDefinition,
    pub stacks: u32,
    pub applied_at: Timestamp,
}

impl StatusEffectInstance {
    pub fn id(&self) -> &StatusEffectId {
        &self.definition.id
    }

    pub fn max_stacks(&self) -> u32 {
        self.definition.max_stacks
    }

    /// Value this instance contributes when it fires.
    pub fn effect_value(&self) -> i64 {
        i64::from(self.stacks).saturating_mul(self.definition.per_stack_value)
    }
}

/// Active status effects of an encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    instances: ArrayVec<StatusEffectInstance, { EngineConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            instances: ArrayVec::new(),
        }
    }

    pub fn get(&self, id: &StatusEffectId) -> Option<&StatusEffectInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    /// Current stack count, zero when the effect is absent.
    pub fn stacks_of(&self, id: &StatusEffectId) -> u32 {
        self.get(id).map_or(0, |i| i.stacks)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Returns the set with `definition`'s instance at exactly `stacks`.
    ///
    /// Zero removes the instance. An existing instance keeps its position and
    /// definition; a new one is appended. The applied-at time is refreshed
    /// whenever the instance is written.
    pub fn with_stacks(
        &self,
        definition: &StatusEffectDefinition,
        stacks: u32,
        now: Timestamp,
    ) -> Result<Self, StateError> {
        let mut next = self.clone();
        let position = next.instances.iter().position(|i| i.id() == &definition.id);

        match position {
            Some(at) if stacks == 0 => {
                next.instances.remove(at);
            }
            Some(at) => {
                let instance = &mut next.instances[at];
                if stacks > instance.max_stacks() {
                    return Err(StateError::StackOverflow {
                        effect: definition.id.clone(),
                        stacks,
                        max: instance.max_stacks(),
                    });
                }
                instance.stacks = stacks;
                instance.applied_at = now;
            }
            None if stacks == 0 => {}
            None => {
                if stacks > definition.max_stacks {
                    return Err(StateError::StackOverflow {
                        effect: definition.id.clone(),
                        stacks,
                        max: definition.max_stacks,
                    });
                }
                next.instances
                    .try_push(StatusEffectInstance {
                        definition: definition.clone(),
                        stacks,
                        applied_at: now,
                    })
                    .map_err(|_| StateError::StatusCapacity {
                        max: EngineConfig::MAX_STATUS_EFFECTS,
                    })?;
            }
        }

        Ok(next)
    }

    /// Returns the set without `id`'s instance.
    pub fn without(&self, id: &StatusEffectId) -> Self {
        let mut next = self.clone();
        next.instances.retain(|i| i.id() != id);
        next
    }

    /// Checks the stack bounds and id uniqueness of a set built outside the
    /// engine (e.g. deserialized).
    pub fn validate(&self) -> Result<(), StateError> {
        for (at, instance) in self.instances.iter().enumerate() {
            if instance.stacks == 0 || instance.stacks > instance.max_stacks() {
                return Err(StateError::StackOverflow {
                    effect: instance.id().clone(),
                    stacks: instance.stacks,
                    max: instance.max_stacks(),
                });
            }
            if self.instances[..at].iter().any(|i| i.id() == instance.id()) {
                return Err(StateError::DuplicateEffect {
                    effect: instance.id().clone(),
                });
            }
        }
        Ok(())
    }
}
