//! Status effect transitions over a [`StatusEffects`] set.
//!
//! Each function returns a new set plus the per-effect changes it made. The
//! input set is never modified.

use crate::clock::Timestamp;
use crate::config::EngineConfig;
use crate::result::{StatusChange, TriggeredEffect};
use crate::state::{
    DecayMode, DecayPolicy, StateError, StatusEffectDefinition, StatusEffectId, StatusEffects,
    TriggerTiming,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusTransition {
    pub status: StatusEffects,
    pub changes: Vec<StatusChange>,
    pub triggered: Vec<TriggeredEffect>,
}

impl StatusTransition {
    fn unchanged(status: &StatusEffects) -> Self {
        Self {
            status: status.clone(),
            ..Self::default()
        }
    }
}

/// Adds `stacks` to an effect, creating it if absent. Clamped to the ceiling;
/// an add that changes no count records nothing.
pub fn add_stacks(
    status: &StatusEffects,
    definition: &StatusEffectDefinition,
    stacks: u32,
    now: Timestamp,
    config: &EngineConfig,
) -> Result<StatusTransition, StateError> {
    let definition = definition.clone().resolved(config);
    let current = status.get(&definition.id);
    let before = current.map_or(0, |i| i.stacks);
    let max = current.map_or(definition.max_stacks, |i| i.max_stacks());
    let after = before.saturating_add(stacks).min(max);
    if after == before {
        return Ok(StatusTransition::unchanged(status));
    }
    write_stacks(status, &definition, before, after, now)
}

/// Removes up to `stacks` from an effect. Absent effects are left alone.
pub fn remove_stacks(
    status: &StatusEffects,
    effect: &StatusEffectId,
    stacks: u32,
    now: Timestamp,
) -> Result<StatusTransition, StateError> {
    let Some(instance) = status.get(effect) else {
        return Ok(StatusTransition::unchanged(status));
    };
    let before = instance.stacks;
    let after = before.saturating_sub(stacks);
    write_stacks(status, &instance.definition, before, after, now)
}

/// Sets an absolute stack count, clamped to the ceiling. Zero removes.
pub fn set_stacks(
    status: &StatusEffects,
    definition: &StatusEffectDefinition,
    stacks: u32,
    now: Timestamp,
    config: &EngineConfig,
) -> Result<StatusTransition, StateError> {
    let definition = definition.clone().resolved(config);
    let current = status.get(&definition.id);
    let before = current.map_or(0, |i| i.stacks);
    let max = current.map_or(definition.max_stacks, |i| i.max_stacks());
    write_stacks(status, &definition, before, stacks.min(max), now)
}

/// Fires every instance whose trigger matches `timing`, then applies each
/// instance's decay policy.
pub fn trigger_effects(
    status: &StatusEffects,
    timing: TriggerTiming,
    now: Timestamp,
) -> Result<StatusTransition, StateError> {
    let mut transition = StatusTransition::unchanged(status);

    for instance in status.iter().filter(|i| i.definition.trigger == Some(timing)) {
        transition.triggered.push(TriggeredEffect {
            effect: instance.id().clone(),
            element: instance.definition.element,
            value: instance.effect_value(),
        });

        let after = match instance.definition.decay {
            DecayPolicy::RemoveStack => instance.stacks.saturating_sub(1),
            DecayPolicy::RemoveAll => 0,
            DecayPolicy::Keep => continue,
        };
        transition.status = transition.status.with_stacks(&instance.definition, after, now)?;
        transition.changes.push(StatusChange {
            effect: instance.id().clone(),
            before: instance.stacks,
            after,
        });
    }

    Ok(transition)
}

/// Removes one stack from every instance scheduled to fade in `mode`.
pub fn process_decay(
    status: &StatusEffects,
    mode: DecayMode,
    now: Timestamp,
) -> Result<StatusTransition, StateError> {
    let mut transition = StatusTransition::unchanged(status);

    for instance in status
        .iter()
        .filter(|i| i.definition.scheduled_decay == Some(mode))
    {
        let after = instance.stacks.saturating_sub(1);
        transition.status = transition.status.with_stacks(&instance.definition, after, now)?;
        transition.changes.push(StatusChange {
            effect: instance.id().clone(),
            before: instance.stacks,
            after,
        });
    }

    Ok(transition)
}

fn write_stacks(
    status: &StatusEffects,
    definition: &StatusEffectDefinition,
    before: u32,
    after: u32,
    now: Timestamp,
) -> Result<StatusTransition, StateError> {
    Ok(StatusTransition {
        status: status.with_stacks(definition, after, now)?,
        changes: vec![StatusChange {
            effect: definition.id.clone(),
            before,
            after,
        }],
        triggered: Vec::new(),
    })
}
