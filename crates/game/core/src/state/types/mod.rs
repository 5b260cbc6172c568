mod spell;
mod status;

pub use spell::{CastId, CastRecord, PropertyValue, SpellProgress};
pub use status::{
    DecayMode, DecayPolicy, StatusEffectDefinition, StatusEffectId, StatusEffectInstance,
    StatusEffects, TriggerTiming,
};
