/// Engine capacities and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Stack ceiling applied to status definitions that leave `max_stacks` at zero.
    pub default_max_stacks: u32,
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 16;
    pub const MAX_ACTIVE_MODIFIERS: usize = 32;
    pub const MAX_ACTIONS_PER_CAST: usize = 256;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_STACKS: u32 = 99;

    pub fn new() -> Self {
        Self {
            default_max_stacks: Self::DEFAULT_MAX_STACKS,
        }
    }

    pub fn with_default_max_stacks(default_max_stacks: u32) -> Self {
        Self {
            default_max_stacks: default_max_stacks.max(1),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
