/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Hard cap on rounds before the battle is scored as-is.
    pub round_limit: u32,

    /// Consecutive standby-only rounds that end the battle as a stalemate.
    pub standby_round_limit: u32,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Units per team (two rows of three board columns).
    pub const TEAM_SIZE: usize = 6;
    pub const MAX_SKILL_SLOTS: usize = 4;
    /// At most two tactics may be attached to a skill slot.
    pub const MAX_TACTICS_PER_SLOT: usize = 2;
    pub const MAX_EQUIPMENT: usize = 3;
    pub const MAX_AFFLICTIONS: usize = 8;
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== resource model =====
    /// AP and PP are both capped here, always.
    pub const MAX_RESOURCE: u8 = 4;
    pub const STARTING_AP: u8 = 4;
    pub const STARTING_PP: u8 = 2;
    pub const STANDBY_AP_GAIN: u8 = 1;
    pub const STANDBY_PP_GAIN: u8 = 1;
    /// PP granted to a defender for each hit that lands on them.
    pub const PP_ON_STRUCK: u8 = 1;

    // ===== combat tuning =====
    pub const CRIT_MULTIPLIER: u32 = 2;
    pub const GUARD_DIVISOR: u32 = 2;
    /// Max-HP percentage lost to a poison tick at the owner's turn start.
    pub const POISON_TICK_PERCENT: u32 = 5;
    pub const BURN_TICK_PERCENT: u32 = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ROUND_LIMIT: u32 = 100;
    pub const DEFAULT_STANDBY_ROUND_LIMIT: u32 = 3;

    pub fn new() -> Self {
        Self {
            round_limit: Self::DEFAULT_ROUND_LIMIT,
            standby_round_limit: Self::DEFAULT_STANDBY_ROUND_LIMIT,
        }
    }

    pub fn with_round_limit(round_limit: u32) -> Self {
        Self {
            round_limit,
            ..Self::new()
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
