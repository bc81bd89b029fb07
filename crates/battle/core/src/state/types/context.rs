//! Runtime unit state.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::BattleConfig;
use crate::stats::{CombatStats, StatKind};

use super::common::{BoardPosition, ClassId, UnitId};
use super::status::{AfflictionKind, StatusSet};
use super::unit::SkillSlot;

bitflags! {
    /// Combatant-type tags affecting effectiveness and evasion rules.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CombatantTags: u8 {
        const FLYING  = 1 << 0;
        const CAVALRY = 1 << 1;
        const ARMORED = 1 << 2;
        const GIANT   = 1 << 3;
        const UNDEAD  = 1 << 4;
        const BEAST   = 1 << 5;
    }
}

impl CombatantTags {
    /// Parses the lowercase tag name used by tactic keys and data files.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "flying" => Some(Self::FLYING),
            "cavalry" => Some(Self::CAVALRY),
            "armored" => Some(Self::ARMORED),
            "giant" => Some(Self::GIANT),
            "undead" => Some(Self::UNDEAD),
            "beast" => Some(Self::BEAST),
            _ => None,
        }
    }
}

bitflags! {
    /// Transient battle flags granted by effects.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct BattleFlags: u8 {
        /// The next killing blow leaves the unit at 1 HP instead. Consumed
        /// on use.
        const SURVIVE_LETHAL = 1 << 0;
        /// The unit is offering cover to its allies this instance.
        const COVERING       = 1 << 1;
        /// The unit's next hit cannot be evaded.
        const TRUE_STRIKE    = 1 << 2;
        /// The unit's next hit cannot be guarded.
        const GUARD_PIERCE   = 1 << 3;
    }
}

impl BattleFlags {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "survive_lethal" => Some(Self::SURVIVE_LETHAL),
            "covering" => Some(Self::COVERING),
            "true_strike" => Some(Self::TRUE_STRIKE),
            "guard_pierce" => Some(Self::GUARD_PIERCE),
            _ => None,
        }
    }
}

/// Runtime state for one fielded unit.
///
/// Created at battle start from a roster [`super::unit::Unit`] plus the
/// static tables; mutated only through copy-on-write transitions on the
/// battlefield state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleContext {
    pub id: UnitId,
    pub class: ClassId,
    pub level: u8,
    pub position: BoardPosition,

    /// Current HP, always within `[0, max_hp]`.
    pub hp: i32,
    /// Action points, always within `[0, 4]`.
    pub ap: u8,
    /// Passive points, always within `[0, 4]`.
    pub pp: u8,

    /// Class + equipment stats, cached at battle start.
    pub base_stats: CombatStats,
    pub tags: CombatantTags,
    pub statuses: StatusSet,
    pub flags: BattleFlags,

    /// Skill slots copied from the roster for lookup convenience.
    pub skills: ArrayVec<SkillSlot, { BattleConfig::MAX_SKILL_SLOTS }>,

    /// Set once the unit has taken (or standby-passed) its turn this round.
    pub acted_this_round: bool,
}

impl BattleContext {
    /// Effective stats: cached base layered with live buff/debuff modifiers.
    pub fn stats(&self) -> CombatStats {
        self.base_stats.with_modifiers(self.statuses.modifiers())
    }

    /// One effective stat.
    pub fn stat(&self, kind: StatKind) -> i32 {
        self.stats().get(kind)
    }

    pub fn max_hp(&self) -> i32 {
        self.stats().max_hp.max(1)
    }

    /// Current HP as a 0-100 percentage of effective max HP.
    pub fn hp_percent(&self) -> i32 {
        (self.hp.max(0) * 100) / self.max_hp()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Whether the unit may take an active turn right now: alive, has AP,
    /// and no turn-blocking affliction.
    pub fn can_act(&self) -> bool {
        self.is_alive()
            && self.ap > 0
            && !self
                .statuses
                .afflictions()
                .any(|a| a.kind.blocks_turn())
    }

    /// Whether passives may fire: alive, not sealed.
    pub fn passives_available(&self) -> bool {
        self.is_alive() && !self.statuses.has_affliction(AfflictionKind::Seal)
    }

    pub fn spend_ap(&mut self, cost: u8) {
        self.ap = self.ap.saturating_sub(cost);
    }

    pub fn spend_pp(&mut self, cost: u8) {
        self.pp = self.pp.saturating_sub(cost);
    }

    /// Clamped AP gain; returns the amount actually gained.
    pub fn gain_ap(&mut self, amount: u8) -> u8 {
        let before = self.ap;
        self.ap = (self.ap + amount).min(BattleConfig::MAX_RESOURCE);
        self.ap - before
    }

    /// Clamped PP gain; returns the amount actually gained.
    pub fn gain_pp(&mut self, amount: u8) -> u8 {
        let before = self.pp;
        self.pp = (self.pp + amount).min(BattleConfig::MAX_RESOURCE);
        self.pp - before
    }
}
