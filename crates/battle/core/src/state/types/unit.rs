//! Static roster definitions.
//!
//! A [`Unit`] is what the roster editor persists: class, level, growth pair,
//! equipment, ordered skill slots, board position. It is owned by the
//! caller and read-only during simulation; battle-time state lives on
//! [`super::context::BattleContext`].

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::stats::GrowthPair;
use crate::tactics::Tactic;

use super::common::{BoardPosition, ClassId, EquipmentId, SkillId};

/// One skill slot with its attached tactics.
///
/// Slot order matters: the selector walks slots top to bottom and takes the
/// first one that qualifies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillSlot {
    pub skill: SkillId,
    pub tactics: ArrayVec<Tactic, { BattleConfig::MAX_TACTICS_PER_SLOT }>,
}

impl SkillSlot {
    pub fn new(skill: SkillId) -> Self {
        Self {
            skill,
            tactics: ArrayVec::new(),
        }
    }

    pub fn with_tactics<I>(skill: SkillId, tactics: I) -> Self
    where
        I: IntoIterator<Item = Tactic>,
    {
        let mut slot = Self::new(skill);
        for tactic in tactics {
            if slot.tactics.is_full() {
                break;
            }
            slot.tactics.push(tactic);
        }
        slot
    }
}

/// Static unit definition as persisted in a team roster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub class: ClassId,
    pub level: u8,
    pub growth: GrowthPair,
    pub equipment: ArrayVec<EquipmentId, { BattleConfig::MAX_EQUIPMENT }>,
    pub skills: ArrayVec<SkillSlot, { BattleConfig::MAX_SKILL_SLOTS }>,
    pub position: BoardPosition,
}

impl Unit {
    pub fn new(class: ClassId, level: u8, growth: GrowthPair, position: BoardPosition) -> Self {
        Self {
            class,
            level,
            growth,
            equipment: ArrayVec::new(),
            skills: ArrayVec::new(),
            position,
        }
    }

    pub fn with_skill(mut self, slot: SkillSlot) -> Self {
        if !self.skills.is_full() {
            self.skills.push(slot);
        }
        self
    }

    pub fn with_equipment(mut self, id: EquipmentId) -> Self {
        if !self.equipment.is_full() {
            self.equipment.push(id);
        }
        self
    }
}
