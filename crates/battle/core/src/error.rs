//! Fatal error taxonomy for battle simulation.
//!
//! Only configuration-class failures abort a battle: a roster or skill that
//! references data the oracles cannot resolve would silently corrupt the
//! result if skipped. Data gaps that can be bridged with a documented
//! permissive default (unknown condition keys, unknown stat names) are
//! handled locally with a logged warning instead and never reach this type.

use crate::state::{ClassId, EquipmentId, SkillId, UnitId};

/// Errors surfaced while initializing or running a battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("unit {unit} references unknown class {class}")]
    UnknownClass { unit: UnitId, class: ClassId },

    #[error("unit {unit} references unknown skill {skill}")]
    UnknownSkill { unit: UnitId, skill: SkillId },

    #[error("unit {unit} references unknown equipment {equipment}")]
    UnknownEquipment {
        unit: UnitId,
        equipment: EquipmentId,
    },

    #[error("no growth entry for class {class} at level {level}")]
    MissingGrowth { class: ClassId, level: u8 },

    #[error("team {team:?} fields more than {limit} units")]
    RosterTooLarge { team: crate::state::TeamSide, limit: usize },

    #[error("team {team:?} roster is empty")]
    EmptyRoster { team: crate::state::TeamSide },
}
