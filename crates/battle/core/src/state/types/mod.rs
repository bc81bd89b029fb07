//! State types: identifiers, roster definitions, runtime contexts, statuses.

pub mod common;
pub mod context;
pub mod status;
pub mod unit;

pub use common::{
    BoardPosition, ClassId, DayPhase, EquipmentId, Row, SkillId, TeamSide, UnitId,
};
pub use context::{BattleContext, BattleFlags, CombatantTags};
pub use status::{Affliction, AfflictionKind, Polarity, StatusEffect, StatusSet};
pub use unit::{SkillSlot, Unit};
