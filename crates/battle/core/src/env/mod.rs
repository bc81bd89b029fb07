//! Traits describing read-only static data.
//!
//! Oracles expose the class, skill, equipment, and growth tables the
//! surrounding application owns. The [`BattleEnv`] aggregate bundles them so
//! the engine can reach everything it needs without hard coupling to
//! concrete implementations.

mod classes;
mod equipment;
mod rng;
mod skills;

pub use classes::{ClassDefinition, ClassOracle, GrowthOracle};
pub use equipment::{EquipSlot, EquipmentDefinition, EquipmentOracle};
pub use rng::BattleRng;
pub use skills::{SkillDefinition, SkillKind, SkillOracle, TargetSide};

/// Aggregates the read-only oracles required by the simulation.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    pub classes: &'a dyn ClassOracle,
    pub skills: &'a dyn SkillOracle,
    pub equipment: &'a dyn EquipmentOracle,
    pub growth: &'a dyn GrowthOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(
        classes: &'a dyn ClassOracle,
        skills: &'a dyn SkillOracle,
        equipment: &'a dyn EquipmentOracle,
        growth: &'a dyn GrowthOracle,
    ) -> Self {
        Self {
            classes,
            skills,
            equipment,
            growth,
        }
    }
}
