//! Class and growth oracles.

use crate::state::{ClassId, CombatantTags};
use crate::stats::{CombatStats, GrowthPair};

/// Static class definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDefinition {
    pub id: ClassId,
    pub name: String,
    /// Combatant-type tags every member of the class carries.
    pub tags: CombatantTags,
}

/// Oracle resolving class ids to definitions.
pub trait ClassOracle: Send + Sync {
    fn class(&self, id: ClassId) -> Option<&ClassDefinition>;
}

/// Oracle computing base stats from the class growth curves.
///
/// The curve data stays outside the core; the simulation only ever asks for
/// the finished numbers at a given level and growth pair.
pub trait GrowthOracle: Send + Sync {
    fn base_stats(&self, class: ClassId, level: u8, growth: GrowthPair) -> Option<CombatStats>;
}
