//! Equipment oracle.

use crate::state::{CombatantTags, EquipmentId};
use crate::stats::StatModifier;

/// Slot a piece of equipment occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

/// Static equipment definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentDefinition {
    pub id: EquipmentId,
    pub name: String,
    pub slot: EquipSlot,
    /// Flat stat bonuses folded into the unit's cached base stats.
    pub bonuses: Vec<StatModifier>,
    /// Combatant-type tags granted while equipped.
    pub grants: CombatantTags,
}

/// Oracle resolving equipment ids to definitions.
pub trait EquipmentOracle: Send + Sync {
    fn equipment(&self, id: EquipmentId) -> Option<&EquipmentDefinition>;
}
