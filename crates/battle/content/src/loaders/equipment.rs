//! Equipment table loader.

use anyhow::{Context, bail};
use battle_core::EquipmentDefinition;

/// Loads and validates the embedded equipment table.
pub fn load_equipment() -> anyhow::Result<Vec<EquipmentDefinition>> {
    let raw = include_str!("../../data/equipment.ron");
    let pieces: Vec<EquipmentDefinition> =
        ron::from_str(raw).context("failed to parse equipment.ron")?;

    let mut seen = std::collections::BTreeSet::new();
    for piece in &pieces {
        if !seen.insert(piece.id) {
            bail!("duplicate equipment id {}", piece.id);
        }
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::EquipSlot;

    #[test]
    fn builtin_equipment_table_loads() {
        let pieces = load_equipment().expect("equipment.ron must parse");
        assert!(pieces.len() >= 8);
        assert!(pieces.iter().any(|p| p.slot == EquipSlot::Weapon));
        assert!(pieces.iter().any(|p| p.slot == EquipSlot::Armor));
        assert!(pieces.iter().any(|p| p.slot == EquipSlot::Accessory));
    }
}
