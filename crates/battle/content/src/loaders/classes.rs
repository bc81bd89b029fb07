//! Class and growth-curve loader.

use anyhow::{Context, bail};
use battle_core::{ClassDefinition, CombatStats};
use serde::Deserialize;

/// One class entry: the definition plus its growth curve.
#[derive(Clone, Debug, Deserialize)]
pub struct ClassSpec {
    pub def: ClassDefinition,
    /// Stats at level 1.
    pub base: CombatStats,
    /// Per-level increments.
    pub per_level: CombatStats,
}

/// Loads and validates the embedded class table.
pub fn load_classes() -> anyhow::Result<Vec<ClassSpec>> {
    let raw = include_str!("../../data/classes.ron");
    let specs: Vec<ClassSpec> = ron::from_str(raw).context("failed to parse classes.ron")?;

    let mut seen = std::collections::BTreeSet::new();
    for spec in &specs {
        if !seen.insert(spec.def.id) {
            bail!("duplicate class id {}", spec.def.id);
        }
        if spec.base.max_hp <= 0 {
            bail!("class {} has non-positive base max_hp", spec.def.id);
        }
    }
    Ok(specs)
}
