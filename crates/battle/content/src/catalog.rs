//! Assembled content tables behind the core oracle traits.

use std::collections::BTreeMap;

use battle_core::{
    BattleEnv, ClassDefinition, ClassId, ClassOracle, CombatStats, EquipmentDefinition,
    EquipmentId, EquipmentOracle, GrowthFocus, GrowthOracle, GrowthPair, SkillDefinition, SkillId,
    SkillOracle, StatKind,
};

use crate::loaders;

/// The full static data set: classes with growth curves, skills, equipment.
///
/// Build once with [`Catalog::builtin`] and hand out [`Catalog::env`]
/// wherever the simulator wants oracles. The tables are immutable after
/// load.
pub struct Catalog {
    classes: BTreeMap<ClassId, ClassDefinition>,
    curves: BTreeMap<ClassId, (CombatStats, CombatStats)>,
    skills: BTreeMap<SkillId, SkillDefinition>,
    equipment: BTreeMap<EquipmentId, EquipmentDefinition>,
}

impl Catalog {
    /// Loads the embedded data files.
    pub fn builtin() -> anyhow::Result<Self> {
        let mut classes = BTreeMap::new();
        let mut curves = BTreeMap::new();
        for spec in loaders::load_classes()? {
            curves.insert(spec.def.id, (spec.base, spec.per_level));
            classes.insert(spec.def.id, spec.def);
        }

        let skills = loaders::load_skills()?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();
        let equipment = loaders::load_equipment()?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        Ok(Self {
            classes,
            curves,
            skills,
            equipment,
        })
    }

    /// Oracle bundle over this catalog.
    pub fn env(&self) -> BattleEnv<'_> {
        BattleEnv::new(self, self, self, self)
    }

    pub fn skill_ids(&self) -> impl Iterator<Item = SkillId> + '_ {
        self.skills.keys().copied()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes.keys().copied()
    }
}

impl ClassOracle for Catalog {
    fn class(&self, id: ClassId) -> Option<&ClassDefinition> {
        self.classes.get(&id)
    }
}

impl SkillOracle for Catalog {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.skills.get(&id)
    }
}

impl EquipmentOracle for Catalog {
    fn equipment(&self, id: EquipmentId) -> Option<&EquipmentDefinition> {
        self.equipment.get(&id)
    }
}

impl GrowthOracle for Catalog {
    /// Level scaling plus growth-pair emphasis: the primary focus stats get
    /// +20%, the secondary +10%.
    fn base_stats(&self, class: ClassId, level: u8, growth: GrowthPair) -> Option<CombatStats> {
        let (base, per_level) = self.curves.get(&class)?;
        let steps = level.saturating_sub(1) as i32;

        let mut stats = CombatStats::default();
        use strum::IntoEnumIterator;
        for kind in StatKind::iter() {
            stats.set(kind, base.get(kind) + per_level.get(kind) * steps);
        }
        for kind in focus_stats(growth.primary) {
            stats.set(kind, stats.get(kind) * 120 / 100);
        }
        for kind in focus_stats(growth.secondary) {
            stats.set(kind, stats.get(kind) * 110 / 100);
        }
        Some(stats)
    }
}

/// The stats a growth focus emphasizes.
fn focus_stats(focus: GrowthFocus) -> [StatKind; 2] {
    match focus {
        GrowthFocus::Vitality => [StatKind::MaxHp, StatKind::Guard],
        GrowthFocus::Might => [StatKind::Attack, StatKind::Critical],
        GrowthFocus::Arcane => [StatKind::Magic, StatKind::Resistance],
        GrowthFocus::Bulwark => [StatKind::Defense, StatKind::Guard],
        GrowthFocus::Finesse => [StatKind::Accuracy, StatKind::Evasion],
        GrowthFocus::Swift => [StatKind::Initiative, StatKind::Evasion],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_assembles() {
        let catalog = Catalog::builtin().expect("builtin data must load");
        assert!(catalog.class_ids().count() >= 6);
        assert!(catalog.skill_ids().count() >= 14);
    }

    #[test]
    fn growth_scales_with_level_and_pair() {
        let catalog = Catalog::builtin().unwrap();
        let class = catalog.class_ids().next().unwrap();
        let pair = GrowthPair::new(GrowthFocus::Might, GrowthFocus::Vitality);

        let low = catalog.base_stats(class, 1, pair).unwrap();
        let high = catalog.base_stats(class, 20, pair).unwrap();
        assert!(high.max_hp > low.max_hp);
        assert!(high.attack > low.attack);

        // Might emphasis beats a defensive pair on attack.
        let tanky = GrowthPair::new(GrowthFocus::Bulwark, GrowthFocus::Vitality);
        let defensive = catalog.base_stats(class, 20, tanky).unwrap();
        assert!(high.attack > defensive.attack);
        assert!(defensive.defense > high.defense);
    }

    #[test]
    fn unknown_class_has_no_growth() {
        let catalog = Catalog::builtin().unwrap();
        assert!(
            catalog
                .base_stats(ClassId(999), 5, GrowthPair::new(GrowthFocus::Might, GrowthFocus::Swift))
                .is_none()
        );
    }
}
