//! Skill table loader.

use anyhow::{Context, bail};
use battle_core::{EffectKind, SkillDefinition};

/// Loads and validates the embedded skill table.
pub fn load_skills() -> anyhow::Result<Vec<SkillDefinition>> {
    let raw = include_str!("../../data/skills.ron");
    let skills: Vec<SkillDefinition> = ron::from_str(raw).context("failed to parse skills.ron")?;

    let mut seen = std::collections::BTreeSet::new();
    for skill in &skills {
        if !seen.insert(skill.id) {
            bail!("duplicate skill id {}", skill.id);
        }
        for effect in &skill.effects {
            match effect.kind {
                EffectKind::IgnoreDefense { percent } if percent > 100 => {
                    bail!("skill {}: ignore_defense above 100%", skill.id)
                }
                EffectKind::Afflict { chance, .. } if chance > 100 => {
                    bail!("skill {}: affliction chance above 100%", skill.id)
                }
                _ => {}
            }
        }
    }
    Ok(skills)
}
