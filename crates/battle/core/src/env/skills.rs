//! Skill oracle and definitions.

use crate::combat::{AttackKind, HitRate};
use crate::effect::SkillEffect;
use crate::state::SkillId;
use crate::windows::ActivationWindow;

/// Which side of the battlefield a skill targets, relative to its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSide {
    Enemies,
    Allies,
    SelfOnly,
}

/// Active skills spend AP on the owner's turn; passive skills spend PP when
/// their activation window fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillKind {
    Active { ap_cost: u8 },
    Passive { pp_cost: u8, window: ActivationWindow },
}

/// Static skill definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    pub kind: SkillKind,
    pub attack_kind: AttackKind,
    pub hit_rate: HitRate,
    pub target: TargetSide,
    pub effects: Vec<SkillEffect>,
}

impl SkillDefinition {
    pub fn is_passive(&self) -> bool {
        matches!(self.kind, SkillKind::Passive { .. })
    }

    /// AP cost for actives, zero for passives.
    pub fn ap_cost(&self) -> u8 {
        match self.kind {
            SkillKind::Active { ap_cost } => ap_cost,
            SkillKind::Passive { .. } => 0,
        }
    }

    /// PP cost for passives, zero for actives.
    pub fn pp_cost(&self) -> u8 {
        match self.kind {
            SkillKind::Active { .. } => 0,
            SkillKind::Passive { pp_cost, .. } => pp_cost,
        }
    }

    /// The window a passive reacts to, if this is a passive.
    pub fn window(&self) -> Option<ActivationWindow> {
        match self.kind {
            SkillKind::Active { .. } => None,
            SkillKind::Passive { window, .. } => Some(window),
        }
    }

    /// Whether any effect is a damage effect.
    pub fn deals_damage(&self) -> bool {
        self.effects.iter().any(SkillEffect::is_damage)
    }
}

/// Oracle resolving skill ids to definitions.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: SkillId) -> Option<&SkillDefinition>;
}
