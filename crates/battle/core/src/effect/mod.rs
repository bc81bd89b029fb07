//! Skill effect system.
//!
//! Effects are a closed sum type: adding a kind is a compile-time event,
//! every dispatch site matches exhaustively. Each effect carries its own
//! optional condition list, evaluated with AND semantics when the skill
//! resolves. Non-damage effects accumulate through the
//! [`processor`](self::processor) pass; damage effects are handed to the
//! damage resolver together with the accumulated modifiers.

mod processor;

pub use processor::{EffectBundle, QueuedAffliction, QueuedStatus, ResourceGain, process_effects};

use crate::state::{AfflictionKind, BattleFlags};
use crate::stats::StatModifier;
use crate::tactics::Tactic;

/// Who an effect lands on, relative to the skill's resolved target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectTarget {
    /// The skill's resolved target.
    Target,
    /// The unit executing the skill.
    Actor,
}

/// Resource a [`EffectKind::ResourceGain`] effect restores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    Ap,
    Pp,
}

/// Damage school a [`EffectKind::PotencyBoost`] amplifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PotencyKind {
    Physical,
    Magical,
}

/// The closed set of effect kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    /// Attack-scaled damage against the target. Potency is a percentage of
    /// the scaling stat.
    Damage { potency: u32 },

    /// Magic-scaled restoration on the target.
    Heal { potency: u32 },

    /// Restoration as a percentage of the target's max HP.
    HealPercent { percent: u32 },

    /// Timed or battle-long stat raise.
    Buff {
        modifier: StatModifier,
        target: EffectTarget,
        duration: Option<u32>,
    },

    /// Timed or battle-long stat drop.
    Debuff {
        modifier: StatModifier,
        target: EffectTarget,
        duration: Option<u32>,
    },

    /// Sets a transient battle flag.
    GrantFlag {
        flag: BattleFlags,
        target: EffectTarget,
    },

    /// Restores AP or PP.
    ResourceGain {
        resource: ResourceKind,
        amount: u8,
        target: EffectTarget,
    },

    /// Additive percentage amplifier for damage effects in the same skill.
    PotencyBoost { kind: PotencyKind, percent: u32 },

    /// Fraction of the defender's defense the damage formula skips.
    /// Contributions aggregate by maximum, never by sum.
    IgnoreDefense { percent: u32 },

    /// Applies a persistent affliction with a percentage chance.
    Afflict {
        kind: AfflictionKind,
        chance: u32,
        target: EffectTarget,
    },

    /// Clears an affliction kind from the target.
    Cleanse { kind: AfflictionKind },

    /// Redirect-only contract honored by the defense subsystem; recognized
    /// here but deferred, never executed in the accumulation pass.
    Cover,
}

/// One effect with its gating conditions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillEffect {
    pub kind: EffectKind,
    /// All conditions must pass for the effect to contribute.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Vec<Tactic>,
}

impl SkillEffect {
    pub fn new(kind: EffectKind) -> Self {
        Self {
            kind,
            conditions: Vec::new(),
        }
    }

    pub fn when(mut self, condition: Tactic) -> Self {
        self.conditions.push(condition);
        self
    }

    /// True for the kinds the damage resolver owns.
    pub fn is_damage(&self) -> bool {
        matches!(self.kind, EffectKind::Damage { .. })
    }
}
