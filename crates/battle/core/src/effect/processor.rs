//! Non-damage effect accumulation.
//!
//! One pass over a skill's effects produces an [`EffectBundle`]: potency and
//! defense-ignore modifiers for the damage resolver, plus queued heals,
//! resource gains, flags, statuses, and afflictions for the engine to apply.
//! Damage effects are skipped here and resolved separately with the
//! accumulated modifiers in hand.

use crate::state::{AfflictionKind, BattleFlags};
use crate::stats::StatModifier;
use crate::tactics::{TacticContext, conditions_pass};

use super::{EffectKind, EffectTarget, PotencyKind, ResourceKind as Resource, SkillEffect};

/// A buff/debuff waiting to be applied by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueuedStatus {
    pub polarity: crate::state::Polarity,
    pub modifier: StatModifier,
    pub target: EffectTarget,
    pub duration: Option<u32>,
}

/// An affliction roll waiting to be made by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueuedAffliction {
    pub kind: AfflictionKind,
    /// Percentage chance, rolled when applied.
    pub chance: u32,
    pub target: EffectTarget,
}

/// An AP/PP restoration waiting to be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceGain {
    pub resource: Resource,
    pub amount: u8,
    pub target: EffectTarget,
}

/// Accumulated result of the non-damage pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectBundle {
    /// Additive percentage boost for physical damage effects.
    pub physical_potency: i32,
    /// Additive percentage boost for magical damage effects.
    pub magical_potency: i32,
    /// Defense fraction ignored, 0-100. Max across contributions; summing
    /// two 60% sources must not pierce past 100%.
    pub ignore_defense: u32,
    /// Flags to grant, in contribution order.
    pub flags: Vec<(BattleFlags, EffectTarget)>,
    /// Additive heal potency (percentage of the actor's magic stat).
    pub heal_potency: u32,
    /// Additive heal percentage of the target's max HP.
    pub heal_percent: u32,
    /// AP/PP gains, merged per (resource, target).
    pub resource_gains: Vec<ResourceGain>,
    /// Buff/debuff descriptors queued for separate application.
    pub statuses: Vec<QueuedStatus>,
    /// Affliction chances queued for separate application.
    pub afflictions: Vec<QueuedAffliction>,
    /// Afflictions to clear from the target.
    pub cleanses: Vec<AfflictionKind>,
    /// A cover contribution was seen. Honored by the defense subsystem;
    /// nothing is executed in this pass.
    pub cover: bool,
}

impl EffectBundle {
    /// Potency boost for the given damage school.
    pub fn potency_boost(&self, kind: PotencyKind) -> i32 {
        match kind {
            PotencyKind::Physical => self.physical_potency,
            PotencyKind::Magical => self.magical_potency,
        }
    }

    /// Whether anything besides damage modifiers accumulated.
    pub fn has_applications(&self) -> bool {
        !self.flags.is_empty()
            || self.heal_potency > 0
            || self.heal_percent > 0
            || !self.resource_gains.is_empty()
            || !self.statuses.is_empty()
            || !self.afflictions.is_empty()
            || !self.cleanses.is_empty()
    }

    fn merge_resource_gain(&mut self, gain: ResourceGain) {
        if let Some(existing) = self
            .resource_gains
            .iter_mut()
            .find(|g| g.resource == gain.resource && g.target == gain.target)
        {
            existing.amount = existing.amount.saturating_add(gain.amount);
        } else {
            self.resource_gains.push(gain);
        }
    }
}

/// Runs the accumulation pass.
///
/// Each effect's condition list gates it with AND semantics: every attached
/// condition must pass for the effect to contribute. Damage effects are the
/// resolver's business and are ignored here.
pub fn process_effects(effects: &[SkillEffect], ctx: &TacticContext<'_>) -> EffectBundle {
    let mut bundle = EffectBundle::default();

    for effect in effects {
        if effect.is_damage() {
            continue;
        }
        if !conditions_pass(&effect.conditions, ctx) {
            continue;
        }

        match &effect.kind {
            EffectKind::Damage { .. } => unreachable!("damage filtered above"),
            EffectKind::Heal { potency } => bundle.heal_potency += potency,
            EffectKind::HealPercent { percent } => bundle.heal_percent += percent,
            EffectKind::Buff {
                modifier,
                target,
                duration,
            } => bundle.statuses.push(QueuedStatus {
                polarity: crate::state::Polarity::Buff,
                modifier: *modifier,
                target: *target,
                duration: *duration,
            }),
            EffectKind::Debuff {
                modifier,
                target,
                duration,
            } => bundle.statuses.push(QueuedStatus {
                polarity: crate::state::Polarity::Debuff,
                modifier: *modifier,
                target: *target,
                duration: *duration,
            }),
            EffectKind::GrantFlag { flag, target } => bundle.flags.push((*flag, *target)),
            EffectKind::ResourceGain {
                resource,
                amount,
                target,
            } => bundle.merge_resource_gain(ResourceGain {
                resource: *resource,
                amount: *amount,
                target: *target,
            }),
            EffectKind::PotencyBoost { kind, percent } => match kind {
                PotencyKind::Physical => bundle.physical_potency += *percent as i32,
                PotencyKind::Magical => bundle.magical_potency += *percent as i32,
            },
            EffectKind::IgnoreDefense { percent } => {
                bundle.ignore_defense = bundle.ignore_defense.max((*percent).min(100));
            }
            EffectKind::Afflict {
                kind,
                chance,
                target,
            } => bundle.afflictions.push(QueuedAffliction {
                kind: *kind,
                chance: *chance,
                target: *target,
            }),
            EffectKind::Cleanse { kind } => bundle.cleanses.push(*kind),
            EffectKind::Cover => bundle.cover = true,
        }
    }

    bundle
}
