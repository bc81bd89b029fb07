//! Hit chance calculation.

use crate::state::CombatantTags;

use super::{AttackKind, HitRate};

/// Calculate the chance for an attack to land, as a 0-100 percentage.
///
/// # Formula
///
/// ```text
/// raw = ((100 + accuracy - evasion) * hit_rate) / 100
/// raw is halved when the attack is Melee and the target is Flying
/// result = clamp(raw, 0, 100)
/// ```
///
/// The flying penalty applies to the raw value, before the final clamp, so
/// an over-100 raw chance keeps part of its surplus: raw 150 vs a flying
/// target lands at 75, not 50. Ranged and Magical attacks take no penalty.
///
/// `HitRate::Always` skips the roll entirely and reports 100 here.
pub fn calculate_hit_chance(
    accuracy: i32,
    evasion: i32,
    hit_rate: HitRate,
    attack_kind: AttackKind,
    target_tags: CombatantTags,
) -> u32 {
    let rate = match hit_rate {
        HitRate::Always => return 100,
        HitRate::Percent(rate) => rate as i64,
    };

    let mut raw = ((100 + accuracy as i64 - evasion as i64) * rate) / 100;

    if attack_kind == AttackKind::Melee && target_tags.contains(CombatantTags::FLYING) {
        raw /= 2;
    }

    raw.clamp(0, 100) as u32
}
