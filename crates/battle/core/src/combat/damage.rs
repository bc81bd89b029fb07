//! Damage resolution.
//!
//! [`resolve_damage`] never touches the input state: it clones, draws its
//! rolls from the clone's RNG, mutates the clone's HP and flags, and hands
//! the clone back with an outcome record. The survive-lethal check runs
//! before the HP write is finalized, so revive-prevention style effects can
//! pin the target at 1 HP.

use crate::config::BattleConfig;
use crate::effect::{EffectBundle, PotencyKind};
use crate::state::{BattleFlags, BattlefieldState, UnitId};
use crate::stats::StatKind;

use super::hit::calculate_hit_chance;
use super::{AttackKind, HitRate};

/// What one damage effect did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageOutcome {
    pub target: UnitId,
    pub hit: bool,
    pub critical: bool,
    pub guarded: bool,
    /// The target's guard was pierced by an attacker flag.
    pub guard_broken: bool,
    pub amount: i32,
    pub remaining_hp: i32,
    /// The target hit 0 HP.
    pub lethal: bool,
    /// A survive-lethal flag pinned the target at 1 HP instead.
    pub survived_lethal: bool,
}

/// Resolves one damage effect and returns the successor state.
pub fn resolve_damage(
    state: &BattlefieldState,
    attacker_id: UnitId,
    target_id: UnitId,
    potency: u32,
    attack_kind: AttackKind,
    hit_rate: HitRate,
    bundle: &EffectBundle,
) -> (BattlefieldState, DamageOutcome) {
    let mut next = state.clone();

    let attacker = state.unit(attacker_id).expect("attacker exists");
    let target = state.unit(target_id).expect("target exists");
    let attacker_stats = attacker.stats();
    let target_stats = target.stats();

    let mut outcome = DamageOutcome {
        target: target_id,
        hit: false,
        critical: false,
        guarded: false,
        guard_broken: false,
        amount: 0,
        remaining_hp: target.hp,
        lethal: false,
        survived_lethal: false,
    };

    // True-strike converts the roll into a certain hit and is consumed
    // whether or not it was needed.
    let mut effective_rate = hit_rate;
    if attacker.flags.contains(BattleFlags::TRUE_STRIKE) {
        effective_rate = HitRate::Always;
        if let Some(a) = next.unit_mut(attacker_id) {
            a.flags.remove(BattleFlags::TRUE_STRIKE);
        }
    }

    let chance = calculate_hit_chance(
        attacker_stats.accuracy,
        target_stats.evasion,
        effective_rate,
        attack_kind,
        target.tags,
    );
    let landed = match effective_rate {
        HitRate::Always => true,
        HitRate::Percent(_) => next.rng.roll_d100() <= chance,
    };
    if !landed {
        return (next, outcome);
    }
    outcome.hit = true;

    outcome.critical = next.rng.roll_d100() <= attacker_stats.critical.max(0) as u32;

    if attacker.flags.contains(BattleFlags::GUARD_PIERCE) {
        outcome.guard_broken = true;
        if let Some(a) = next.unit_mut(attacker_id) {
            a.flags.remove(BattleFlags::GUARD_PIERCE);
        }
    } else {
        outcome.guarded = next.rng.roll_d100() <= target_stats.guard.max(0) as u32;
    }

    // Scaling stats and potency boost follow the attack school.
    let (scale_stat, defense_stat, boost_kind) = match attack_kind {
        AttackKind::Melee | AttackKind::Ranged => {
            (StatKind::Attack, StatKind::Defense, PotencyKind::Physical)
        }
        AttackKind::Magical => (StatKind::Magic, StatKind::Resistance, PotencyKind::Magical),
    };

    let total_potency = (potency as i64 + bundle.potency_boost(boost_kind) as i64).max(0);
    let base = (attacker_stats.get(scale_stat).max(0) as i64 * total_potency) / 100;

    let ignore = bundle.ignore_defense.min(100) as i64;
    let effective_defense = (target_stats.get(defense_stat).max(0) as i64 * (100 - ignore)) / 100;

    let mut amount = base - effective_defense;
    if outcome.critical {
        amount *= BattleConfig::CRIT_MULTIPLIER as i64;
    }
    if outcome.guarded {
        amount /= BattleConfig::GUARD_DIVISOR as i64;
    }
    let amount = amount.max(0) as i32;
    outcome.amount = amount;

    let target_next = next.unit_mut(target_id).expect("target exists");
    let mut remaining = target_next.hp - amount;
    if remaining <= 0 && target_next.flags.contains(BattleFlags::SURVIVE_LETHAL) {
        // Checked before the HP write lands, so the unit never reads as
        // defeated in between.
        target_next.flags.remove(BattleFlags::SURVIVE_LETHAL);
        remaining = 1;
        outcome.survived_lethal = true;
    }
    remaining = remaining.max(0);
    target_next.hp = remaining;
    outcome.remaining_hp = remaining;
    outcome.lethal = remaining == 0;

    // Getting hit feeds the defender's passive economy.
    if remaining > 0 {
        target_next.gain_pp(BattleConfig::PP_ON_STRUCK);
    }

    (next, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TeamSide;
    use crate::test_support::{battlefield, plain_stats, unit_at};

    fn ids() -> (UnitId, UnitId) {
        (
            UnitId::new(TeamSide::Home, 0),
            UnitId::new(TeamSide::Away, 0),
        )
    }

    fn certain_hit_state() -> crate::state::BattlefieldState {
        let mut attacker_stats = plain_stats(100);
        attacker_stats.attack = 80;
        attacker_stats.accuracy = 200;
        let mut target_stats = plain_stats(100);
        target_stats.defense = 10;
        target_stats.evasion = 0;
        target_stats.guard = 0;
        battlefield(
            vec![
                unit_at(TeamSide::Home, 0, attacker_stats),
                unit_at(TeamSide::Away, 0, target_stats),
            ],
            42,
        )
    }

    #[test]
    fn input_state_is_never_mutated() {
        let state = certain_hit_state();
        let before = state.clone();
        let (attacker, target) = ids();
        let (_, outcome) = resolve_damage(
            &state,
            attacker,
            target,
            100,
            AttackKind::Melee,
            HitRate::Percent(100),
            &EffectBundle::default(),
        );
        assert!(outcome.hit);
        assert_eq!(state, before);
    }

    #[test]
    fn damage_subtracts_effective_defense() {
        let state = certain_hit_state();
        let (attacker, target) = ids();
        let mut crit_free = state.clone();
        // Zero out crit so the roll cannot double the expectation.
        crit_free.unit_mut(attacker).unwrap().base_stats.critical = 0;
        let (next, outcome) = resolve_damage(
            &crit_free,
            attacker,
            target,
            100,
            AttackKind::Melee,
            HitRate::Always,
            &EffectBundle::default(),
        );
        // 80 attack at 100% potency minus 10 defense.
        assert_eq!(outcome.amount, 70);
        assert_eq!(next.unit(target).unwrap().hp, 30);
    }

    #[test]
    fn ignore_defense_shrinks_the_subtrahend() {
        let state = certain_hit_state();
        let (attacker, target) = ids();
        let bundle = EffectBundle {
            ignore_defense: 50,
            ..Default::default()
        };
        let (_, outcome) = resolve_damage(
            &state,
            attacker,
            target,
            100,
            AttackKind::Melee,
            HitRate::Always,
            &bundle,
        );
        assert_eq!(outcome.amount, 75);
    }

    #[test]
    fn potency_boost_is_additive_with_skill_potency() {
        let state = certain_hit_state();
        let (attacker, target) = ids();
        let bundle = EffectBundle {
            physical_potency: 50,
            ..Default::default()
        };
        let (_, outcome) = resolve_damage(
            &state,
            attacker,
            target,
            100,
            AttackKind::Melee,
            HitRate::Always,
            &bundle,
        );
        // 80 * 150% - 10.
        assert_eq!(outcome.amount, 110);
    }

    #[test]
    fn survive_lethal_pins_at_one_hp_and_is_consumed() {
        let mut state = certain_hit_state();
        let (attacker, target) = ids();
        state.unit_mut(target).unwrap().hp = 5;
        state
            .unit_mut(target)
            .unwrap()
            .flags
            .insert(BattleFlags::SURVIVE_LETHAL);

        let (next, outcome) = resolve_damage(
            &state,
            attacker,
            target,
            100,
            AttackKind::Melee,
            HitRate::Always,
            &EffectBundle::default(),
        );
        assert!(outcome.survived_lethal);
        assert!(!outcome.lethal);
        assert_eq!(next.unit(target).unwrap().hp, 1);
        assert!(
            !next
                .unit(target)
                .unwrap()
                .flags
                .contains(BattleFlags::SURVIVE_LETHAL)
        );

        // A second killing blow goes through.
        let (after, second) = resolve_damage(
            &next,
            attacker,
            target,
            100,
            AttackKind::Melee,
            HitRate::Always,
            &EffectBundle::default(),
        );
        assert!(second.lethal);
        assert_eq!(after.unit(target).unwrap().hp, 0);
    }

    #[test]
    fn defender_gains_pp_when_struck() {
        let state = certain_hit_state();
        let (attacker, target) = ids();
        let before_pp = state.unit(target).unwrap().pp;
        let (next, outcome) = resolve_damage(
            &state,
            attacker,
            target,
            100,
            AttackKind::Melee,
            HitRate::Always,
            &EffectBundle::default(),
        );
        assert!(outcome.hit);
        assert_eq!(next.unit(target).unwrap().pp, before_pp + 1);
    }

    #[test]
    fn magical_attacks_scale_against_resistance() {
        let state = certain_hit_state();
        let (attacker, target) = ids();
        let mut crit_free = state.clone();
        crit_free.unit_mut(attacker).unwrap().base_stats.critical = 0;
        crit_free.unit_mut(attacker).unwrap().base_stats.magic = 60;
        crit_free.unit_mut(target).unwrap().base_stats.resistance = 20;
        let (_, outcome) = resolve_damage(
            &crit_free,
            attacker,
            target,
            100,
            AttackKind::Magical,
            HitRate::Always,
            &EffectBundle::default(),
        );
        assert_eq!(outcome.amount, 40);
    }
}
