//! Active skill selection.
//!
//! A pure function of unit and state: walk the skill slots in order, skip
//! anything unaffordable or targetless, gate on the slot's tactics, and let
//! preference tactics pick the target. Nothing here mutates.

use crate::env::{BattleEnv, SkillKind};
use crate::state::{BattlefieldState, SkillId, UnitId};
use crate::tactics::{TacticContext, apply_preferences, gating_passes};

use super::targeting::resolve_candidates;

/// The selector's verdict for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkillChoice {
    pub slot_index: usize,
    pub skill: SkillId,
    pub target: UnitId,
}

/// Picks the first qualifying slot and its target, or `None` when the unit
/// has nothing usable this turn (it will standby).
///
/// Gating is disjunctive: with no gating tactics attached a slot is always
/// allowed, otherwise one passing tactic suffices. Preference tactics then
/// order the candidates and the front-most wins.
pub fn select_skill(
    state: &BattlefieldState,
    actor_id: UnitId,
    env: &BattleEnv<'_>,
) -> Option<SkillChoice> {
    let actor = state.unit(actor_id)?;

    for (slot_index, slot) in actor.skills.iter().enumerate() {
        // Roster references are validated at battle start; an unresolvable
        // id cannot appear here.
        let Some(definition) = env.skills.skill(slot.skill) else {
            continue;
        };
        let SkillKind::Active { ap_cost } = definition.kind else {
            continue;
        };
        if ap_cost > actor.ap {
            continue;
        }

        let mut candidates = resolve_candidates(state, actor_id, definition.target);
        if candidates.is_empty() {
            continue;
        }

        let scope = candidates.clone();
        let ctx = TacticContext {
            actor,
            state,
            scope: &scope,
            incoming: None,
        };
        if !gating_passes(&slot.tactics, &ctx) {
            continue;
        }

        apply_preferences(&slot.tactics, &mut candidates, &ctx);
        return Some(SkillChoice {
            slot_index,
            skill: slot.skill,
            target: candidates[0],
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{AttackKind, HitRate};
    use crate::effect::{EffectKind, SkillEffect};
    use crate::env::{
        ClassDefinition, ClassOracle, EquipmentDefinition, EquipmentOracle, GrowthOracle,
        SkillDefinition, SkillOracle, TargetSide,
    };
    use crate::state::{ClassId, EquipmentId, SkillSlot, TeamSide};
    use crate::stats::{CombatStats, GrowthPair};
    use crate::tactics::{Tactic, TacticCategory};
    use crate::test_support::{battlefield, plain_stats, unit_at};

    /// Skill table with a damaging strike (2 AP), a cheap jab (1 AP), and a
    /// heal (1 AP).
    struct Skills {
        strike: SkillDefinition,
        jab: SkillDefinition,
        heal: SkillDefinition,
    }

    impl Skills {
        fn new() -> Self {
            let active = |id: u16, ap_cost: u8, target, effects| SkillDefinition {
                id: SkillId(id),
                name: format!("skill-{id}"),
                kind: SkillKind::Active { ap_cost },
                attack_kind: AttackKind::Melee,
                hit_rate: HitRate::Percent(100),
                target,
                effects,
            };
            Self {
                strike: active(
                    1,
                    2,
                    TargetSide::Enemies,
                    vec![SkillEffect::new(EffectKind::Damage { potency: 150 })],
                ),
                jab: active(
                    2,
                    1,
                    TargetSide::Enemies,
                    vec![SkillEffect::new(EffectKind::Damage { potency: 80 })],
                ),
                heal: active(
                    3,
                    1,
                    TargetSide::Allies,
                    vec![SkillEffect::new(EffectKind::Heal { potency: 100 })],
                ),
            }
        }
    }

    impl SkillOracle for Skills {
        fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
            [&self.strike, &self.jab, &self.heal]
                .into_iter()
                .find(|s| s.id == id)
        }
    }

    struct NoClasses;
    impl ClassOracle for NoClasses {
        fn class(&self, _: ClassId) -> Option<&ClassDefinition> {
            None
        }
    }
    struct NoEquipment;
    impl EquipmentOracle for NoEquipment {
        fn equipment(&self, _: EquipmentId) -> Option<&EquipmentDefinition> {
            None
        }
    }
    struct NoGrowth;
    impl GrowthOracle for NoGrowth {
        fn base_stats(&self, _: ClassId, _: u8, _: GrowthPair) -> Option<CombatStats> {
            None
        }
    }

    fn with_env<R>(skills: &Skills, f: impl FnOnce(&BattleEnv<'_>) -> R) -> R {
        let classes = NoClasses;
        let equipment = NoEquipment;
        let growth = NoGrowth;
        let env = BattleEnv::new(&classes, skills, &equipment, &growth);
        f(&env)
    }

    #[test]
    fn slots_are_tried_in_order_and_cost_gates_apply() {
        let skills = Skills::new();
        let actor = UnitId::new(TeamSide::Home, 0);
        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(100)),
                unit_at(TeamSide::Away, 0, plain_stats(100)),
            ],
            5,
        );
        {
            let unit = state.unit_mut(actor).unwrap();
            unit.skills.push(SkillSlot::new(SkillId(1)));
            unit.skills.push(SkillSlot::new(SkillId(2)));
            unit.ap = 2;
        }

        with_env(&skills, |env| {
            let choice = select_skill(&state, actor, env).unwrap();
            assert_eq!(choice.skill, SkillId(1));

            // With 1 AP the strike is unaffordable; the jab takes over.
            state.unit_mut(actor).unwrap().ap = 1;
            let choice = select_skill(&state, actor, env).unwrap();
            assert_eq!(choice.skill, SkillId(2));

            state.unit_mut(actor).unwrap().ap = 0;
            assert!(select_skill(&state, actor, env).is_none());
        });
    }

    #[test]
    fn gating_tactics_are_disjunctive() {
        let skills = Skills::new();
        let actor = UnitId::new(TeamSide::Home, 0);
        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(100)),
                unit_at(TeamSide::Away, 0, plain_stats(100)),
            ],
            5,
        );
        {
            let unit = state.unit_mut(actor).unwrap();
            // Both gates fail against a full-HP enemy: slot skipped.
            unit.skills.push(SkillSlot::with_tactics(
                SkillId(1),
                [
                    Tactic::new(TacticCategory::Hp, "hp_lt_30"),
                    Tactic::new(TacticCategory::Hp, "hp_lt_10"),
                ],
            ));
            unit.skills.push(SkillSlot::new(SkillId(2)));
        }

        with_env(&skills, |env| {
            let choice = select_skill(&state, actor, env).unwrap();
            assert_eq!(choice.skill, SkillId(2));

            // One passing gate re-enables the first slot.
            state
                .unit_mut(UnitId::new(TeamSide::Away, 0))
                .unwrap()
                .hp = 20;
            let choice = select_skill(&state, actor, env).unwrap();
            assert_eq!(choice.skill, SkillId(1));
        });
    }

    #[test]
    fn preference_tactics_pick_the_target() {
        let skills = Skills::new();
        let actor = UnitId::new(TeamSide::Home, 0);
        let weak = UnitId::new(TeamSide::Away, 1);
        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(100)),
                unit_at(TeamSide::Away, 0, plain_stats(100)),
                unit_at(TeamSide::Away, 1, plain_stats(100)),
            ],
            5,
        );
        state.unit_mut(weak).unwrap().hp = 25;
        state.unit_mut(actor).unwrap().skills.push(SkillSlot::with_tactics(
            SkillId(2),
            [Tactic::new(TacticCategory::TargetPreference, "lowest_hp")],
        ));

        with_env(&skills, |env| {
            let choice = select_skill(&state, actor, env).unwrap();
            assert_eq!(choice.target, weak);
        });
    }

    #[test]
    fn skill_without_candidates_is_skipped() {
        let skills = Skills::new();
        let actor = UnitId::new(TeamSide::Home, 0);
        // No enemies on the board at all: the jab resolves zero candidates,
        // the self-side heal still works.
        let mut state = battlefield(vec![unit_at(TeamSide::Home, 0, plain_stats(100))], 5);
        {
            let unit = state.unit_mut(actor).unwrap();
            unit.skills.push(SkillSlot::new(SkillId(2)));
            unit.skills.push(SkillSlot::new(SkillId(3)));
        }

        with_env(&skills, |env| {
            let choice = select_skill(&state, actor, env).unwrap();
            assert_eq!(choice.skill, SkillId(3));
            assert_eq!(choice.target, actor);
        });
    }
}
