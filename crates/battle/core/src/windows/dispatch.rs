//! Window dispatch.
//!
//! One dispatch run covers one active-skill instance (or one boundary
//! event). The loop drains the pending-window queue in priority order,
//! finds the first eligible passive for each window, executes it through
//! the shared skill application path, and feeds any triggers that execution
//! raised back into the queue. A non-limited window re-queues after firing
//! so remaining units get their turn at it; a limited window is exhausted
//! for the whole instance after one firing. The loop terminates when no
//! pending windows remain.

use tracing::debug;

use crate::combat::AttackKind;
use crate::env::{BattleEnv, SkillDefinition, SkillKind};
use crate::event::BattleEventKind;
use crate::execute::{apply_skill, offers_cover};
use crate::skill::{preferred_focus, resolve_candidates};
use crate::state::{BattlefieldState, UnitId};
use crate::tactics::{TacticContext, apply_preferences, gating_passes};

use super::instance::WindowInstanceContext;
use super::triggers::{Trigger, windows_for};
use super::ActivationWindow;

/// Priority-ordered reactive dispatch over the window catalog.
pub struct PassiveWindowSystem;

impl PassiveWindowSystem {
    /// Runs the dispatch loop for one instance, seeded with the given
    /// triggers, and returns the successor state.
    pub fn run(
        mut state: BattlefieldState,
        instance: &mut WindowInstanceContext,
        seed_triggers: Vec<Trigger>,
        env: &BattleEnv<'_>,
    ) -> BattlefieldState {
        let mut trigger_log = seed_triggers;
        let mut enqueued = 0;

        loop {
            while enqueued < trigger_log.len() {
                for window in windows_for(&trigger_log[enqueued]) {
                    instance.enqueue(window, enqueued);
                }
                enqueued += 1;
            }

            let Some(pending) = instance.pop_next() else {
                break;
            };
            if instance.limited_exhausted(pending.window) {
                continue;
            }
            let trigger = trigger_log[pending.trigger_index];

            let fired = Self::fire_window(
                &mut state,
                instance,
                pending.window,
                &trigger,
                env,
                &mut trigger_log,
            );

            // Re-queue so other units can still answer a per-unit window.
            if fired && !pending.window.limited() {
                instance.enqueue(pending.window, pending.trigger_index);
            }
        }

        state
    }

    /// Finds and executes the first eligible passive for one window.
    /// Returns whether anything fired.
    fn fire_window(
        state: &mut BattlefieldState,
        instance: &mut WindowInstanceContext,
        window: ActivationWindow,
        trigger: &Trigger,
        env: &BattleEnv<'_>,
        trigger_log: &mut Vec<Trigger>,
    ) -> bool {
        for unit_id in responders(window, trigger, state) {
            let Some(unit) = state.unit(unit_id) else {
                continue;
            };
            if !unit.passives_available() || instance.is_used(unit_id, window) {
                continue;
            }

            let slots: Vec<_> = unit.skills.iter().cloned().collect();
            for slot in slots {
                let Some(definition) = env.skills.skill(slot.skill) else {
                    continue;
                };
                let SkillKind::Passive { pp_cost, window: skill_window } = definition.kind else {
                    continue;
                };
                if skill_window != window || pp_cost > unit.pp {
                    continue;
                }

                let mut candidates = resolve_candidates(state, unit_id, definition.target);
                if candidates.is_empty() {
                    continue;
                }

                let scope = candidates.clone();
                let ctx = TacticContext {
                    actor: unit,
                    state,
                    scope: &scope,
                    incoming: incoming_kind(trigger),
                };
                if !gating_passes(&slot.tactics, &ctx) {
                    continue;
                }

                // Focus first, then let preference tactics reorder.
                if let Some(focus) = preferred_focus(trigger, definition.target)
                    && let Some(at) = candidates.iter().position(|&c| c == focus)
                {
                    candidates.remove(at);
                    candidates.insert(0, focus);
                }
                apply_preferences(&slot.tactics, &mut candidates, &ctx);
                let target = candidates[0];

                debug!(
                    target: "battle_core::windows",
                    window = window.as_ref(),
                    unit = %unit_id,
                    skill = %definition.id,
                    "passive fires"
                );

                Self::execute_passive(state, instance, unit_id, definition, target, window);
                let application = apply_skill(state, unit_id, definition, target);
                *state = application.state;
                instance.initiative_changed |= application.initiative_changed;
                trigger_log.extend(application.triggers);

                instance.mark_used(unit_id, window);
                return true;
            }
        }
        false
    }

    /// Pre-application bookkeeping for one passive execution: PP spend,
    /// selection event, cover redirect registration.
    fn execute_passive(
        state: &mut BattlefieldState,
        instance: &mut WindowInstanceContext,
        unit_id: UnitId,
        definition: &SkillDefinition,
        target: UnitId,
        window: ActivationWindow,
    ) {
        if let Some(unit) = state.unit_mut(unit_id) {
            unit.spend_pp(definition.pp_cost());
        }
        state.push_event(BattleEventKind::SkillSelected {
            actor: unit_id,
            skill: definition.id,
            target,
        });
        if window == ActivationWindow::OnCover && offers_cover(definition) {
            instance.cover_redirect = Some(unit_id);
        }
    }
}

/// Units a window addresses for a given trigger, in id order.
///
/// The window name encodes the perspective: `OnStruck` speaks to the struck
/// unit, `OnAllyStruck` to its living allies, `OnHit` to the attacker, and
/// so on. Boundary windows address everyone.
pub fn responders(
    window: ActivationWindow,
    trigger: &Trigger,
    state: &BattlefieldState,
) -> Vec<UnitId> {
    use ActivationWindow::*;

    let all = || -> Vec<UnitId> { state.units.values().filter(|u| u.is_alive()).map(|u| u.id).collect() };
    let only = |id: UnitId| -> Vec<UnitId> { vec![id] };
    let allies_excluding = |id: UnitId| -> Vec<UnitId> {
        state
            .allies_of(id)
            .map(|u| u.id)
            .filter(|&other| other != id)
            .collect()
    };
    let enemies_of = |id: UnitId| -> Vec<UnitId> { state.enemies_of(id).map(|u| u.id).collect() };

    match (window, trigger) {
        // Boundary windows address every living unit.
        (BattleStart | RoundStart | RoundEnd | BattleEnd, _) => all(),
        (TurnStart, Trigger::TurnStart { unit }) | (TurnEnd, Trigger::TurnEnd { unit }) => {
            only(*unit)
        }

        (SkillSelected, Trigger::SkillSelected { actor }) => enemies_of(*actor),
        (BeforeAttack, Trigger::SkillSelected { actor }) => only(*actor),
        (BeforeAllySkill, Trigger::SkillSelected { actor }) => allies_excluding(*actor),
        (BeforeEnemySkill, Trigger::SkillSelected { actor }) => enemies_of(*actor),
        (AfterAttack, Trigger::SkillResolved { actor }) => only(*actor),
        (AfterAllySkill, Trigger::SkillResolved { actor }) => allies_excluding(*actor),
        (AfterEnemySkill, Trigger::SkillResolved { actor }) => enemies_of(*actor),

        (OnCover, Trigger::AttackIncoming { target, .. }) => allies_excluding(*target),

        (
            OnStruck | OnMeleeStruck | OnRangedStruck | OnMagicalStruck | OnCriticalStruck,
            Trigger::Hit { target, .. },
        ) => only(*target),
        (OnFrontRowStruck | OnBackRowStruck, Trigger::Hit { target, .. }) => only(*target),
        (OnAllyStruck, Trigger::Hit { target, .. }) => allies_excluding(*target),
        (
            OnHit | OnMeleeHit | OnRangedHit | OnMagicalHit | OnCriticalHit | OnKill,
            Trigger::Hit { attacker, .. },
        ) => only(*attacker),

        (OnMiss, Trigger::Evaded { attacker, .. }) => only(*attacker),
        (OnEvade, Trigger::Evaded { target, .. }) => only(*target),
        (OnAllyEvade, Trigger::Evaded { target, .. }) => allies_excluding(*target),
        (OnGuard, Trigger::Guarded { target, .. }) => only(*target),
        (OnAllyGuard, Trigger::Guarded { target, .. }) => allies_excluding(*target),
        (OnGuardBreak, Trigger::Guarded { attacker, .. }) => only(*attacker),

        (OnSurviveLethal, Trigger::SurvivedLethal { unit }) => only(*unit),

        (OnHealGiven | OnOverheal, Trigger::Heal { source, .. }) => only(*source),
        (OnHealReceived, Trigger::Heal { target, .. }) => only(*target),
        (OnAllyHealed, Trigger::Heal { target, .. }) => allies_excluding(*target),

        (OnBuffApplied, Trigger::BuffApplied { source, .. }) => only(*source),
        (OnBuffReceived, Trigger::BuffApplied { target, .. }) => only(*target),
        (OnAllyBuffed, Trigger::BuffApplied { target, .. }) => allies_excluding(*target),
        (OnDebuffApplied, Trigger::DebuffApplied { source, .. }) => only(*source),
        (OnDebuffReceived, Trigger::DebuffApplied { target, .. }) => only(*target),
        (OnAllyDebuffed, Trigger::DebuffApplied { target, .. }) => allies_excluding(*target),
        (OnBuffExpired | OnDebuffExpired, Trigger::StatusExpired { unit, .. }) => only(*unit),

        (OnAfflictionApplied, Trigger::AfflictionApplied { source, .. }) => only(*source),
        (OnAfflictionReceived, Trigger::AfflictionApplied { target, .. }) => only(*target),
        (OnAllyAfflicted, Trigger::AfflictionApplied { target, .. }) => allies_excluding(*target),
        (OnAfflictionCleared, Trigger::AfflictionCleared { unit }) => only(*unit),
        (OnAfflictionTick, Trigger::AfflictionTick { unit }) => only(*unit),

        (OnDefeat, Trigger::UnitDefeated { unit }) => only(*unit),
        (OnAllyDefeated, Trigger::UnitDefeated { unit }) => allies_excluding(*unit),
        (OnEnemyDefeated, Trigger::UnitDefeated { unit }) => enemies_of(*unit),
        (OnLastAllyStanding, Trigger::UnitDefeated { unit }) => {
            let living: Vec<UnitId> = state.living(unit.team).map(|u| u.id).collect();
            if living.len() == 1 { living } else { Vec::new() }
        }

        (OnApSpent, Trigger::ApSpent { unit })
        | (OnApGained, Trigger::ApGained { unit })
        | (OnPpGained, Trigger::PpGained { unit })
        | (OnResourceFull, Trigger::ResourceFull { unit }) => only(*unit),

        // A window the trigger did not open has no responders.
        _ => Vec::new(),
    }
}

fn incoming_kind(trigger: &Trigger) -> Option<AttackKind> {
    match trigger {
        Trigger::AttackIncoming { kind, .. } | Trigger::Hit { kind, .. } => Some(*kind),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::HitRate;
    use crate::effect::{EffectKind, SkillEffect};
    use crate::env::{
        ClassDefinition, ClassOracle, EquipmentDefinition, EquipmentOracle, GrowthOracle,
        SkillOracle, TargetSide,
    };
    use crate::state::{ClassId, EquipmentId, Row, SkillId, SkillSlot, TeamSide};
    use crate::stats::{CombatStats, GrowthPair};
    use crate::test_support::{battlefield, plain_stats, unit_at};

    struct Passives(Vec<SkillDefinition>);

    impl SkillOracle for Passives {
        fn skill(&self, id: SkillId) -> Option<&SkillDefinition> {
            self.0.iter().find(|s| s.id == id)
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

    fn counter_passive() -> SkillDefinition {
        SkillDefinition {
            id: SkillId(10),
            name: "counter".into(),
            kind: SkillKind::Passive {
                pp_cost: 1,
                window: ActivationWindow::OnStruck,
            },
            attack_kind: AttackKind::Melee,
            hit_rate: HitRate::Always,
            target: TargetSide::Enemies,
            effects: vec![SkillEffect::new(EffectKind::Damage { potency: 50 })],
        }
    }

    fn opening_buff() -> SkillDefinition {
        SkillDefinition {
            id: SkillId(11),
            name: "war cry".into(),
            kind: SkillKind::Passive {
                pp_cost: 1,
                window: ActivationWindow::BattleStart,
            },
            attack_kind: AttackKind::Melee,
            hit_rate: HitRate::Always,
            target: TargetSide::SelfOnly,
            effects: vec![SkillEffect::new(EffectKind::Buff {
                modifier: crate::stats::StatModifier::flat(crate::stats::StatKind::Attack, 10),
                target: crate::effect::EffectTarget::Actor,
                duration: None,
            })],
        }
    }

    #[test]
    fn struck_unit_counters_its_attacker() {
        let skills = Passives(vec![counter_passive()]);
        let classes = NoClasses;
        let equipment = NoEquipment;
        let growth = NoGrowth;
        let env = BattleEnv::new(&classes, &skills, &equipment, &growth);

        let attacker = UnitId::new(TeamSide::Home, 0);
        let defender = UnitId::new(TeamSide::Away, 0);
        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(200)),
                unit_at(TeamSide::Away, 0, plain_stats(200)),
            ],
            17,
        );
        state
            .unit_mut(defender)
            .unwrap()
            .skills
            .push(SkillSlot::new(SkillId(10)));

        let hp_before = state.unit(attacker).unwrap().hp;
        let mut instance = WindowInstanceContext::new();
        let next = PassiveWindowSystem::run(
            state,
            &mut instance,
            vec![Trigger::Hit {
                attacker,
                target: defender,
                kind: AttackKind::Melee,
                critical: false,
                lethal: false,
                target_row: Row::Front,
            }],
            &env,
        );

        // Counter potency 70 of attack 50 is 35, minus 20 defense = 15.
        assert!(next.unit(attacker).unwrap().hp < hp_before);
        assert_eq!(next.unit(defender).unwrap().pp, 1);
    }

    #[test]
    fn non_limited_window_fires_once_per_unit() {
        let skills = Passives(vec![opening_buff()]);
        let classes = NoClasses;
        let equipment = NoEquipment;
        let growth = NoGrowth;
        let env = BattleEnv::new(&classes, &skills, &equipment, &growth);

        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(100)),
                unit_at(TeamSide::Home, 1, plain_stats(100)),
                unit_at(TeamSide::Away, 0, plain_stats(100)),
            ],
            17,
        );
        for index in 0..2 {
            state
                .unit_mut(UnitId::new(TeamSide::Home, index))
                .unwrap()
                .skills
                .push(SkillSlot::new(SkillId(11)));
        }

        let mut instance = WindowInstanceContext::new();
        let next =
            PassiveWindowSystem::run(state, &mut instance, vec![Trigger::BattleStart], &env);

        // Both carriers fired exactly once.
        for index in 0..2 {
            let id = UnitId::new(TeamSide::Home, index);
            assert_eq!(
                next.unit(id).unwrap().stat(crate::stats::StatKind::Attack),
                60
            );
            assert_eq!(next.unit(id).unwrap().pp, 1);
        }
    }

    #[test]
    fn sealed_units_never_react() {
        let skills = Passives(vec![counter_passive()]);
        let classes = NoClasses;
        let equipment = NoEquipment;
        let growth = NoGrowth;
        let env = BattleEnv::new(&classes, &skills, &equipment, &growth);

        let attacker = UnitId::new(TeamSide::Home, 0);
        let defender = UnitId::new(TeamSide::Away, 0);
        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(200)),
                unit_at(TeamSide::Away, 0, plain_stats(200)),
            ],
            17,
        );
        state
            .unit_mut(defender)
            .unwrap()
            .skills
            .push(SkillSlot::new(SkillId(10)));
        state
            .unit_mut(defender)
            .unwrap()
            .statuses
            .add_affliction(crate::state::AfflictionKind::Seal, attacker);

        let hp_before = state.unit(attacker).unwrap().hp;
        let mut instance = WindowInstanceContext::new();
        let next = PassiveWindowSystem::run(
            state,
            &mut instance,
            vec![Trigger::Hit {
                attacker,
                target: defender,
                kind: AttackKind::Melee,
                critical: false,
                lethal: false,
                target_row: Row::Front,
            }],
            &env,
        );
        assert_eq!(next.unit(attacker).unwrap().hp, hp_before);
    }

    #[test]
    fn cover_passive_registers_a_redirect() {
        let cover = SkillDefinition {
            id: SkillId(12),
            name: "shield wall".into(),
            kind: SkillKind::Passive {
                pp_cost: 1,
                window: ActivationWindow::OnCover,
            },
            attack_kind: AttackKind::Melee,
            hit_rate: HitRate::Always,
            target: TargetSide::SelfOnly,
            effects: vec![SkillEffect::new(EffectKind::Cover)],
        };
        let skills = Passives(vec![cover]);
        let classes = NoClasses;
        let equipment = NoEquipment;
        let growth = NoGrowth;
        let env = BattleEnv::new(&classes, &skills, &equipment, &growth);

        let attacker = UnitId::new(TeamSide::Home, 0);
        let squishy = UnitId::new(TeamSide::Away, 0);
        let guardian = UnitId::new(TeamSide::Away, 1);
        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(200)),
                unit_at(TeamSide::Away, 0, plain_stats(100)),
                unit_at(TeamSide::Away, 1, plain_stats(300)),
            ],
            17,
        );
        state
            .unit_mut(guardian)
            .unwrap()
            .skills
            .push(SkillSlot::new(SkillId(12)));

        let mut instance = WindowInstanceContext::new();
        let _ = PassiveWindowSystem::run(
            state,
            &mut instance,
            vec![Trigger::AttackIncoming {
                attacker,
                target: squishy,
                kind: AttackKind::Melee,
            }],
            &env,
        );
        assert_eq!(instance.cover_redirect, Some(guardian));
    }
}
