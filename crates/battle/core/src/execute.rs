//! Skill application.
//!
//! One entry point shared by active turns and reactive passives: run the
//! non-damage accumulation pass, resolve damage effects through the damage
//! resolver, then apply the accumulated heals, resources, flags, statuses,
//! and afflictions. Every step works on a successor state; the input state
//! is never touched. Alongside the successor state the application reports
//! the triggers it raised, which the window system feeds back into its
//! dispatch loop.

use crate::combat::resolve_damage;
use crate::effect::{EffectBundle, EffectKind, EffectTarget, ResourceKind};
use crate::env::SkillDefinition;
use crate::event::BattleEventKind;
use crate::state::{BattlefieldState, Polarity, StatusEffect, UnitId};
use crate::stats::StatKind;
use crate::tactics::{TacticContext, conditions_pass};
use crate::windows::Trigger;

/// Result of applying one skill.
pub struct SkillApplication {
    pub state: BattlefieldState,
    /// Triggers raised while applying, in occurrence order.
    pub triggers: Vec<Trigger>,
    /// An initiative stat was buffed or debuffed; the scheduler may need to
    /// reorder the remaining queue.
    pub initiative_changed: bool,
}

/// Applies a skill's full effect list from `actor` onto `target`.
pub fn apply_skill(
    state: &BattlefieldState,
    actor_id: UnitId,
    skill: &SkillDefinition,
    target_id: UnitId,
) -> SkillApplication {
    let mut current = state.clone();
    let mut triggers = Vec::new();
    let mut initiative_changed = false;

    // Non-damage accumulation pass, judged against the resolved target.
    let scope = [target_id];
    let bundle = {
        let ctx = TacticContext {
            actor: current.unit(actor_id).expect("actor exists"),
            state: &current,
            scope: &scope,
            incoming: None,
        };
        crate::effect::process_effects(&skill.effects, &ctx)
    };

    // Damage effects, each gated by its own condition list.
    for effect in skill.effects.iter().filter(|e| e.is_damage()) {
        let EffectKind::Damage { potency } = effect.kind else {
            continue;
        };
        {
            let ctx = TacticContext {
                actor: current.unit(actor_id).expect("actor exists"),
                state: &current,
                scope: &scope,
                incoming: None,
            };
            if !conditions_pass(&effect.conditions, &ctx) {
                continue;
            }
        }
        let Some(target) = current.unit(target_id) else {
            break;
        };
        if !target.is_alive() {
            break;
        }

        current = apply_damage_effect(
            &current,
            actor_id,
            target_id,
            potency,
            skill,
            &bundle,
            &mut triggers,
        );
    }

    // Accumulated non-damage applications.
    apply_bundle(
        &mut current,
        actor_id,
        target_id,
        &bundle,
        &mut triggers,
        &mut initiative_changed,
    );

    SkillApplication {
        state: current,
        triggers,
        initiative_changed,
    }
}

fn apply_damage_effect(
    state: &BattlefieldState,
    attacker_id: UnitId,
    target_id: UnitId,
    potency: u32,
    skill: &SkillDefinition,
    bundle: &EffectBundle,
    triggers: &mut Vec<Trigger>,
) -> BattlefieldState {
    let pp_before = state.unit(target_id).map(|u| u.pp).unwrap_or(0);
    let target_row = state
        .unit(target_id)
        .map(|u| u.position.row)
        .unwrap_or(crate::state::Row::Front);

    let (mut next, outcome) = resolve_damage(
        state,
        attacker_id,
        target_id,
        potency,
        skill.attack_kind,
        skill.hit_rate,
        bundle,
    );

    if !outcome.hit {
        next.push_event(BattleEventKind::Evaded {
            attacker: attacker_id,
            target: target_id,
            skill: skill.id,
        });
        triggers.push(Trigger::Evaded {
            attacker: attacker_id,
            target: target_id,
        });
        return next;
    }

    next.push_event(BattleEventKind::Hit {
        attacker: attacker_id,
        target: target_id,
        skill: skill.id,
        amount: outcome.amount,
        critical: outcome.critical,
        guarded: outcome.guarded,
        remaining_hp: outcome.remaining_hp,
    });
    triggers.push(Trigger::Hit {
        attacker: attacker_id,
        target: target_id,
        kind: skill.attack_kind,
        critical: outcome.critical,
        lethal: outcome.lethal,
        target_row,
    });

    if outcome.guarded || outcome.guard_broken {
        triggers.push(Trigger::Guarded {
            attacker: attacker_id,
            target: target_id,
            broken: outcome.guard_broken,
        });
    }

    if outcome.survived_lethal {
        next.push_event(BattleEventKind::SurvivedLethal { unit: target_id });
        triggers.push(Trigger::SurvivedLethal { unit: target_id });
    }

    if outcome.lethal {
        next.push_event(BattleEventKind::UnitDefeated { unit: target_id });
        triggers.push(Trigger::UnitDefeated { unit: target_id });
    } else {
        let pp_after = next.unit(target_id).map(|u| u.pp).unwrap_or(0);
        if pp_after > pp_before {
            next.push_event(BattleEventKind::ResourceGained {
                unit: target_id,
                ap: 0,
                pp: pp_after - pp_before,
            });
            triggers.push(Trigger::PpGained { unit: target_id });
        }
    }

    next
}

fn recipient(effect_target: EffectTarget, actor: UnitId, target: UnitId) -> UnitId {
    match effect_target {
        EffectTarget::Target => target,
        EffectTarget::Actor => actor,
    }
}

fn apply_bundle(
    current: &mut BattlefieldState,
    actor_id: UnitId,
    target_id: UnitId,
    bundle: &EffectBundle,
    triggers: &mut Vec<Trigger>,
    initiative_changed: &mut bool,
) {
    // Heals land on the resolved target and scale off the actor's magic.
    if bundle.heal_potency > 0 || bundle.heal_percent > 0 {
        let magic = current
            .unit(actor_id)
            .map(|u| u.stat(StatKind::Magic).max(0))
            .unwrap_or(0);
        if let Some(target) = current.unit(target_id).filter(|t| t.is_alive()) {
            let max_hp = target.max_hp();
            let amount = (magic as i64 * bundle.heal_potency as i64 / 100
                + max_hp as i64 * bundle.heal_percent as i64 / 100) as i32;
            if amount > 0 {
                let hp = target.hp;
                let healed_to = (hp + amount).min(max_hp);
                let overheal = hp + amount > max_hp;
                if let Some(t) = current.unit_mut(target_id) {
                    t.hp = healed_to;
                }
                current.push_event(BattleEventKind::Heal {
                    source: actor_id,
                    target: target_id,
                    amount: healed_to - hp,
                });
                triggers.push(Trigger::Heal {
                    source: actor_id,
                    target: target_id,
                    overheal,
                });
            }
        }
    }

    for gain in &bundle.resource_gains {
        let who = recipient(gain.target, actor_id, target_id);
        let Some(unit) = current.unit_mut(who) else {
            continue;
        };
        if !unit.is_alive() {
            continue;
        }
        let (ap, pp) = match gain.resource {
            ResourceKind::Ap => (unit.gain_ap(gain.amount), 0),
            ResourceKind::Pp => (0, unit.gain_pp(gain.amount)),
        };
        if ap == 0 && pp == 0 {
            continue;
        }
        let full = unit.ap == crate::config::BattleConfig::MAX_RESOURCE
            && unit.pp == crate::config::BattleConfig::MAX_RESOURCE;
        current.push_event(BattleEventKind::ResourceGained { unit: who, ap, pp });
        if ap > 0 {
            triggers.push(Trigger::ApGained { unit: who });
        }
        if pp > 0 {
            triggers.push(Trigger::PpGained { unit: who });
        }
        if full {
            triggers.push(Trigger::ResourceFull { unit: who });
        }
    }

    for (flag, effect_target) in &bundle.flags {
        let who = recipient(*effect_target, actor_id, target_id);
        if let Some(unit) = current.unit_mut(who) {
            unit.flags.insert(*flag);
        }
    }

    for queued in &bundle.statuses {
        let who = recipient(queued.target, actor_id, target_id);
        let Some(unit) = current.unit_mut(who) else {
            continue;
        };
        if !unit.is_alive() {
            continue;
        }
        let added = unit.statuses.add_effect(StatusEffect {
            polarity: queued.polarity,
            modifier: queued.modifier,
            source: actor_id,
            remaining: queued.duration,
        });
        if !added {
            continue;
        }
        if queued.modifier.stat == StatKind::Initiative {
            *initiative_changed = true;
        }
        match queued.polarity {
            Polarity::Buff => {
                current.push_event(BattleEventKind::BuffApplied {
                    source: actor_id,
                    target: who,
                    stat: queued.modifier.stat,
                    value: queued.modifier.value,
                });
                triggers.push(Trigger::BuffApplied {
                    source: actor_id,
                    target: who,
                });
            }
            Polarity::Debuff => {
                current.push_event(BattleEventKind::DebuffApplied {
                    source: actor_id,
                    target: who,
                    stat: queued.modifier.stat,
                    value: queued.modifier.value,
                });
                triggers.push(Trigger::DebuffApplied {
                    source: actor_id,
                    target: who,
                });
            }
        }
    }

    for queued in &bundle.afflictions {
        let who = recipient(queued.target, actor_id, target_id);
        let roll = current.rng.roll_d100();
        if roll > queued.chance {
            continue;
        }
        let Some(unit) = current.unit_mut(who) else {
            continue;
        };
        if !unit.is_alive() {
            continue;
        }
        if unit.statuses.add_affliction(queued.kind, actor_id) {
            current.push_event(BattleEventKind::AfflictionApplied {
                source: actor_id,
                target: who,
                affliction: queued.kind,
            });
            triggers.push(Trigger::AfflictionApplied {
                source: actor_id,
                target: who,
            });
        }
    }

    for kind in &bundle.cleanses {
        if let Some(unit) = current.unit_mut(target_id)
            && unit.statuses.clear_affliction(*kind)
        {
            current.push_event(BattleEventKind::AfflictionCleared {
                unit: target_id,
                affliction: *kind,
            });
            triggers.push(Trigger::AfflictionCleared { unit: target_id });
        }
    }
}

/// Whether a skill contains a cover contribution.
pub fn offers_cover(skill: &SkillDefinition) -> bool {
    skill
        .effects
        .iter()
        .any(|e| matches!(e.kind, EffectKind::Cover))
}
