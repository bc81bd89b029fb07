//! Battle loop.
//!
//! [`run_battle`] is the authoritative reducer: it initializes the
//! battlefield from two rosters and the static tables, then drives rounds
//! and turns until a termination condition holds. Every mutation flows
//! through the same copy-on-write transitions used by the subsystems, so
//! the whole battle is a pure function of (rosters, seed, options).

mod scheduler;

pub use scheduler::{
    advance_to_next_unit, calculate_turn_order, determine_winner, end_reason, finish_round,
    reorder_remaining_units, start_new_round, team_hp_percentages,
};

use crate::config::BattleConfig;
use crate::env::{BattleEnv, BattleRng, TargetSide};
use crate::error::BattleError;
use crate::event::{BattleEventKind, BattleOutcome, BattleResult, EndReason, UnitReport};
use crate::execute::apply_skill;
use crate::skill::{resolve_candidates, select_skill};
use crate::state::{
    AfflictionKind, BattleContext, BattleFlags, BattlefieldState, DayPhase, StatusSet, TeamSide,
    Unit, UnitId,
};
use crate::stats::CombatStats;
use crate::windows::{PassiveWindowSystem, Trigger, WindowInstanceContext};

/// Caller-tunable battle parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleOptions {
    pub config: BattleConfig,
    pub phase: DayPhase,
}

/// Simulates a full battle and returns the event log plus result summary.
///
/// Identical rosters and seed produce a byte-identical event log.
pub fn run_battle(
    home: &[Unit],
    away: &[Unit],
    seed: &str,
    options: &BattleOptions,
    env: &BattleEnv<'_>,
) -> Result<BattleOutcome, BattleError> {
    let mut state = init_battle(home, away, seed, options, env)?;

    state.push_event(BattleEventKind::BattleStart {
        home_units: home.len() as u8,
        away_units: away.len() as u8,
    });
    state = run_boundary(state, Trigger::BattleStart, env);

    let reason = loop {
        // Elimination ends the battle immediately, even mid-round. The
        // other terminal conditions are judged at round boundaries.
        if state.living_count(TeamSide::Home) == 0 || state.living_count(TeamSide::Away) == 0 {
            break EndReason::Elimination;
        }

        if state.queue.is_empty() {
            if state.round > 0 {
                state = close_round(state, env);
            }
            if let Some(reason) = end_reason(&state, &options.config) {
                break reason;
            }
            start_new_round(&mut state);
            state.push_event(BattleEventKind::RoundStart { round: state.round });
            state = run_boundary(state, Trigger::RoundStart, env);
            continue;
        }

        let Some(actor_id) = advance_to_next_unit(&mut state) else {
            continue;
        };
        state.turn += 1;
        state = take_turn(state, actor_id, env);
    };

    state = run_boundary(state, Trigger::BattleEnd, env);

    let winner = determine_winner(&state);
    let (home_hp_percent, away_hp_percent) = team_hp_percentages(&state);
    let reports = |team: TeamSide, state: &BattlefieldState| -> Vec<UnitReport> {
        state
            .units
            .values()
            .filter(|u| u.id.team == team)
            .map(|u| UnitReport {
                unit: u.id,
                hp: u.hp,
                position: u.position,
                afflictions: u.statuses.afflictions().map(|a| a.kind).collect(),
            })
            .collect()
    };
    let battle_end = BattleEventKind::BattleEnd {
        home: reports(TeamSide::Home, &state),
        away: reports(TeamSide::Away, &state),
    };
    state.push_event(battle_end);

    Ok(BattleOutcome {
        result: BattleResult {
            winner,
            reason,
            rounds: state.round,
            turns: state.turn,
            home_hp_percent,
            away_hp_percent,
        },
        events: state.history,
    })
}

/// Builds the initial battlefield from the rosters and static tables.
///
/// Every data-table reference is resolved here; an unresolvable id is a
/// fatal configuration error, surfaced before any simulation happens.
pub fn init_battle(
    home: &[Unit],
    away: &[Unit],
    seed: &str,
    options: &BattleOptions,
    env: &BattleEnv<'_>,
) -> Result<BattlefieldState, BattleError> {
    let mut units = std::collections::BTreeMap::new();
    for (team, roster) in [(TeamSide::Home, home), (TeamSide::Away, away)] {
        if roster.is_empty() {
            return Err(BattleError::EmptyRoster { team });
        }
        if roster.len() > BattleConfig::TEAM_SIZE {
            return Err(BattleError::RosterTooLarge {
                team,
                limit: BattleConfig::TEAM_SIZE,
            });
        }
        for (index, unit) in roster.iter().enumerate() {
            let id = UnitId::new(team, index as u8);
            let context = field_unit(id, unit, env)?;
            units.insert(id, context);
        }
    }

    Ok(BattlefieldState {
        units,
        queue: std::collections::VecDeque::new(),
        current_actor: None,
        round: 0,
        turn: 0,
        standby_rounds: 0,
        actives_this_round: 0,
        phase: options.phase,
        rng: BattleRng::from_seed_str(seed),
        history: Vec::new(),
    })
}

/// Turns one roster entry into a fielded battle context.
fn field_unit(id: UnitId, unit: &Unit, env: &BattleEnv<'_>) -> Result<BattleContext, BattleError> {
    let class = env
        .classes
        .class(unit.class)
        .ok_or(BattleError::UnknownClass {
            unit: id,
            class: unit.class,
        })?;
    let base = env
        .growth
        .base_stats(unit.class, unit.level, unit.growth)
        .ok_or(BattleError::MissingGrowth {
            class: unit.class,
            level: unit.level,
        })?;

    let mut tags = class.tags;
    let mut equipment_modifiers = Vec::new();
    for &equipment_id in &unit.equipment {
        let equipment =
            env.equipment
                .equipment(equipment_id)
                .ok_or(BattleError::UnknownEquipment {
                    unit: id,
                    equipment: equipment_id,
                })?;
        equipment_modifiers.extend(equipment.bonuses.iter().copied());
        tags |= equipment.grants;
    }
    let stats: CombatStats = base.with_modifiers(equipment_modifiers.iter());

    for slot in &unit.skills {
        if env.skills.skill(slot.skill).is_none() {
            return Err(BattleError::UnknownSkill {
                unit: id,
                skill: slot.skill,
            });
        }
    }

    Ok(BattleContext {
        id,
        class: unit.class,
        level: unit.level,
        position: unit.position,
        hp: stats.max_hp.max(1),
        ap: BattleConfig::STARTING_AP,
        pp: BattleConfig::STARTING_PP,
        base_stats: stats,
        tags,
        statuses: StatusSet::empty(),
        flags: BattleFlags::empty(),
        skills: unit.skills.clone(),
        acted_this_round: false,
    })
}

/// Dispatches a boundary trigger in its own short-lived instance.
fn run_boundary(state: BattlefieldState, trigger: Trigger, env: &BattleEnv<'_>) -> BattlefieldState {
    let mut instance = WindowInstanceContext::new();
    let state = PassiveWindowSystem::run(state, &mut instance, vec![trigger], env);
    state
}

/// Round-close bookkeeping: status durations tick down, expiries are
/// reported, the standby streak updates.
fn close_round(mut state: BattlefieldState, env: &BattleEnv<'_>) -> BattlefieldState {
    let ids: Vec<UnitId> = state.units.keys().copied().collect();
    let mut triggers = Vec::new();
    for id in ids {
        let Some(unit) = state.unit_mut(id) else {
            continue;
        };
        if !unit.is_alive() {
            continue;
        }
        for expired in unit.statuses.tick_round() {
            triggers.push(Trigger::StatusExpired {
                unit: id,
                polarity: expired.polarity,
            });
            state.push_event(BattleEventKind::StatusExpired {
                unit: id,
                polarity: expired.polarity,
                stat: expired.modifier.stat,
            });
        }
    }
    state.push_event(BattleEventKind::RoundEnd { round: state.round });
    triggers.push(Trigger::RoundEnd);

    let mut instance = WindowInstanceContext::new();
    state = PassiveWindowSystem::run(state, &mut instance, triggers, env);

    finish_round(&mut state);
    state
}

/// One unit's turn: turn-start reactions and affliction ticks, skill and
/// target selection, pre-action windows, cover redirection, the action
/// itself, cascading reactions, and turn-end windows. The whole turn is one
/// window instance; bookkeeping resets when it returns.
fn take_turn(
    mut state: BattlefieldState,
    actor_id: UnitId,
    env: &BattleEnv<'_>,
) -> BattlefieldState {
    let mut instance = WindowInstanceContext::new();

    let mut opening = vec![Trigger::TurnStart { unit: actor_id }];
    tick_afflictions(&mut state, actor_id, &mut opening);
    state = PassiveWindowSystem::run(state, &mut instance, opening, env);

    // Turn-start reactions may have removed the actor's ability to act.
    if !state.unit(actor_id).is_some_and(|u| u.can_act()) {
        return state;
    }

    match select_skill(&state, actor_id, env) {
        None => {
            state = standby(state, actor_id, &mut instance, env);
        }
        Some(choice) => {
            state.actives_this_round += 1;
            let skill = env
                .skills
                .skill(choice.skill)
                .expect("skill ids are validated at battle start")
                .clone();

            if let Some(actor) = state.unit_mut(actor_id) {
                actor.spend_ap(skill.ap_cost());
            }
            state.push_event(BattleEventKind::SkillSelected {
                actor: actor_id,
                skill: skill.id,
                target: choice.target,
            });
            state = PassiveWindowSystem::run(
                state,
                &mut instance,
                vec![
                    Trigger::SkillSelected { actor: actor_id },
                    Trigger::ApSpent { unit: actor_id },
                ],
                env,
            );

            // Pre-action reactions may have killed the chosen target.
            let mut target = choice.target;
            if !state.unit(target).is_some_and(|u| u.is_alive()) {
                let fallback = resolve_candidates(&state, actor_id, skill.target);
                match fallback.first() {
                    Some(&next_target) => target = next_target,
                    None => {
                        state = finish_turn(state, actor_id, &mut instance, env);
                        return state;
                    }
                }
            }

            // Cover: give the defense side a chance to redirect before any
            // damage resolves.
            if skill.deals_damage() && skill.target == TargetSide::Enemies {
                state = PassiveWindowSystem::run(
                    state,
                    &mut instance,
                    vec![Trigger::AttackIncoming {
                        attacker: actor_id,
                        target,
                        kind: skill.attack_kind,
                    }],
                    env,
                );
                if let Some(redirect) = instance.cover_redirect.take()
                    && state.unit(redirect).is_some_and(|u| u.is_alive())
                {
                    target = redirect;
                }
            }

            let application = apply_skill(&state, actor_id, &skill, target);
            state = application.state;
            if application.initiative_changed {
                reorder_remaining_units(&mut state);
            }
            state = PassiveWindowSystem::run(state, &mut instance, application.triggers, env);

            state = PassiveWindowSystem::run(
                state,
                &mut instance,
                vec![Trigger::SkillResolved { actor: actor_id }],
                env,
            );
            state = finish_turn(state, actor_id, &mut instance, env);
        }
    }

    if instance.initiative_changed {
        reorder_remaining_units(&mut state);
    }
    state
}

/// Standby: the unit banks resources instead of acting.
fn standby(
    mut state: BattlefieldState,
    actor_id: UnitId,
    instance: &mut WindowInstanceContext,
    env: &BattleEnv<'_>,
) -> BattlefieldState {
    state.push_event(BattleEventKind::Standby { unit: actor_id });
    let mut triggers = Vec::new();
    if let Some(unit) = state.unit_mut(actor_id) {
        let ap = unit.gain_ap(BattleConfig::STANDBY_AP_GAIN);
        let pp = unit.gain_pp(BattleConfig::STANDBY_PP_GAIN);
        let full = unit.ap == BattleConfig::MAX_RESOURCE && unit.pp == BattleConfig::MAX_RESOURCE;
        if ap > 0 || pp > 0 {
            state.push_event(BattleEventKind::ResourceGained {
                unit: actor_id,
                ap,
                pp,
            });
            if ap > 0 {
                triggers.push(Trigger::ApGained { unit: actor_id });
            }
            if pp > 0 {
                triggers.push(Trigger::PpGained { unit: actor_id });
            }
            if full {
                triggers.push(Trigger::ResourceFull { unit: actor_id });
            }
        }
    }
    state = PassiveWindowSystem::run(state, instance, triggers, env);
    finish_turn(state, actor_id, instance, env)
}

/// Turn-end windows plus the per-round action flag.
fn finish_turn(
    state: BattlefieldState,
    actor_id: UnitId,
    instance: &mut WindowInstanceContext,
    env: &BattleEnv<'_>,
) -> BattlefieldState {
    let mut state = PassiveWindowSystem::run(
        state,
        instance,
        vec![Trigger::TurnEnd { unit: actor_id }],
        env,
    );
    if let Some(unit) = state.unit_mut(actor_id) {
        unit.acted_this_round = true;
    }
    state
}

/// Poison and burn tick at the owner's turn start. Ticks pressure the unit
/// but never kill: HP floors at 1.
fn tick_afflictions(state: &mut BattlefieldState, actor_id: UnitId, triggers: &mut Vec<Trigger>) {
    let ticks = [
        (AfflictionKind::Poison, BattleConfig::POISON_TICK_PERCENT),
        (AfflictionKind::Burn, BattleConfig::BURN_TICK_PERCENT),
    ];
    for (kind, percent) in ticks {
        let Some(unit) = state.unit(actor_id) else {
            return;
        };
        if !unit.statuses.has_affliction(kind) {
            continue;
        }
        let max_hp = unit.max_hp();
        let amount = ((max_hp as i64 * percent as i64) / 100) as i32;
        let amount = amount.min(unit.hp - 1).max(0);
        if amount == 0 {
            continue;
        }
        if let Some(unit) = state.unit_mut(actor_id) {
            unit.hp -= amount;
        }
        state.push_event(BattleEventKind::AfflictionTick {
            unit: actor_id,
            affliction: kind,
            amount,
        });
        triggers.push(Trigger::AfflictionTick { unit: actor_id });
    }
}
