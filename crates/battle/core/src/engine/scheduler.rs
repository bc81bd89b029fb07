//! Round and queue maintenance.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::warn;

use crate::config::BattleConfig;
use crate::env::BattleRng;
use crate::event::{EndReason, Winner};
use crate::state::{BattleContext, BattlefieldState, TeamSide, UnitId};
use crate::stats::StatKind;

/// Computes a full turn order for the living units.
///
/// Sort by initiative descending; ties break by board-position rank (front
/// columns 0-2, back columns 3-5, lower wins). A group still tied across
/// teams costs one coin flip to decide which team's block goes first;
/// same-team ties always keep stable id order, so the number of draws does
/// not depend on roster ordering within a team.
pub fn calculate_turn_order(
    units: &BTreeMap<UnitId, BattleContext>,
    rng: &mut BattleRng,
) -> VecDeque<UnitId> {
    let mut entries: Vec<(i32, u8, UnitId)> = units
        .values()
        .filter(|u| u.is_alive())
        .map(|u| {
            (
                u.stat(StatKind::Initiative),
                u.position.turn_priority(),
                u.id,
            )
        })
        .collect();
    entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut order = VecDeque::with_capacity(entries.len());
    let mut start = 0;
    while start < entries.len() {
        let mut end = start + 1;
        while end < entries.len()
            && entries[end].0 == entries[start].0
            && entries[end].1 == entries[start].1
        {
            end += 1;
        }
        let group = &entries[start..end];
        let cross_team = group.iter().any(|e| e.2.team != group[0].2.team);
        if cross_team {
            let first = if rng.coin() {
                TeamSide::Home
            } else {
                TeamSide::Away
            };
            for entry in group.iter().filter(|e| e.2.team == first) {
                order.push_back(entry.2);
            }
            for entry in group.iter().filter(|e| e.2.team != first) {
                order.push_back(entry.2);
            }
        } else {
            for entry in group {
                order.push_back(entry.2);
            }
        }
        start = end;
    }
    order
}

/// Pops queue entries until one is actionable and makes it the current
/// actor. Ineligible units (dead, out of AP, turn-blocked) are stripped,
/// which upholds the invariant that a popped unit can always act.
pub fn advance_to_next_unit(state: &mut BattlefieldState) -> Option<UnitId> {
    state.current_actor = None;
    while let Some(front) = state.queue.pop_front() {
        let actionable = state.unit(front).is_some_and(|u| u.can_act());
        if actionable {
            state.current_actor = Some(front);
            return Some(front);
        }
    }
    None
}

/// Closes out a completed round: decrement status durations and update the
/// consecutive-standby counter. Round-end events are the engine's business;
/// this only adjusts state.
pub fn finish_round(state: &mut BattlefieldState) {
    if state.actives_this_round == 0 {
        state.standby_rounds += 1;
    } else {
        state.standby_rounds = 0;
    }
}

/// Starts the next round: rebuild the queue from **all** living units (a
/// unit at 0 AP still rides along, its PP-gated passives participate),
/// recompute order, bump the counter, and clear per-round flags.
pub fn start_new_round(state: &mut BattlefieldState) {
    state.round += 1;
    state.actives_this_round = 0;
    for unit in state.units.values_mut() {
        unit.acted_this_round = false;
    }
    let mut rng = state.rng;
    state.queue = calculate_turn_order(&state.units, &mut rng);
    state.rng = rng;
}

/// Recomputes order for the units still waiting this round. The current
/// actor keeps its turn; only the remaining queue reshuffles.
pub fn reorder_remaining_units(state: &mut BattlefieldState) {
    let remaining: BTreeSet<UnitId> = state.queue.iter().copied().collect();
    if remaining.is_empty() {
        return;
    }
    let mut rng = state.rng;
    let full = calculate_turn_order(&state.units, &mut rng);
    state.rng = rng;
    state.queue = full.into_iter().filter(|id| remaining.contains(id)).collect();
}

/// Why the battle must stop now, if it must.
pub fn end_reason(state: &BattlefieldState, config: &BattleConfig) -> Option<EndReason> {
    let home = state.living_count(TeamSide::Home);
    let away = state.living_count(TeamSide::Away);
    if home == 0 || away == 0 {
        return Some(EndReason::Elimination);
    }
    if state.round > 0
        && !state
            .units
            .values()
            .any(|u| u.is_alive() && u.can_act())
    {
        return Some(EndReason::Exhaustion);
    }
    if state.round >= config.round_limit {
        return Some(EndReason::RoundLimit);
    }
    if state.standby_rounds >= config.standby_round_limit {
        return Some(EndReason::Stalemate);
    }
    None
}

/// Scores the battlefield: a wiped side loses, both wiped is a draw (logged
/// as anomalous), otherwise the higher aggregate HP percentage wins and an
/// exact tie is a draw.
pub fn determine_winner(state: &BattlefieldState) -> Winner {
    let home_alive = state.living_count(TeamSide::Home);
    let away_alive = state.living_count(TeamSide::Away);
    match (home_alive, away_alive) {
        (0, 0) => {
            warn!(
                target: "battle_core::engine",
                "both sides reached zero living units simultaneously"
            );
            Winner::Draw
        }
        (0, _) => Winner::Side(TeamSide::Away),
        (_, 0) => Winner::Side(TeamSide::Home),
        _ => {
            let (home_pct, away_pct) = team_hp_percentages(state);
            match home_pct.cmp(&away_pct) {
                std::cmp::Ordering::Greater => Winner::Side(TeamSide::Home),
                std::cmp::Ordering::Less => Winner::Side(TeamSide::Away),
                std::cmp::Ordering::Equal => Winner::Draw,
            }
        }
    }
}

/// Aggregate HP percentages as (home, away).
pub fn team_hp_percentages(state: &BattlefieldState) -> (u32, u32) {
    (
        state.team_hp_percent(TeamSide::Home),
        state.team_hp_percent(TeamSide::Away),
    )
}
