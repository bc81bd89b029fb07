//! Authoritative battlefield state.
//!
//! Exactly one [`BattlefieldState`] is "current" at any step of a
//! simulation. Transitions clone the current value, mutate the clone, and
//! hand it back; prior snapshots stay immutable, which is what makes replay
//! (and potential undo) trivial. The RNG is part of the state: drawing from
//! it is a state transition like any other.

pub mod types;

use std::collections::{BTreeMap, VecDeque};

pub use types::{
    Affliction, AfflictionKind, BattleContext, BattleFlags, BoardPosition, ClassId, CombatantTags,
    DayPhase, EquipmentId, Polarity, Row, SkillId, SkillSlot, StatusEffect, StatusSet, TeamSide,
    Unit, UnitId,
};

use crate::env::BattleRng;
use crate::event::BattleEvent;

/// Canonical snapshot of a battle in progress.
///
/// Units live in a `BTreeMap` keyed by [`UnitId`] so every whole-roster
/// iteration is deterministic without further sorting.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattlefieldState {
    pub units: BTreeMap<UnitId, BattleContext>,

    /// Units still owed an active turn this round, in initiative order.
    pub queue: VecDeque<UnitId>,

    /// The unit whose active-skill instance is resolving, if any.
    pub current_actor: Option<UnitId>,

    /// 1-based round counter.
    pub round: u32,
    /// Total active turns taken across the battle.
    pub turn: u32,

    /// Consecutive rounds in which no non-standby active skill was used.
    pub standby_rounds: u32,
    /// Non-standby active-skill uses in the round in progress.
    pub actives_this_round: u32,

    pub phase: DayPhase,

    /// Deterministic random stream; the sole nondeterminism source.
    pub rng: BattleRng,

    /// Append-only action history.
    pub history: Vec<BattleEvent>,
}

impl BattlefieldState {
    pub fn unit(&self, id: UnitId) -> Option<&BattleContext> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut BattleContext> {
        self.units.get_mut(&id)
    }

    /// Living units of one side, in id order.
    pub fn living(&self, team: TeamSide) -> impl Iterator<Item = &BattleContext> {
        self.units
            .values()
            .filter(move |u| u.id.team == team && u.is_alive())
    }

    pub fn living_count(&self, team: TeamSide) -> usize {
        self.living(team).count()
    }

    /// Living allies of a unit, including the unit itself.
    pub fn allies_of(&self, id: UnitId) -> impl Iterator<Item = &BattleContext> {
        self.living(id.team)
    }

    /// Living enemies of a unit.
    pub fn enemies_of(&self, id: UnitId) -> impl Iterator<Item = &BattleContext> {
        self.living(id.team.opponent())
    }

    /// Appends an event stamped with the current round/turn counters.
    pub fn push_event(&mut self, kind: crate::event::BattleEventKind) {
        self.history.push(BattleEvent {
            round: self.round,
            turn: self.turn,
            kind,
        });
    }

    /// Aggregate current-HP percentage of a team's roster (0-100).
    ///
    /// Defeated units contribute zero against their full max HP, so a team
    /// at half strength reads 50 even if the survivors are untouched.
    pub fn team_hp_percent(&self, team: TeamSide) -> u32 {
        let (current, max) = self
            .units
            .values()
            .filter(|u| u.id.team == team)
            .fold((0i64, 0i64), |(current, max), unit| {
                (
                    current + i64::from(unit.hp.max(0)),
                    max + i64::from(unit.max_hp()),
                )
            });
        if max == 0 {
            return 0;
        }
        ((current * 100) / max) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CombatStats;
    use arrayvec::ArrayVec;

    fn context(id: UnitId, hp: i32, max_hp: i32) -> BattleContext {
        BattleContext {
            id,
            class: ClassId(0),
            level: 1,
            position: BoardPosition::new(Row::Front, 0),
            hp,
            ap: 4,
            pp: 0,
            base_stats: CombatStats {
                max_hp,
                ..Default::default()
            },
            tags: CombatantTags::empty(),
            statuses: StatusSet::empty(),
            flags: BattleFlags::empty(),
            skills: ArrayVec::new(),
            acted_this_round: false,
        }
    }

    fn state_with(units: Vec<BattleContext>) -> BattlefieldState {
        BattlefieldState {
            units: units.into_iter().map(|u| (u.id, u)).collect(),
            queue: VecDeque::new(),
            current_actor: None,
            round: 1,
            turn: 0,
            standby_rounds: 0,
            actives_this_round: 0,
            phase: DayPhase::Day,
            rng: BattleRng::from_seed(1),
            history: Vec::new(),
        }
    }

    #[test]
    fn team_hp_percent_counts_the_fallen() {
        let state = state_with(vec![
            context(UnitId::new(TeamSide::Home, 0), 100, 100),
            context(UnitId::new(TeamSide::Home, 1), 0, 100),
        ]);
        assert_eq!(state.team_hp_percent(TeamSide::Home), 50);
        assert_eq!(state.team_hp_percent(TeamSide::Away), 0);
    }

    #[test]
    fn living_iterators_split_by_side() {
        let state = state_with(vec![
            context(UnitId::new(TeamSide::Home, 0), 10, 100),
            context(UnitId::new(TeamSide::Home, 1), 0, 100),
            context(UnitId::new(TeamSide::Away, 0), 10, 100),
        ]);
        let home = UnitId::new(TeamSide::Home, 0);
        assert_eq!(state.allies_of(home).count(), 1);
        assert_eq!(state.enemies_of(home).count(), 1);
    }
}
