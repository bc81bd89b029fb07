//! Shared fixtures for module tests.

use std::collections::{BTreeMap, VecDeque};

use arrayvec::ArrayVec;

use crate::env::BattleRng;
use crate::state::{
    BattleContext, BattleFlags, BattlefieldState, BoardPosition, ClassId, CombatantTags, DayPhase,
    Row, StatusSet, TeamSide, UnitId,
};
use crate::stats::CombatStats;

pub(crate) fn unit_at(team: TeamSide, index: u8, stats: CombatStats) -> BattleContext {
    BattleContext {
        id: UnitId::new(team, index),
        class: ClassId(0),
        level: 1,
        position: BoardPosition::new(
            if index < 3 { Row::Front } else { Row::Back },
            index % 3,
        ),
        hp: stats.max_hp,
        ap: 4,
        pp: 2,
        base_stats: stats,
        tags: CombatantTags::empty(),
        statuses: StatusSet::empty(),
        flags: BattleFlags::empty(),
        skills: ArrayVec::new(),
        acted_this_round: false,
    }
}

pub(crate) fn plain_stats(max_hp: i32) -> CombatStats {
    CombatStats {
        max_hp,
        attack: 50,
        magic: 40,
        defense: 20,
        resistance: 15,
        accuracy: 90,
        evasion: 10,
        critical: 0,
        guard: 0,
        initiative: 30,
    }
}

pub(crate) fn battlefield(units: Vec<BattleContext>, seed: u64) -> BattlefieldState {
    BattlefieldState {
        units: units.into_iter().map(|u| (u.id, u)).collect(),
        queue: VecDeque::new(),
        current_actor: None,
        round: 1,
        turn: 0,
        standby_rounds: 0,
        actives_this_round: 0,
        phase: DayPhase::Day,
        rng: BattleRng::from_seed(seed),
        history: Vec::new(),
    }
}
