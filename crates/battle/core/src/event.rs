//! Append-only battle event log and result summary.
//!
//! The log is the simulator's only output channel: renderers replay it,
//! tests assert on it, and byte-identical logs are the determinism
//! contract. Events are appended by the engine and never rewritten.

use crate::state::{AfflictionKind, BoardPosition, Polarity, SkillId, TeamSide, UnitId};
use crate::stats::StatKind;

/// One timestamped entry in the battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleEvent {
    pub round: u32,
    pub turn: u32,
    pub kind: BattleEventKind,
}

/// Event payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEventKind {
    BattleStart {
        home_units: u8,
        away_units: u8,
    },
    RoundStart {
        round: u32,
    },
    SkillSelected {
        actor: UnitId,
        skill: SkillId,
        target: UnitId,
    },
    Hit {
        attacker: UnitId,
        target: UnitId,
        skill: SkillId,
        amount: i32,
        critical: bool,
        guarded: bool,
        remaining_hp: i32,
    },
    Evaded {
        attacker: UnitId,
        target: UnitId,
        skill: SkillId,
    },
    Heal {
        source: UnitId,
        target: UnitId,
        amount: i32,
    },
    BuffApplied {
        source: UnitId,
        target: UnitId,
        stat: StatKind,
        value: i32,
    },
    DebuffApplied {
        source: UnitId,
        target: UnitId,
        stat: StatKind,
        value: i32,
    },
    StatusExpired {
        unit: UnitId,
        polarity: Polarity,
        stat: StatKind,
    },
    AfflictionApplied {
        source: UnitId,
        target: UnitId,
        affliction: AfflictionKind,
    },
    AfflictionCleared {
        unit: UnitId,
        affliction: AfflictionKind,
    },
    AfflictionTick {
        unit: UnitId,
        affliction: AfflictionKind,
        amount: i32,
    },
    ResourceGained {
        unit: UnitId,
        ap: u8,
        pp: u8,
    },
    Standby {
        unit: UnitId,
    },
    UnitDefeated {
        unit: UnitId,
    },
    SurvivedLethal {
        unit: UnitId,
    },
    RoundEnd {
        round: u32,
    },
    BattleEnd {
        home: Vec<UnitReport>,
        away: Vec<UnitReport>,
    },
}

/// Final per-unit snapshot carried by the battle-end event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitReport {
    pub unit: UnitId,
    pub hp: i32,
    pub position: BoardPosition,
    pub afflictions: Vec<AfflictionKind>,
}

/// Which side won.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Winner {
    Side(TeamSide),
    Draw,
}

/// Why the battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndReason {
    /// One or both teams were wiped out.
    Elimination,
    /// No living unit on either side could act.
    Exhaustion,
    /// The round safety cap was reached.
    RoundLimit,
    /// Three consecutive standby-only rounds.
    Stalemate,
}

/// Result summary returned alongside the event log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    pub winner: Winner,
    pub reason: EndReason,
    pub rounds: u32,
    pub turns: u32,
    pub home_hp_percent: u32,
    pub away_hp_percent: u32,
}

/// Complete output of a simulated battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub events: Vec<BattleEvent>,
    pub result: BattleResult,
}
