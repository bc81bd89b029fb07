//! Deterministic turn-based battle simulation.
//!
//! `battle-core` computes a full battle from two team rosters and a seed
//! string: turn scheduling, tactic-driven skill and target selection,
//! effect accumulation, damage resolution, and priority-ordered reactive
//! passive windows. The output is an ordered event log plus a result
//! summary; identical inputs replay to identical logs. Static data (classes,
//! skills, equipment, growth curves) reaches the simulation through the
//! oracle traits in [`env`], so the crate never owns game content.
pub mod combat;
pub mod config;
pub mod effect;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod execute;
pub mod skill;
pub mod state;
pub mod stats;
pub mod tactics;
pub mod windows;

#[cfg(test)]
mod test_support;

pub use combat::{AttackKind, DamageOutcome, HitRate, calculate_hit_chance, resolve_damage};
pub use config::BattleConfig;
pub use effect::{EffectBundle, EffectKind, EffectTarget, PotencyKind, SkillEffect, process_effects};
pub use engine::{
    BattleOptions, determine_winner, init_battle, run_battle, team_hp_percentages,
};
pub use env::{
    BattleEnv, BattleRng, ClassDefinition, ClassOracle, EquipSlot, EquipmentDefinition,
    EquipmentOracle, GrowthOracle, SkillDefinition, SkillKind, SkillOracle, TargetSide,
};
pub use error::BattleError;
pub use event::{
    BattleEvent, BattleEventKind, BattleOutcome, BattleResult, EndReason, UnitReport, Winner,
};
pub use skill::{SkillChoice, select_skill};
pub use state::{
    Affliction, AfflictionKind, BattleContext, BattleFlags, BattlefieldState, BoardPosition,
    ClassId, CombatantTags, DayPhase, EquipmentId, Polarity, Row, SkillId, SkillSlot, StatusEffect,
    StatusSet, TeamSide, Unit, UnitId,
};
pub use stats::{CombatStats, GrowthFocus, GrowthPair, Scaling, StatKind, StatModifier};
pub use tactics::{Tactic, TacticCategory};
pub use windows::{ActivationWindow, PassiveWindowSystem, Trigger, WindowInstanceContext};
