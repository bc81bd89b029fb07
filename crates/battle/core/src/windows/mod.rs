//! Reactive passive-skill windows.
//!
//! An activation window is a named point in the battle timeline where
//! passive skills may react. Window metadata (priority rank, limited flag)
//! lives in one static table here; the event-to-window mapping lives in
//! [`triggers`]; per-instance dispatch bookkeeping in [`instance`] and the
//! dispatch loop itself in [`dispatch`].

mod dispatch;
mod instance;
mod triggers;

pub use dispatch::{PassiveWindowSystem, responders};
pub use instance::WindowInstanceContext;
pub use triggers::{Trigger, windows_for};

use strum::{AsRefStr, EnumIter};

/// Named hook points in the battle timeline.
///
/// Priorities are grouped in tens: boundary windows first, then skill
/// declaration, defensive reactions, offensive follow-ups, evade/guard,
/// healing, status, affliction, defeat, and resource windows. Within an
/// instance, lower priority fires first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivationWindow {
    // Boundary
    BattleStart,
    RoundStart,
    TurnStart,
    TurnEnd,
    RoundEnd,
    BattleEnd,

    // Skill declaration
    SkillSelected,
    BeforeAttack,
    BeforeAllySkill,
    BeforeEnemySkill,
    AfterAttack,
    AfterAllySkill,
    AfterEnemySkill,

    // Defensive reactions (fire before offensive follow-ups)
    OnCover,
    OnFrontRowStruck,
    OnBackRowStruck,
    OnStruck,
    OnMeleeStruck,
    OnRangedStruck,
    OnMagicalStruck,
    OnCriticalStruck,
    OnAllyStruck,
    OnSurviveLethal,

    // Offensive follow-ups
    OnHit,
    OnMeleeHit,
    OnRangedHit,
    OnMagicalHit,
    OnCriticalHit,
    OnKill,
    OnMiss,
    OnGuardBreak,

    // Evade and guard
    OnEvade,
    OnAllyEvade,
    OnGuard,
    OnAllyGuard,

    // Healing
    OnHealGiven,
    OnHealReceived,
    OnAllyHealed,
    OnOverheal,

    // Buffs and debuffs
    OnBuffApplied,
    OnBuffReceived,
    OnAllyBuffed,
    OnBuffExpired,
    OnDebuffApplied,
    OnDebuffReceived,
    OnAllyDebuffed,
    OnDebuffExpired,

    // Afflictions
    OnAfflictionApplied,
    OnAfflictionReceived,
    OnAllyAfflicted,
    OnAfflictionCleared,
    OnAfflictionTick,

    // Defeat
    OnDefeat,
    OnAllyDefeated,
    OnEnemyDefeated,
    OnLastAllyStanding,

    // Resources
    OnApSpent,
    OnApGained,
    OnPpGained,
    OnResourceFull,
}

impl ActivationWindow {
    /// Dispatch rank. Lower fires first.
    pub const fn priority(self) -> u8 {
        use ActivationWindow::*;
        match self {
            BattleStart => 0,
            RoundStart => 1,
            TurnStart => 2,
            TurnEnd => 3,
            RoundEnd => 4,
            BattleEnd => 5,

            SkillSelected => 10,
            BeforeAttack => 11,
            BeforeAllySkill => 12,
            BeforeEnemySkill => 13,
            AfterAttack => 14,
            AfterAllySkill => 15,
            AfterEnemySkill => 16,

            OnCover => 20,
            OnFrontRowStruck => 21,
            OnBackRowStruck => 22,
            OnStruck => 23,
            OnMeleeStruck => 24,
            OnRangedStruck => 25,
            OnMagicalStruck => 26,
            OnCriticalStruck => 27,
            OnAllyStruck => 28,
            OnSurviveLethal => 29,

            OnHit => 30,
            OnMeleeHit => 31,
            OnRangedHit => 32,
            OnMagicalHit => 33,
            OnCriticalHit => 34,
            OnKill => 35,
            OnMiss => 36,
            OnGuardBreak => 37,

            OnEvade => 40,
            OnAllyEvade => 41,
            OnGuard => 42,
            OnAllyGuard => 43,

            OnHealGiven => 50,
            OnHealReceived => 51,
            OnAllyHealed => 52,
            OnOverheal => 53,

            OnBuffApplied => 60,
            OnBuffReceived => 61,
            OnAllyBuffed => 62,
            OnBuffExpired => 63,
            OnDebuffApplied => 64,
            OnDebuffReceived => 65,
            OnAllyDebuffed => 66,
            OnDebuffExpired => 67,

            OnAfflictionApplied => 70,
            OnAfflictionReceived => 71,
            OnAllyAfflicted => 72,
            OnAfflictionCleared => 73,
            OnAfflictionTick => 74,

            OnDefeat => 80,
            OnAllyDefeated => 81,
            OnEnemyDefeated => 82,
            OnLastAllyStanding => 83,

            OnApSpent => 90,
            OnApGained => 91,
            OnPpGained => 92,
            OnResourceFull => 93,
        }
    }

    /// Limited windows fire at most once per active-skill instance across
    /// all units combined; everything else fires at most once per unit per
    /// instance.
    pub const fn limited(self) -> bool {
        use ActivationWindow::*;
        matches!(
            self,
            BeforeAttack
                | AfterAttack
                | OnCover
                | OnCriticalStruck
                | OnSurviveLethal
                | OnCriticalHit
                | OnKill
                | OnGuardBreak
                | OnOverheal
                | OnDefeat
                | OnLastAllyStanding
        )
    }
}
