//! Battle events and the event-to-window mapping table.

use crate::combat::AttackKind;
use crate::state::{Polarity, Row, UnitId};

use super::ActivationWindow;

/// A battle event that may open activation windows.
///
/// Triggers carry the participating unit ids so dispatch can work out which
/// units a window addresses (the struck unit, its allies, the attacker...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    BattleStart,
    BattleEnd,
    RoundStart,
    RoundEnd,
    TurnStart {
        unit: UnitId,
    },
    TurnEnd {
        unit: UnitId,
    },
    SkillSelected {
        actor: UnitId,
    },
    SkillResolved {
        actor: UnitId,
    },
    /// A damaging skill is about to resolve against `target`. The only
    /// window here is cover redirection.
    AttackIncoming {
        attacker: UnitId,
        target: UnitId,
        kind: AttackKind,
    },
    Hit {
        attacker: UnitId,
        target: UnitId,
        kind: AttackKind,
        critical: bool,
        lethal: bool,
        target_row: Row,
    },
    Evaded {
        attacker: UnitId,
        target: UnitId,
    },
    Guarded {
        attacker: UnitId,
        target: UnitId,
        broken: bool,
    },
    Heal {
        source: UnitId,
        target: UnitId,
        overheal: bool,
    },
    BuffApplied {
        source: UnitId,
        target: UnitId,
    },
    DebuffApplied {
        source: UnitId,
        target: UnitId,
    },
    StatusExpired {
        unit: UnitId,
        polarity: Polarity,
    },
    AfflictionApplied {
        source: UnitId,
        target: UnitId,
    },
    AfflictionCleared {
        unit: UnitId,
    },
    AfflictionTick {
        unit: UnitId,
    },
    UnitDefeated {
        unit: UnitId,
    },
    SurvivedLethal {
        unit: UnitId,
    },
    ApSpent {
        unit: UnitId,
    },
    ApGained {
        unit: UnitId,
    },
    PpGained {
        unit: UnitId,
    },
    ResourceFull {
        unit: UnitId,
    },
}

/// The ordered set of windows an event can open.
///
/// The returned slice is unsorted table data; dispatch sorts by priority
/// before firing.
pub fn windows_for(trigger: &Trigger) -> Vec<ActivationWindow> {
    use ActivationWindow::*;
    match trigger {
        Trigger::BattleStart => vec![BattleStart],
        Trigger::BattleEnd => vec![BattleEnd],
        Trigger::RoundStart => vec![RoundStart],
        Trigger::RoundEnd => vec![RoundEnd],
        Trigger::TurnStart { .. } => vec![TurnStart],
        Trigger::TurnEnd { .. } => vec![TurnEnd],
        Trigger::SkillSelected { .. } => {
            vec![SkillSelected, BeforeAttack, BeforeAllySkill, BeforeEnemySkill]
        }
        Trigger::SkillResolved { .. } => vec![AfterAttack, AfterAllySkill, AfterEnemySkill],
        Trigger::AttackIncoming { .. } => vec![OnCover],
        Trigger::Hit {
            kind,
            critical,
            lethal,
            target_row,
            ..
        } => {
            let mut windows = vec![OnStruck, OnAllyStruck, OnHit];
            windows.push(match target_row {
                Row::Front => OnFrontRowStruck,
                Row::Back => OnBackRowStruck,
            });
            windows.push(match kind {
                AttackKind::Melee => OnMeleeStruck,
                AttackKind::Ranged => OnRangedStruck,
                AttackKind::Magical => OnMagicalStruck,
            });
            windows.push(match kind {
                AttackKind::Melee => OnMeleeHit,
                AttackKind::Ranged => OnRangedHit,
                AttackKind::Magical => OnMagicalHit,
            });
            if *critical {
                windows.push(OnCriticalStruck);
                windows.push(OnCriticalHit);
            }
            if *lethal {
                windows.push(OnKill);
            }
            windows
        }
        Trigger::Evaded { .. } => vec![OnMiss, OnEvade, OnAllyEvade],
        Trigger::Guarded { broken, .. } => {
            let mut windows = vec![OnGuard, OnAllyGuard];
            if *broken {
                windows.push(OnGuardBreak);
            }
            windows
        }
        Trigger::Heal { overheal, .. } => {
            let mut windows = vec![OnHealGiven, OnHealReceived, OnAllyHealed];
            if *overheal {
                windows.push(OnOverheal);
            }
            windows
        }
        Trigger::BuffApplied { .. } => vec![OnBuffApplied, OnBuffReceived, OnAllyBuffed],
        Trigger::DebuffApplied { .. } => vec![OnDebuffApplied, OnDebuffReceived, OnAllyDebuffed],
        Trigger::StatusExpired { polarity, .. } => match polarity {
            Polarity::Buff => vec![OnBuffExpired],
            Polarity::Debuff => vec![OnDebuffExpired],
        },
        Trigger::AfflictionApplied { .. } => {
            vec![OnAfflictionApplied, OnAfflictionReceived, OnAllyAfflicted]
        }
        Trigger::AfflictionCleared { .. } => vec![OnAfflictionCleared],
        Trigger::AfflictionTick { .. } => vec![OnAfflictionTick],
        Trigger::UnitDefeated { .. } => {
            vec![OnDefeat, OnAllyDefeated, OnEnemyDefeated, OnLastAllyStanding]
        }
        Trigger::SurvivedLethal { .. } => vec![OnSurviveLethal],
        Trigger::ApSpent { .. } => vec![OnApSpent],
        Trigger::ApGained { .. } => vec![OnApGained],
        Trigger::PpGained { .. } => vec![OnPpGained],
        Trigger::ResourceFull { .. } => vec![OnResourceFull],
    }
}
