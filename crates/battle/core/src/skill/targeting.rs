//! Target candidate resolution.

use crate::env::TargetSide;
use crate::state::{BattlefieldState, UnitId};
use crate::windows::Trigger;

/// Living candidates for a skill, in id order.
pub fn resolve_candidates(
    state: &BattlefieldState,
    actor_id: UnitId,
    side: TargetSide,
) -> Vec<UnitId> {
    match side {
        TargetSide::SelfOnly => state
            .unit(actor_id)
            .filter(|u| u.is_alive())
            .map(|u| vec![u.id])
            .unwrap_or_default(),
        TargetSide::Allies => state.allies_of(actor_id).map(|u| u.id).collect(),
        TargetSide::Enemies => state.enemies_of(actor_id).map(|u| u.id).collect(),
    }
}

/// The unit a reactive passive naturally aims at, given what triggered it.
///
/// A counter aims at the attacker; a reactive heal or cleanse aims at the
/// struck/healed ally. Preference tactics still reorder the candidate set;
/// the focus only breaks ties by going first.
pub fn preferred_focus(trigger: &Trigger, side: TargetSide) -> Option<UnitId> {
    match (trigger, side) {
        (Trigger::Hit { attacker, .. }, TargetSide::Enemies)
        | (Trigger::AttackIncoming { attacker, .. }, TargetSide::Enemies)
        | (Trigger::Evaded { attacker, .. }, TargetSide::Enemies)
        | (Trigger::Guarded { attacker, .. }, TargetSide::Enemies) => Some(*attacker),

        (Trigger::Hit { target, .. }, TargetSide::Allies)
        | (Trigger::AttackIncoming { target, .. }, TargetSide::Allies)
        | (Trigger::Evaded { target, .. }, TargetSide::Allies)
        | (Trigger::Guarded { target, .. }, TargetSide::Allies)
        | (Trigger::Heal { target, .. }, TargetSide::Allies)
        | (Trigger::BuffApplied { target, .. }, TargetSide::Allies)
        | (Trigger::DebuffApplied { target, .. }, TargetSide::Allies)
        | (Trigger::AfflictionApplied { target, .. }, TargetSide::Allies) => Some(*target),

        (Trigger::DebuffApplied { source, .. }, TargetSide::Enemies)
        | (Trigger::AfflictionApplied { source, .. }, TargetSide::Enemies) => Some(*source),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackKind;
    use crate::state::{Row, TeamSide};
    use crate::test_support::{battlefield, plain_stats, unit_at};

    #[test]
    fn dead_units_never_become_candidates() {
        let actor = UnitId::new(TeamSide::Home, 0);
        let mut state = battlefield(
            vec![
                unit_at(TeamSide::Home, 0, plain_stats(100)),
                unit_at(TeamSide::Away, 0, plain_stats(100)),
                unit_at(TeamSide::Away, 1, plain_stats(100)),
            ],
            9,
        );
        state
            .unit_mut(UnitId::new(TeamSide::Away, 0))
            .unwrap()
            .hp = 0;

        let candidates = resolve_candidates(&state, actor, TargetSide::Enemies);
        assert_eq!(candidates, vec![UnitId::new(TeamSide::Away, 1)]);
    }

    #[test]
    fn counter_focus_is_the_attacker() {
        let attacker = UnitId::new(TeamSide::Away, 2);
        let trigger = Trigger::Hit {
            attacker,
            target: UnitId::new(TeamSide::Home, 0),
            kind: AttackKind::Melee,
            critical: false,
            lethal: false,
            target_row: Row::Front,
        };
        assert_eq!(preferred_focus(&trigger, TargetSide::Enemies), Some(attacker));
        assert_eq!(
            preferred_focus(&trigger, TargetSide::Allies),
            Some(UnitId::new(TeamSide::Home, 0))
        );
    }
}
