//! Condition evaluation against a battle context.
//!
//! The category fixes the evaluation scope; the key is parsed through the
//! category's lookup table. Numeric keys read `<metric>_<cmp>_<value>`
//! (`hp_lt_50`, `ap_gte_max`, `attack_gt_120`); presence keys read
//! `has_<name>` / `lacks_<name>`. An unrecognized key resolves permissively
//! with a logged warning so extensible data never stalls a unit.

use tracing::warn;

use crate::combat::AttackKind;
use crate::config::BattleConfig;
use crate::state::{
    AfflictionKind, BattleContext, BattlefieldState, CombatantTags, DayPhase, Polarity, Row,
    UnitId,
};
use crate::stats::StatKind;

use super::{Tactic, TacticCategory};

/// Everything a condition can be judged against.
#[derive(Clone, Copy)]
pub struct TacticContext<'a> {
    pub actor: &'a BattleContext,
    pub state: &'a BattlefieldState,
    /// Units in the skill's implied targeting scope.
    pub scope: &'a [UnitId],
    /// Kind of the incoming attack when evaluating reactively.
    pub incoming: Option<AttackKind>,
}

/// Numeric comparison operators recognized in keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cmp {
    Gt,
    Lt,
    Gte,
    Lte,
    Eq,
    Neq,
}

impl Cmp {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(Cmp::Gt),
            "lt" => Some(Cmp::Lt),
            "gte" => Some(Cmp::Gte),
            "lte" => Some(Cmp::Lte),
            "eq" => Some(Cmp::Eq),
            "neq" => Some(Cmp::Neq),
            _ => None,
        }
    }

    fn apply(self, lhs: i32, rhs: i32) -> bool {
        match self {
            Cmp::Gt => lhs > rhs,
            Cmp::Lt => lhs < rhs,
            Cmp::Gte => lhs >= rhs,
            Cmp::Lte => lhs <= rhs,
            Cmp::Eq => lhs == rhs,
            Cmp::Neq => lhs != rhs,
        }
    }
}

/// Splits `<metric>_<cmp>_<value>` from the right, so multi-word metrics
/// like `max_hp` survive. `value` may be `max`, the synthetic resource cap.
fn parse_numeric(key: &str) -> Option<(&str, Cmp, i32)> {
    let (rest, value_token) = key.rsplit_once('_')?;
    let (metric, cmp_token) = rest.rsplit_once('_')?;
    let cmp = Cmp::parse(cmp_token)?;
    let value = if value_token == "max" {
        i32::from(BattleConfig::MAX_RESOURCE)
    } else {
        value_token.parse().ok()?
    };
    Some((metric, cmp, value))
}

/// Evaluates one key against one unit. `None` flags an unknown key.
fn eval_key_on_unit(
    category: TacticCategory,
    key: &str,
    unit: &BattleContext,
    state: &BattlefieldState,
) -> Option<bool> {
    match category {
        TacticCategory::Formation => match key {
            "front_row" => Some(unit.position.row == Row::Front),
            "back_row" => Some(unit.position.row == Row::Back),
            "daytime" => Some(state.phase == DayPhase::Day),
            "nighttime" => Some(state.phase == DayPhase::Night),
            _ => None,
        },
        TacticCategory::CombatantType => {
            CombatantTags::from_key(key).map(|tag| unit.tags.contains(tag))
        }
        TacticCategory::Hp => {
            let (metric, cmp, value) = parse_numeric(key)?;
            if metric != "hp" {
                return None;
            }
            Some(cmp.apply(unit.hp_percent(), value))
        }
        TacticCategory::Resource => {
            let (metric, cmp, value) = parse_numeric(key)?;
            let current = match metric {
                "ap" => i32::from(unit.ap),
                "pp" => i32::from(unit.pp),
                _ => return None,
            };
            Some(cmp.apply(current, value))
        }
        TacticCategory::Status => {
            if let Some(name) = key.strip_prefix("has_") {
                return status_presence(name, unit);
            }
            if let Some(name) = key.strip_prefix("lacks_") {
                return status_presence(name, unit).map(|present| !present);
            }
            None
        }
        TacticCategory::Stats => {
            let (metric, cmp, value) = parse_numeric(key)?;
            let stat = StatKind::from_key(metric)?;
            Some(cmp.apply(unit.stat(stat), value))
        }
        // Scope overrides are handled by the caller; reaching here with one
        // of these categories means the caller already rescoped.
        TacticCategory::UnitSize
        | TacticCategory::AttackType
        | TacticCategory::OwnCondition
        | TacticCategory::TargetPreference => None,
    }
}

fn status_presence(name: &str, unit: &BattleContext) -> Option<bool> {
    match name {
        "buff" => Some(unit.statuses.has_polarity(Polarity::Buff)),
        "debuff" => Some(unit.statuses.has_polarity(Polarity::Debuff)),
        "affliction" => Some(unit.statuses.any_affliction()),
        _ => AfflictionKind::from_key(name).map(|kind| unit.statuses.has_affliction(kind)),
    }
}

/// Own-condition keys reuse the other categories' tables, tried in order,
/// always against the acting unit.
fn eval_own_condition(key: &str, actor: &BattleContext, state: &BattlefieldState) -> Option<bool> {
    for category in [
        TacticCategory::Hp,
        TacticCategory::Resource,
        TacticCategory::Status,
        TacticCategory::Stats,
        TacticCategory::CombatantType,
        TacticCategory::Formation,
    ] {
        if let Some(result) = eval_key_on_unit(category, key, actor, state) {
            return Some(result);
        }
    }
    None
}

/// Resolves one gating tactic to a boolean.
///
/// Most categories pass when *any* unit in the skill's targeting scope
/// satisfies the key. `OwnCondition` always judges the acting unit,
/// `UnitSize` always judges the living-enemy count, and `AttackType` only
/// means anything while an incoming attack is being resolved.
pub fn evaluate_gate(tactic: &Tactic, ctx: &TacticContext<'_>) -> bool {
    match tactic.category {
        TacticCategory::OwnCondition => {
            match eval_own_condition(&tactic.key, ctx.actor, ctx.state) {
                Some(result) => result,
                None => unknown_key(tactic),
            }
        }
        TacticCategory::UnitSize => {
            let count = ctx.state.living_count(ctx.actor.id.team.opponent()) as i32;
            match parse_numeric(&tactic.key) {
                Some(("enemies", cmp, value)) => cmp.apply(count, value),
                _ => unknown_key(tactic),
            }
        }
        TacticCategory::AttackType => match ctx.incoming {
            Some(kind) => match AttackKind::from_key(&tactic.key) {
                Some(expected) => kind == expected,
                None => unknown_key(tactic),
            },
            // Outside a reactive context there is no attack to test.
            None => false,
        },
        TacticCategory::TargetPreference => true,
        category => {
            for id in ctx.scope {
                let Some(unit) = ctx.state.unit(*id) else {
                    continue;
                };
                match eval_key_on_unit(category, &tactic.key, unit, ctx.state) {
                    Some(true) => return true,
                    Some(false) => {}
                    None => return unknown_key(tactic),
                }
            }
            // No scoped unit satisfied the key (or the scope was empty).
            false
        }
    }
}

/// Whether a slot's attached tactics allow it: no gating tactics means
/// always allowed, otherwise any passing gate suffices.
pub fn gating_passes(tactics: &[Tactic], ctx: &TacticContext<'_>) -> bool {
    let mut has_gate = false;
    for tactic in tactics.iter().filter(|t| t.category.is_gating()) {
        has_gate = true;
        if evaluate_gate(tactic, ctx) {
            return true;
        }
    }
    !has_gate
}

/// Per-effect condition lists require every condition to pass.
pub fn conditions_pass(conditions: &[Tactic], ctx: &TacticContext<'_>) -> bool {
    conditions.iter().all(|tactic| evaluate_gate(tactic, ctx))
}

/// Reorders candidates by one preference key. Stable, so ties keep their
/// prior (id or focus-first) order.
pub fn order_candidates(tactic: &Tactic, candidates: &mut [UnitId], ctx: &TacticContext<'_>) {
    let metric = |id: &UnitId| -> i64 {
        let Some(unit) = ctx.state.unit(*id) else {
            return i64::MAX;
        };
        match tactic.key.as_str() {
            "lowest_hp" => i64::from(unit.hp),
            "highest_hp" => -i64::from(unit.hp),
            "lowest_hp_percent" => i64::from(unit.hp_percent()),
            "highest_hp_percent" => -i64::from(unit.hp_percent()),
            "lowest_defense" => i64::from(unit.stat(StatKind::Defense)),
            "highest_attack" => -i64::from(unit.stat(StatKind::Attack)),
            "highest_magic" => -i64::from(unit.stat(StatKind::Magic)),
            "highest_initiative" => -i64::from(unit.stat(StatKind::Initiative)),
            "front_row_first" => i64::from(unit.position.turn_priority()),
            "back_row_first" => -i64::from(unit.position.turn_priority()),
            "afflicted_first" => i64::from(!unit.statuses.any_affliction()),
            "buffed_first" => i64::from(!unit.statuses.has_polarity(Polarity::Buff)),
            "debuffed_first" => i64::from(!unit.statuses.has_polarity(Polarity::Debuff)),
            _ => {
                unknown_key(tactic);
                0
            }
        }
    };
    candidates.sort_by_key(metric);
}

/// Applies the slot's preference tactics. The first-listed tactic is the
/// primary sort key, so later tactics are applied first.
pub fn apply_preferences(tactics: &[Tactic], candidates: &mut [UnitId], ctx: &TacticContext<'_>) {
    for tactic in tactics
        .iter()
        .filter(|t| t.category == TacticCategory::TargetPreference)
        .rev()
    {
        order_candidates(tactic, candidates, ctx);
    }
}

/// The documented permissive fallback: unknown keys warn and pass.
fn unknown_key(tactic: &Tactic) -> bool {
    warn!(
        target: "battle_core::tactics",
        category = tactic.category.as_ref(),
        key = %tactic.key,
        "unknown tactic key, defaulting to permissive"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BattleRng;
    use crate::state::{
        BattleFlags, BattlefieldState, BoardPosition, ClassId, StatusSet, TeamSide,
    };
    use crate::stats::CombatStats;
    use crate::tactics::Tactic;
    use arrayvec::ArrayVec;
    use std::collections::{BTreeMap, VecDeque};

    fn unit(id: UnitId, hp: i32, ap: u8) -> BattleContext {
        BattleContext {
            id,
            class: ClassId(0),
            level: 1,
            position: BoardPosition::new(Row::Front, id.index.min(2)),
            hp,
            ap,
            pp: 2,
            base_stats: CombatStats {
                max_hp: 100,
                attack: 50,
                ..Default::default()
            },
            tags: CombatantTags::empty(),
            statuses: StatusSet::empty(),
            flags: BattleFlags::empty(),
            skills: ArrayVec::new(),
            acted_this_round: false,
        }
    }

    fn state_of(units: Vec<BattleContext>) -> BattlefieldState {
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

    fn ctx<'a>(
        state: &'a BattlefieldState,
        actor: UnitId,
        scope: &'a [UnitId],
    ) -> TacticContext<'a> {
        TacticContext {
            actor: state.unit(actor).unwrap(),
            state,
            scope,
            incoming: None,
        }
    }

    #[test]
    fn hp_threshold_passes_when_any_scoped_unit_matches() {
        let home = UnitId::new(TeamSide::Home, 0);
        let hurt = UnitId::new(TeamSide::Away, 0);
        let healthy = UnitId::new(TeamSide::Away, 1);
        let state = state_of(vec![unit(home, 100, 4), unit(hurt, 30, 4), unit(healthy, 100, 4)]);
        let scope = [hurt, healthy];
        let tactic = Tactic::new(TacticCategory::Hp, "hp_lt_50");
        assert!(evaluate_gate(&tactic, &ctx(&state, home, &scope)));

        let strict = Tactic::new(TacticCategory::Hp, "hp_lt_10");
        assert!(!evaluate_gate(&strict, &ctx(&state, home, &scope)));
    }

    #[test]
    fn own_condition_ignores_scope() {
        let home = UnitId::new(TeamSide::Home, 0);
        let enemy = UnitId::new(TeamSide::Away, 0);
        let mut actor = unit(home, 20, 4);
        actor.hp = 20;
        let state = state_of(vec![actor, unit(enemy, 100, 4)]);
        let scope = [enemy];
        let tactic = Tactic::new(TacticCategory::OwnCondition, "hp_lte_20");
        assert!(evaluate_gate(&tactic, &ctx(&state, home, &scope)));
    }

    #[test]
    fn unit_size_counts_living_enemies() {
        let home = UnitId::new(TeamSide::Home, 0);
        let state = state_of(vec![
            unit(home, 100, 4),
            unit(UnitId::new(TeamSide::Away, 0), 100, 4),
            unit(UnitId::new(TeamSide::Away, 1), 0, 4),
            unit(UnitId::new(TeamSide::Away, 2), 50, 4),
        ]);
        let scope = [];
        let tactic = Tactic::new(TacticCategory::UnitSize, "enemies_gte_2");
        assert!(evaluate_gate(&tactic, &ctx(&state, home, &scope)));
        let tactic = Tactic::new(TacticCategory::UnitSize, "enemies_gte_3");
        assert!(!evaluate_gate(&tactic, &ctx(&state, home, &scope)));
    }

    #[test]
    fn attack_type_only_fires_reactively() {
        let home = UnitId::new(TeamSide::Home, 0);
        let enemy = UnitId::new(TeamSide::Away, 0);
        let state = state_of(vec![unit(home, 100, 4), unit(enemy, 100, 4)]);
        let scope = [enemy];
        let tactic = Tactic::new(TacticCategory::AttackType, "melee");

        assert!(!evaluate_gate(&tactic, &ctx(&state, home, &scope)));

        let reactive = TacticContext {
            incoming: Some(AttackKind::Melee),
            ..ctx(&state, home, &scope)
        };
        assert!(evaluate_gate(&tactic, &reactive));

        let mismatched = TacticContext {
            incoming: Some(AttackKind::Magical),
            ..ctx(&state, home, &scope)
        };
        assert!(!evaluate_gate(&tactic, &mismatched));
    }

    #[test]
    fn resource_keys_understand_the_synthetic_max() {
        let home = UnitId::new(TeamSide::Home, 0);
        let state = state_of(vec![unit(home, 100, 4)]);
        let scope = [home];
        let tactic = Tactic::new(TacticCategory::Resource, "ap_eq_max");
        assert!(evaluate_gate(&tactic, &ctx(&state, home, &scope)));
    }

    #[test]
    fn unknown_key_is_permissive() {
        let home = UnitId::new(TeamSide::Home, 0);
        let state = state_of(vec![unit(home, 100, 4)]);
        let scope = [home];
        let tactic = Tactic::new(TacticCategory::Hp, "hp_between_30_and_60");
        assert!(evaluate_gate(&tactic, &ctx(&state, home, &scope)));
    }

    #[test]
    fn no_gating_tactics_means_allowed() {
        let home = UnitId::new(TeamSide::Home, 0);
        let state = state_of(vec![unit(home, 100, 4)]);
        let scope = [home];
        assert!(gating_passes(&[], &ctx(&state, home, &scope)));

        let preference_only = [Tactic::new(TacticCategory::TargetPreference, "lowest_hp")];
        assert!(gating_passes(&preference_only, &ctx(&state, home, &scope)));
    }

    #[test]
    fn preference_orders_by_first_listed_key() {
        let home = UnitId::new(TeamSide::Home, 0);
        let a = UnitId::new(TeamSide::Away, 0);
        let b = UnitId::new(TeamSide::Away, 1);
        let mut ua = unit(a, 80, 4);
        ua.base_stats.attack = 90;
        let mut ub = unit(b, 30, 4);
        ub.base_stats.attack = 10;
        let state = state_of(vec![unit(home, 100, 4), ua, ub]);
        let mut candidates = vec![a, b];
        let tactics = [
            Tactic::new(TacticCategory::TargetPreference, "lowest_hp"),
            Tactic::new(TacticCategory::TargetPreference, "highest_attack"),
        ];
        let binding = [a, b];
        apply_preferences(&tactics, &mut candidates, &ctx(&state, home, &binding));
        assert_eq!(candidates, vec![b, a]);
    }
}
