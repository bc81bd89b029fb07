//! Declarative tactic system.
//!
//! A tactic is a `(category, key)` pair attached to a skill slot. The
//! category fixes the evaluation mode and scope; the key selects a concrete
//! check from the category's lookup table. Keys travel as strings because
//! they originate in data files; an unrecognized key is an extensible-data
//! gap, not corruption, and resolves permissively with a logged warning.

mod evaluator;

pub use evaluator::{
    TacticContext, apply_preferences, conditions_pass, evaluate_gate, gating_passes,
    order_candidates,
};

use strum::{AsRefStr, EnumIter};

/// Closed catalog of tactic categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TacticCategory {
    /// Row and day-phase checks.
    Formation,
    /// Combatant-type tag presence on the scoped units.
    CombatantType,
    /// HP percentage comparisons.
    Hp,
    /// AP/PP comparisons, including the synthetic `max` threshold.
    Resource,
    /// Affliction/buff/debuff presence.
    Status,
    /// Kind of an incoming attack; only meaningful in reactive contexts.
    AttackType,
    /// Living-enemy-count comparisons, always relative to the actor.
    UnitSize,
    /// Any other category's checks, rescoped to the acting unit itself.
    OwnCondition,
    /// Comparisons against any of the ten combat stats.
    Stats,
    /// Orders target candidates instead of gating the slot.
    TargetPreference,
}

impl TacticCategory {
    /// Whether tactics of this category gate skill-slot selection.
    /// `TargetPreference` is the one ordering category.
    pub fn is_gating(self) -> bool {
        !matches!(self, TacticCategory::TargetPreference)
    }
}

/// A declarative condition attached to a skill slot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tactic {
    pub category: TacticCategory,
    pub key: String,
}

impl Tactic {
    pub fn new(category: TacticCategory, key: impl Into<String>) -> Self {
        Self {
            category,
            key: key.into(),
        }
    }
}
