//! Hit, crit, guard, and damage resolution.

mod damage;
mod hit;

pub use damage::{DamageOutcome, resolve_damage};
pub use hit::calculate_hit_chance;

use strum::{AsRefStr, EnumIter};

/// Kind of an attacking skill. Drives the scaling stats and the flying
/// evasion rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackKind {
    /// Scales attack vs defense; halved hit chance against Flying targets.
    Melee,
    /// Scales attack vs defense.
    Ranged,
    /// Scales magic vs resistance.
    Magical,
}

impl AttackKind {
    pub fn from_key(key: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|kind| kind.as_ref() == key)
    }
}

/// Base hit rate of a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitRate {
    /// Never rolls to hit; lands unconditionally.
    Always,
    /// Percentage fed into the accuracy-vs-evasion formula.
    Percent(u32),
}
