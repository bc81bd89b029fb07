//! Afflictions, buffs, and debuffs.
//!
//! Afflictions are persistent negative conditions cleared by specific game
//! events (a cleanse effect, battle end), never by elapsed rounds. Buffs and
//! debuffs are stat modifier records that may carry a round duration;
//! duration-less records last until the battle ends.

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::stats::StatModifier;

use super::common::UnitId;
use strum::{AsRefStr, EnumIter};

/// Persistent negative conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AfflictionKind {
    /// Max-HP percentage loss at the owner's turn start.
    Poison,
    /// Heavier HP tick than poison.
    Burn,
    /// Cannot take active turns.
    Freeze,
    /// Cannot take active turns.
    Paralyze,
    /// Passive skills are suppressed.
    Seal,
    /// Data for tactics only; no built-in mechanical penalty.
    Blind,
    /// Data for tactics only; marks the unit for condition checks.
    Curse,
}

impl AfflictionKind {
    /// Parses the snake_case name used by tactic keys and data files.
    pub fn from_key(key: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|kind| kind.as_ref() == key)
    }

    /// Afflictions that make a unit ineligible to act when popped.
    pub fn blocks_turn(self) -> bool {
        matches!(self, AfflictionKind::Freeze | AfflictionKind::Paralyze)
    }
}

/// One affliction instance with its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affliction {
    pub kind: AfflictionKind,
    pub source: UnitId,
}

/// Whether a stat change helps or harms its carrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Polarity {
    Buff,
    Debuff,
}

/// A buff or debuff: one stat modifier plus bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub polarity: Polarity,
    pub modifier: StatModifier,
    pub source: UnitId,
    /// Rounds remaining. `None` lasts until battle end.
    pub remaining: Option<u32>,
}

/// All status records on one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSet {
    afflictions: ArrayVec<Affliction, { BattleConfig::MAX_AFFLICTIONS }>,
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_affliction(&self, kind: AfflictionKind) -> bool {
        self.afflictions.iter().any(|a| a.kind == kind)
    }

    pub fn any_affliction(&self) -> bool {
        !self.afflictions.is_empty()
    }

    /// Adds an affliction unless the kind is already present or the set is
    /// full. Returns true if the record was added.
    pub fn add_affliction(&mut self, kind: AfflictionKind, source: UnitId) -> bool {
        if self.has_affliction(kind) || self.afflictions.is_full() {
            return false;
        }
        self.afflictions.push(Affliction { kind, source });
        true
    }

    /// Removes every affliction of the given kind. Returns true if any was
    /// present.
    pub fn clear_affliction(&mut self, kind: AfflictionKind) -> bool {
        let before = self.afflictions.len();
        self.afflictions.retain(|a| a.kind != kind);
        before != self.afflictions.len()
    }

    pub fn afflictions(&self) -> impl Iterator<Item = &Affliction> {
        self.afflictions.iter()
    }

    pub fn has_polarity(&self, polarity: Polarity) -> bool {
        self.effects.iter().any(|e| e.polarity == polarity)
    }

    /// Adds a buff/debuff record. Silently drops the record when the set is
    /// full; the oldest records keep priority.
    pub fn add_effect(&mut self, effect: StatusEffect) -> bool {
        if self.effects.is_full() {
            return false;
        }
        self.effects.push(effect);
        true
    }

    pub fn effects(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Iterator over the stat modifiers of all live buffs/debuffs.
    pub fn modifiers(&self) -> impl Iterator<Item = &StatModifier> {
        self.effects.iter().map(|e| &e.modifier)
    }

    /// Decrements round durations and drops expired records. Returns the
    /// expired records so the caller can emit events.
    pub fn tick_round(&mut self) -> Vec<StatusEffect> {
        let mut expired = Vec::new();
        self.effects.retain(|effect| match effect.remaining {
            Some(1) => {
                expired.push(*effect);
                false
            }
            Some(ref mut n) => {
                *n -= 1;
                true
            }
            None => true,
        });
        expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::common::TeamSide;
    use crate::stats::StatKind;

    fn src() -> UnitId {
        UnitId::new(TeamSide::Home, 0)
    }

    #[test]
    fn afflictions_do_not_stack_by_kind() {
        let mut set = StatusSet::empty();
        assert!(set.add_affliction(AfflictionKind::Poison, src()));
        assert!(!set.add_affliction(AfflictionKind::Poison, src()));
        assert_eq!(set.afflictions().count(), 1);
    }

    #[test]
    fn afflictions_survive_round_ticks() {
        let mut set = StatusSet::empty();
        set.add_affliction(AfflictionKind::Burn, src());
        set.tick_round();
        set.tick_round();
        assert!(set.has_affliction(AfflictionKind::Burn));
    }

    #[test]
    fn timed_effects_expire() {
        let mut set = StatusSet::empty();
        set.add_effect(StatusEffect {
            polarity: Polarity::Buff,
            modifier: StatModifier::flat(StatKind::Attack, 10),
            source: src(),
            remaining: Some(2),
        });
        assert!(set.tick_round().is_empty());
        let expired = set.tick_round();
        assert_eq!(expired.len(), 1);
        assert!(!set.has_polarity(Polarity::Buff));
    }

    #[test]
    fn untimed_effects_persist() {
        let mut set = StatusSet::empty();
        set.add_effect(StatusEffect {
            polarity: Polarity::Debuff,
            modifier: StatModifier::percent(StatKind::Defense, -20),
            source: src(),
            remaining: None,
        });
        for _ in 0..10 {
            assert!(set.tick_round().is_empty());
        }
        assert!(set.has_polarity(Polarity::Debuff));
    }
}
