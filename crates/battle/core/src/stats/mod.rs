//! Combat stat model.
//!
//! Base values come from the class growth tables (level + growth pair),
//! equipment adds flat bonuses on top, and buffs/debuffs layer flat or
//! percent modifiers over that. The first two layers are cached on the
//! battle context; the status layer is recomputed on demand because it
//! changes mid-round.

mod growth;
mod modifier;

pub use growth::{GrowthFocus, GrowthPair};
pub use modifier::{Scaling, StatModifier};

use strum::{AsRefStr, EnumIter};

/// The ten combat stats every unit carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    MaxHp,
    Attack,
    Magic,
    Defense,
    Resistance,
    Accuracy,
    Evasion,
    Critical,
    Guard,
    Initiative,
}

impl StatKind {
    /// Parses the snake_case name used by tactic keys and data files.
    pub fn from_key(key: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|stat| stat.as_ref() == key)
    }
}

/// A full set of combat stat values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub max_hp: i32,
    pub attack: i32,
    pub magic: i32,
    pub defense: i32,
    pub resistance: i32,
    pub accuracy: i32,
    pub evasion: i32,
    pub critical: i32,
    pub guard: i32,
    pub initiative: i32,
}

impl CombatStats {
    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::MaxHp => self.max_hp,
            StatKind::Attack => self.attack,
            StatKind::Magic => self.magic,
            StatKind::Defense => self.defense,
            StatKind::Resistance => self.resistance,
            StatKind::Accuracy => self.accuracy,
            StatKind::Evasion => self.evasion,
            StatKind::Critical => self.critical,
            StatKind::Guard => self.guard,
            StatKind::Initiative => self.initiative,
        }
    }

    pub fn set(&mut self, kind: StatKind, value: i32) {
        match kind {
            StatKind::MaxHp => self.max_hp = value,
            StatKind::Attack => self.attack = value,
            StatKind::Magic => self.magic = value,
            StatKind::Defense => self.defense = value,
            StatKind::Resistance => self.resistance = value,
            StatKind::Accuracy => self.accuracy = value,
            StatKind::Evasion => self.evasion = value,
            StatKind::Critical => self.critical = value,
            StatKind::Guard => self.guard = value,
            StatKind::Initiative => self.initiative = value,
        }
    }

    /// Adds a flat bonus to one stat.
    pub fn add(&mut self, kind: StatKind, delta: i32) {
        self.set(kind, self.get(kind) + delta);
    }

    /// Applies an ordered list of modifiers and returns the adjusted stats.
    ///
    /// Flat pieces sum first, then percent pieces apply to the flat-adjusted
    /// value, so two +20% buffs yield +40%, not +44%. Results floor at zero.
    pub fn with_modifiers<'a, I>(&self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = &'a StatModifier>,
    {
        let mut flat = Self::default();
        let mut percent = Self::default();
        for modifier in modifiers {
            match modifier.scaling {
                Scaling::Flat => flat.add(modifier.stat, modifier.value),
                Scaling::Percent => percent.add(modifier.stat, modifier.value),
            }
        }

        let mut out = *self;
        use strum::IntoEnumIterator;
        for kind in StatKind::iter() {
            let base = self.get(kind) + flat.get(kind);
            let scaled = base + base * percent.get(kind) / 100;
            out.set(kind, scaled.max(0));
        }
        out
    }
}
