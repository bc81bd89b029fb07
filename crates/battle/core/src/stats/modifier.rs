//! Stat modifier records carried by buffs, debuffs, and equipment.

use super::StatKind;

/// How a modifier value scales against the base stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scaling {
    /// Added to the stat as-is.
    Flat,
    /// Percentage of the flat-adjusted stat, signed.
    Percent,
}

/// A single stat adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: StatKind,
    pub value: i32,
    pub scaling: Scaling,
}

impl StatModifier {
    pub fn flat(stat: StatKind, value: i32) -> Self {
        Self {
            stat,
            value,
            scaling: Scaling::Flat,
        }
    }

    pub fn percent(stat: StatKind, value: i32) -> Self {
        Self {
            stat,
            value,
            scaling: Scaling::Percent,
        }
    }
}
