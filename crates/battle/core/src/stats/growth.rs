//! Growth pair selection.
//!
//! Every roster unit names two growth focuses. The growth oracle turns
//! (class, level, pair) into base stats; the pair only selects which columns
//! of the class curve are emphasized, so the core never needs the curve data
//! itself.

use strum::{AsRefStr, EnumIter};

/// A stat emphasis a unit can grow toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GrowthFocus {
    /// Max HP and guard.
    Vitality,
    /// Physical attack and critical.
    Might,
    /// Magic and resistance.
    Arcane,
    /// Defense and guard.
    Bulwark,
    /// Accuracy and evasion.
    Finesse,
    /// Initiative and evasion.
    Swift,
}

/// The ordered pair of growth focuses chosen for a unit.
///
/// The primary focus weighs heavier than the secondary; the oracle decides
/// the exact weighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthPair {
    pub primary: GrowthFocus,
    pub secondary: GrowthFocus,
}

impl GrowthPair {
    pub fn new(primary: GrowthFocus, secondary: GrowthFocus) -> Self {
        Self { primary, secondary }
    }
}
