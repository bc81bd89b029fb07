use std::fmt;

/// Which side of the battlefield a team fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// Team-scoped unit identifier: side plus roster index.
///
/// Ids are stable for the whole battle and order deterministically (home
/// before away, then roster order), which every iteration in the simulator
/// relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId {
    pub team: TeamSide,
    pub index: u8,
}

impl UnitId {
    pub fn new(team: TeamSide, index: u8) -> Self {
        Self { team, index }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.team {
            TeamSide::Home => 'H',
            TeamSide::Away => 'A',
        };
        write!(f, "{side}{}", self.index)
    }
}

/// Static data table identifiers resolved through the env oracles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ClassId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EquipmentId(pub u16);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skill#{}", self.0)
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "equip#{}", self.0)
    }
}

/// Board row. Front-row units soak melee pressure; back-row units act later
/// on turn-order ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Row {
    Front,
    Back,
}

/// Position on a team's 2x3 board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardPosition {
    pub row: Row,
    /// Column 0-2 within the row.
    pub column: u8,
}

impl BoardPosition {
    pub fn new(row: Row, column: u8) -> Self {
        debug_assert!(column < 3);
        Self { row, column }
    }

    /// Turn-order tie-break rank: front columns rank 0-2, back columns 3-5.
    /// Lower wins.
    pub fn turn_priority(self) -> u8 {
        match self.row {
            Row::Front => self.column,
            Row::Back => 3 + self.column,
        }
    }
}

/// Time of day, fixed for the whole battle. Formation tactics can test it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_row_outranks_back_row() {
        let front_edge = BoardPosition::new(Row::Front, 2);
        let back_center = BoardPosition::new(Row::Back, 0);
        assert!(front_edge.turn_priority() < back_center.turn_priority());
    }

    #[test]
    fn unit_ids_order_home_first() {
        let home = UnitId::new(TeamSide::Home, 5);
        let away = UnitId::new(TeamSide::Away, 0);
        assert!(home < away);
    }
}
