//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::coords::cell_label;

/// Seconds since the Unix epoch
pub type Timestamp = i64;

/// Unique identifier for actors (the players issuing commands)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for troops
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TroopId(pub u64);

impl fmt::Display for TroopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for battles
///
/// Players refer to battles as `#<id>`, so ids are small sequential integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BattleId(pub u64);

impl fmt::Display for BattleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the two opposing factions
///
/// West (side 0) holds the low columns and advances toward increasing
/// columns; East (side 1) holds the high columns and advances the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    West,
    East,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::West, Side::East];

    /// Numeric index used in scores and player-facing text
    pub fn index(self) -> usize {
        match self {
            Side::West => 0,
            Side::East => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Side> {
        match index {
            0 => Some(Side::West),
            1 => Some(Side::East),
            _ => None,
        }
    }

    /// Column delta for one automatic step forward
    pub fn advance(self) -> i64 {
        match self {
            Side::West => 1,
            Side::East => -1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::West => Side::East,
            Side::East => Side::West,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// A cell on a battle grid (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&cell_label(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_index_round_trip() {
        for side in Side::ALL {
            assert_eq!(Side::from_index(side.index()), Some(side));
        }
        assert_eq!(Side::from_index(2), None);
    }

    #[test]
    fn test_sides_advance_toward_each_other() {
        assert_eq!(Side::West.advance(), 1);
        assert_eq!(Side::East.advance(), -1);
        assert_eq!(Side::West.opponent(), Side::East);
    }

    #[test]
    fn test_position_display_uses_board_label() {
        assert_eq!(Position::new(3, 2).to_string(), "C4");
    }
}
