//! Battle system - a two-sided grid where deployed troops creep forward
//!
//! Players drop troops on their own half of the board; every tick each
//! due troop steps one column toward the enemy edge. Troops that meet
//! fight by kind, and troops that run off the far edge score.

pub mod coords;
pub mod grid;
pub mod record;
pub mod session;
pub mod troop;
pub mod troop_kind;

// Re-exports for convenient access
pub use coords::{cell_label, col_to_letter, letter_to_col};
pub use grid::Grid;
pub use record::{Battle, Scoreboard};
pub use session::{BattleError, BattleSession, Boundary, Placement, PlacementError};
pub use troop::Troop;
pub use troop_kind::{fight, FightOutcome, TroopKind, UnknownKind};
