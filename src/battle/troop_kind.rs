//! Troop kinds and the fixed advantage cycle between them
//!
//! Kinds are ranked `[ranged, infantry, cavalry]`. A kind beats the one
//! ranked just below it and loses to the one just above, wrapping around:
//! infantry beats ranged, cavalry beats infantry, ranged beats cavalry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type of troop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TroopKind {
    Ranged,
    Infantry,
    Cavalry,
}

/// Result of two troops meeting on the same cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FightOutcome {
    /// The first troop wins
    Attacker,
    /// The second troop wins
    Defender,
    Tie,
}

impl TroopKind {
    /// Ranked order the advantage cycle is defined over
    pub const RANKED: [TroopKind; 3] = [TroopKind::Ranged, TroopKind::Infantry, TroopKind::Cavalry];

    /// The kinds every actor is issued on registration, in issue order
    pub const STANDARD_ISSUE: [TroopKind; 3] =
        [TroopKind::Infantry, TroopKind::Cavalry, TroopKind::Ranged];

    fn rank(self) -> usize {
        match self {
            TroopKind::Ranged => 0,
            TroopKind::Infantry => 1,
            TroopKind::Cavalry => 2,
        }
    }

    /// The kind this one defeats
    pub fn prey(self) -> TroopKind {
        Self::RANKED[(self.rank() + 2) % 3]
    }

    /// The kind that defeats this one
    pub fn predator(self) -> TroopKind {
        Self::RANKED[(self.rank() + 1) % 3]
    }

    pub fn name(self) -> &'static str {
        match self {
            TroopKind::Ranged => "ranged",
            TroopKind::Infantry => "infantry",
            TroopKind::Cavalry => "cavalry",
        }
    }
}

/// Decide a fight; depends only on the two kinds
pub fn fight(attacker: TroopKind, defender: TroopKind) -> FightOutcome {
    if attacker == defender {
        FightOutcome::Tie
    } else if attacker.prey() == defender {
        FightOutcome::Attacker
    } else {
        FightOutcome::Defender
    }
}

impl fmt::Display for TroopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised troop kind name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for TroopKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ranged" => Ok(TroopKind::Ranged),
            "infantry" => Ok(TroopKind::Infantry),
            "cavalry" => Ok(TroopKind::Cavalry),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}
