//! The persisted battle record

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::battle::grid::Grid;
use crate::core::config::BattleConfig;
use crate::core::types::{BattleId, Side, Timestamp, TroopId};

/// Points per side, indexed by `Side::index`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard(pub [u32; 2]);

impl Scoreboard {
    pub fn get(&self, side: Side) -> u32 {
        self.0[side.index()]
    }

    pub fn award(&mut self, side: Side, amount: u32) {
        let score = &mut self.0[side.index()];
        *score = score.saturating_add(amount);
    }

    /// The side strictly ahead, if any
    pub fn leader(&self) -> Option<Side> {
        let [west, east] = self.0;
        if west > east {
            Some(Side::West)
        } else if east > west {
            Some(Side::East)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,

    pub begins: Timestamp,
    /// Real end, including jitter
    pub ends: Timestamp,
    /// End time shown to players
    pub display_ends: Timestamp,

    pub active: bool,
    /// Still tracked by the tick driver; cleared once, at conclusion
    pub relevant: bool,

    pub scores: Scoreboard,
    pub victor: Option<Side>,

    pub grid: Grid,

    /// Committed troops in enlistment order; movement runs in this order
    pub roster: Vec<TroopId>,

    /// Owned by whoever created the battle; never interpreted here
    pub external: Map<String, Value>,
}

impl Battle {
    /// A pending battle whose clock starts at `now`
    pub fn create<R: Rng>(id: BattleId, rules: &BattleConfig, now: Timestamp, rng: &mut R) -> Self {
        let schedule = rules.schedule(now, rng);
        Self {
            id,
            begins: schedule.begins,
            ends: schedule.ends,
            display_ends: schedule.display_ends,
            active: false,
            relevant: true,
            scores: Scoreboard::default(),
            victor: None,
            grid: Grid::new(rules.rows, rules.columns),
            roster: Vec::new(),
            external: Map::new(),
        }
    }

    pub fn is_concluded(&self) -> bool {
        !self.relevant
    }

    pub(crate) fn enlist(&mut self, troop: TroopId) {
        if !self.roster.contains(&troop) {
            self.roster.push(troop);
        }
    }

    pub(crate) fn discharge(&mut self, troop: TroopId) {
        self.roster.retain(|t| *t != troop);
    }
}
