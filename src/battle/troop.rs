//! A single deployable troop
//!
//! Troops are never destroyed. Dying takes a troop off the board; when its
//! battle ends (or it is evicted) it is revived and can deploy again.

use serde::{Deserialize, Serialize};

use crate::battle::troop_kind::TroopKind;
use crate::core::types::{ActorId, BattleId, Position, Timestamp, TroopId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Troop {
    pub id: TroopId,
    pub owner: ActorId,
    pub kind: TroopKind,

    /// Battle this troop is committed to, if any
    pub battle: Option<BattleId>,

    /// 1 = alive, 0 = dead
    pub health: u8,
    pub cause_of_death: Option<String>,

    /// Cell occupied while on the field
    pub position: Option<Position>,

    /// Revealed on the shared board after winning a fight
    pub visible: bool,
    /// Has taken part in a fight
    pub opposed: bool,

    pub last_move: Timestamp,
}

impl Troop {
    pub fn new(id: TroopId, owner: ActorId, kind: TroopKind) -> Self {
        Self {
            id,
            owner,
            kind,
            battle: None,
            health: 1,
            cause_of_death: None,
            position: None,
            visible: false,
            opposed: false,
            last_move: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Alive and not committed to any battle
    pub fn is_deployable(&self) -> bool {
        self.is_alive() && self.battle.is_none()
    }

    /// Alive and standing on the given battle's board
    pub fn is_on_field(&self, battle: BattleId) -> bool {
        self.is_alive() && self.battle == Some(battle)
    }

    pub fn fall(&mut self, cause: &str) {
        self.health = 0;
        self.cause_of_death = Some(cause.to_string());
    }

    /// Restore to fresh condition; affiliation is left to the caller
    pub fn revive(&mut self) {
        self.health = 1;
        self.cause_of_death = None;
        self.visible = false;
        self.opposed = false;
    }
}
