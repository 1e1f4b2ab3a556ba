//! Players who issue commands

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Side, Timestamp, TroopId};

/// A registered player and the troops issued to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub side: Side,
    pub recruited: Timestamp,
    /// Issue order; command resolution scans troops in this order
    pub troops: Vec<TroopId>,
}

impl Actor {
    pub fn new(id: ActorId, name: impl Into<String>, side: Side, recruited: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            side,
            recruited,
            troops: Vec::new(),
        }
    }
}
