//! Tick system - advances one battle by one frame
//!
//! Pending battles whose start time has come begin; active battles move
//! every due troop and end once their time is up.

use crate::command::outcome::Outcome;
use crate::core::config::BattleConfig;
use crate::core::error::WarError;
use crate::core::types::{BattleId, Timestamp};
use crate::world::World;

/// What one battle did during a frame
#[derive(Debug, Clone)]
pub struct BattleTick {
    pub battle: BattleId,
    pub outcomes: Vec<Outcome>,
    /// Still running after the frame
    pub active: bool,
    /// Concluded during this frame
    pub concluded: bool,
}

pub fn advance_battle(
    world: &mut World,
    id: BattleId,
    rules: &BattleConfig,
    now: Timestamp,
) -> Result<BattleTick, WarError> {
    let mut session = world
        .session(id, rules, now)
        .ok_or(WarError::BattleNotFound(id))?;

    let was_relevant = session.battle().relevant;
    let outcomes = session.update()?;
    let battle = session.battle();

    if !outcomes.is_empty() {
        tracing::debug!("Battle {} produced {} outcomes", id, outcomes.len());
    }

    Ok(BattleTick {
        battle: id,
        active: battle.active,
        concluded: was_relevant && !battle.relevant,
        outcomes,
    })
}
