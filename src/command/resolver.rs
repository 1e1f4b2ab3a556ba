//! Resolution of what a skirmish order refers to: which battle, which troop

use thiserror::Error;

use crate::battle::troop_kind::TroopKind;
use crate::channel::{Channel, Message};
use crate::command::error::CommandError;
use crate::core::types::{ActorId, BattleId, TroopId};
use crate::world::World;

/// The order does not pin down a battle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Battle {0} does not exist!")]
    NoSuchBattle(BattleId),

    #[error("There are no battles underway!")]
    NoneUnderway,

    #[error("There is more than one battle underway; you must specify which one to participate in.")]
    Ambiguous,
}

/// Resolves orders against the current world
pub struct OrderResolver<'a> {
    world: &'a World,
    channel: &'a dyn Channel,
}

impl<'a> OrderResolver<'a> {
    pub fn new(world: &'a World, channel: &'a dyn Channel) -> Self {
        Self { world, channel }
    }

    /// Pick the target battle
    ///
    /// An explicit id wins, then whatever the channel can infer from the
    /// message's context, then the single active battle if there is exactly
    /// one.
    pub fn battle(
        &self,
        explicit: Option<BattleId>,
        message: &Message,
    ) -> Result<BattleId, ExtractionError> {
        if let Some(id) = explicit {
            return self
                .world
                .battle(id)
                .map(|b| b.id)
                .ok_or(ExtractionError::NoSuchBattle(id));
        }

        if let Some(id) = self
            .channel
            .infer_battle(message, self.world)
            .filter(|id| self.world.battle(*id).is_some())
        {
            return Ok(id);
        }

        match self.world.active_battles().as_slice() {
            [] => Err(ExtractionError::NoneUnderway),
            [only] => Ok(*only),
            _ => Err(ExtractionError::Ambiguous),
        }
    }

    /// First deployable troop of the named kind, in issue order
    pub fn troop(&self, actor: ActorId, troop_type: &str) -> Result<TroopId, CommandError> {
        let no_free = || CommandError::NoFreeTroops(troop_type.to_string());
        let kind: TroopKind = troop_type.parse().map_err(|_| no_free())?;

        self.world
            .troops_of(actor)
            .find(|t| t.kind == kind && t.is_deployable())
            .map(|t| t.id)
            .ok_or_else(no_free)
    }
}
