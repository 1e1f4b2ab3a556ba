//! Per-player troop status

use std::fmt;

use crate::battle::troop_kind::TroopKind;
use crate::core::types::{ActorId, BattleId, Position, Side, TroopId};
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Free to deploy
    Ready,
    InBattle {
        battle: BattleId,
        position: Option<Position>,
    },
    Fallen {
        battle: Option<BattleId>,
        cause: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TroopStatus {
    pub id: TroopId,
    pub kind: TroopKind,
    pub disposition: Disposition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub actor: ActorId,
    pub name: String,
    pub side: Side,
    pub troops: Vec<TroopStatus>,
}

impl StatusReport {
    pub fn for_actor(world: &World, actor: ActorId) -> Option<Self> {
        let who = world.actor(actor)?;
        let troops = world
            .troops_of(actor)
            .map(|troop| {
                let disposition = if !troop.is_alive() {
                    Disposition::Fallen {
                        battle: troop.battle,
                        cause: troop.cause_of_death.clone().unwrap_or_default(),
                    }
                } else if let Some(battle) = troop.battle {
                    Disposition::InBattle {
                        battle,
                        position: troop.position,
                    }
                } else {
                    Disposition::Ready
                };
                TroopStatus {
                    id: troop.id,
                    kind: troop.kind,
                    disposition,
                }
            })
            .collect();

        Some(Self {
            actor,
            name: who.name.clone(),
            side: who.side,
            troops,
        })
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Ready => f.write_str("ready"),
            Disposition::InBattle {
                battle,
                position: Some(cell),
            } => write!(f, "in battle #{} at {}", battle, cell),
            Disposition::InBattle { battle, .. } => write!(f, "in battle #{}", battle),
            Disposition::Fallen {
                battle: Some(battle),
                cause,
            } => write!(f, "fell in battle #{}: {}", battle, cause),
            Disposition::Fallen { cause, .. } => write!(f, "fallen: {}", cause),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (side {})", self.name, self.side)?;
        for troop in &self.troops {
            write!(f, "\n  Troop {} ({}): {}", troop.id, troop.kind, troop.disposition)?;
        }
        Ok(())
    }
}
