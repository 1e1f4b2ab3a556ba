//! World - every actor, troop and battle the arbiter knows about
//!
//! This is the unit of persistence: the store snapshots and commits a whole
//! `World` per transaction.

pub mod actor;

use std::collections::BTreeMap;

use ahash::AHashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::battle::grid::Grid;
use crate::battle::record::Battle;
use crate::battle::session::BattleSession;
use crate::battle::troop::Troop;
use crate::battle::troop_kind::TroopKind;
use crate::core::config::BattleConfig;
use crate::core::types::{ActorId, BattleId, Side, Timestamp, TroopId};

pub use actor::Actor;

/// A cross-record invariant that does not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("actor {actor} lists missing troop {troop}")]
    MissingTroop { actor: ActorId, troop: TroopId },

    #[error("troop {troop} listed by non-owner {actor}")]
    ForeignTroop { actor: ActorId, troop: TroopId },

    #[error("troop {troop} has unknown owner {owner}")]
    UnknownOwner { troop: TroopId, owner: ActorId },

    #[error("dead troop {0} still has a position")]
    DeadOnBoard(TroopId),

    #[error("troop {troop} claims battle {battle} but is not on its roster")]
    NotOnRoster { troop: TroopId, battle: BattleId },

    #[error("battle {battle} rosters troop {troop} which is not affiliated")]
    NotAffiliated { battle: BattleId, troop: TroopId },

    #[error("battle {0} grid disagrees with troop positions")]
    GridMismatch(BattleId),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    actors: BTreeMap<ActorId, Actor>,
    troops: BTreeMap<TroopId, Troop>,
    battles: BTreeMap<BattleId, Battle>,
    /// Lowercased actor name -> id
    names: AHashMap<String, ActorId>,
    next_actor: u64,
    next_troop: u64,
    next_battle: u64,
}

fn next_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player and issue their standard troops
    ///
    /// Registering a name that already exists returns the existing actor
    /// untouched.
    pub fn register_actor(&mut self, name: &str, side: Side, now: Timestamp) -> ActorId {
        if let Some(existing) = self.find_actor(name) {
            return existing;
        }

        let id = ActorId(next_id(&mut self.next_actor));
        self.actors.insert(id, Actor::new(id, name, side, now));
        self.names.insert(name.to_lowercase(), id);

        for kind in TroopKind::STANDARD_ISSUE {
            self.grant_troop(id, kind);
        }
        tracing::info!("Registered {} (id {}) on side {}", name, id, side);
        id
    }

    /// Give an actor one more troop; `None` if the actor is unknown
    pub fn grant_troop(&mut self, owner: ActorId, kind: TroopKind) -> Option<TroopId> {
        let actor = self.actors.get_mut(&owner)?;
        let id = TroopId(next_id(&mut self.next_troop));
        actor.troops.push(id);
        self.troops.insert(id, Troop::new(id, owner, kind));
        Some(id)
    }

    pub fn find_actor(&self, name: &str) -> Option<ActorId> {
        self.names.get(&name.to_lowercase()).copied()
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn troop(&self, id: TroopId) -> Option<&Troop> {
        self.troops.get(&id)
    }

    pub fn troop_mut(&mut self, id: TroopId) -> Option<&mut Troop> {
        self.troops.get_mut(&id)
    }

    /// An actor's troops in issue order
    pub fn troops_of(&self, owner: ActorId) -> impl Iterator<Item = &Troop> {
        self.actors
            .get(&owner)
            .into_iter()
            .flat_map(|actor| actor.troops.iter())
            .filter_map(move |id| self.troops.get(id))
    }

    pub fn battle(&self, id: BattleId) -> Option<&Battle> {
        self.battles.get(&id)
    }

    pub fn battle_mut(&mut self, id: BattleId) -> Option<&mut Battle> {
        self.battles.get_mut(&id)
    }

    pub fn battles(&self) -> impl Iterator<Item = &Battle> {
        self.battles.values()
    }

    pub fn create_battle<R: Rng>(
        &mut self,
        rules: &BattleConfig,
        now: Timestamp,
        rng: &mut R,
    ) -> BattleId {
        let id = BattleId(next_id(&mut self.next_battle));
        self.battles.insert(id, Battle::create(id, rules, now, rng));
        id
    }

    /// Battles the tick driver still has to look at, oldest first
    pub fn relevant_battles(&self) -> Vec<BattleId> {
        self.battles
            .values()
            .filter(|b| b.relevant)
            .map(|b| b.id)
            .collect()
    }

    pub fn active_battles(&self) -> Vec<BattleId> {
        self.battles
            .values()
            .filter(|b| b.active)
            .map(|b| b.id)
            .collect()
    }

    pub fn side_of(&self, troop: TroopId) -> Option<Side> {
        let owner = self.troops.get(&troop)?.owner;
        self.actors.get(&owner).map(|a| a.side)
    }

    /// Borrow one battle together with the tables it mutates
    pub fn session<'w>(
        &'w mut self,
        id: BattleId,
        rules: &'w BattleConfig,
        now: Timestamp,
    ) -> Option<BattleSession<'w>> {
        let World {
            actors,
            troops,
            battles,
            ..
        } = self;
        let battle = battles.get_mut(&id)?;
        Some(BattleSession::new(battle, troops, actors, rules, now))
    }

    /// Verify the cross-record invariants
    ///
    /// Every grid must equal the grid rebuilt from the positions of the
    /// living troops affiliated with it, and rosters must agree with troop
    /// affiliation in both directions.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        for actor in self.actors.values() {
            for id in &actor.troops {
                match self.troops.get(id) {
                    Some(troop) if troop.owner == actor.id => {}
                    Some(_) => {
                        return Err(IntegrityError::ForeignTroop {
                            actor: actor.id,
                            troop: *id,
                        })
                    }
                    None => {
                        return Err(IntegrityError::MissingTroop {
                            actor: actor.id,
                            troop: *id,
                        })
                    }
                }
            }
        }

        for troop in self.troops.values() {
            if !self.actors.contains_key(&troop.owner) {
                return Err(IntegrityError::UnknownOwner {
                    troop: troop.id,
                    owner: troop.owner,
                });
            }
            if !troop.is_alive() && troop.position.is_some() {
                return Err(IntegrityError::DeadOnBoard(troop.id));
            }
            if let Some(battle) = troop.battle {
                let enlisted = self
                    .battles
                    .get(&battle)
                    .map_or(false, |b| b.roster.contains(&troop.id));
                if !enlisted {
                    return Err(IntegrityError::NotOnRoster {
                        troop: troop.id,
                        battle,
                    });
                }
            }
        }

        for battle in self.battles.values() {
            for id in &battle.roster {
                if self.troops.get(id).and_then(|t| t.battle) != Some(battle.id) {
                    return Err(IntegrityError::NotAffiliated {
                        battle: battle.id,
                        troop: *id,
                    });
                }
            }

            let placements = battle.roster.iter().filter_map(|id| {
                let troop = self.troops.get(id)?;
                let position = troop.position.filter(|_| troop.is_on_field(battle.id))?;
                Some((*id, position))
            });
            let rebuilt = Grid::rebuild(battle.grid.rows(), battle.grid.cols(), placements);
            if rebuilt != battle.grid {
                return Err(IntegrityError::GridMismatch(battle.id));
            }
        }
        Ok(())
    }
}
