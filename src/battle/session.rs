//! Battle state machine
//!
//! A `BattleSession` borrows one battle plus the troop and actor tables for
//! the span of a single store transaction. Everything that changes a
//! battle (deployment, forward creep, fights, scoring, lifecycle) goes
//! through here so the grid, the roster and troop positions move together.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::battle::record::Battle;
use crate::battle::troop::Troop;
use crate::battle::troop_kind::{fight, FightOutcome};
use crate::command::outcome::Outcome;
use crate::core::config::BattleConfig;
use crate::core::types::{ActorId, Position, Side, Timestamp, TroopId};
use crate::world::actor::Actor;

/// Which edge of the board a placement fell off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Row,
    Column,
    EnemyTerritory,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Boundary::Row => "That row is not on the board!",
            Boundary::Column => "That column is not on the board!",
            Boundary::EnemyTerritory => "You cannot place a troop in enemy territory",
        })
    }
}

/// Player-facing placement refusals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("There is already a troop at that location")]
    Occupied,

    #[error("{0}")]
    OutOfBounds(Boundary),

    #[error("That battle is over!")]
    BattleEnded,

    /// Past its start time but never started, or stopped before its end
    #[error("That battle has ended early!")]
    BattleEndedEarly,

    #[error("That battle has not yet begun!")]
    BattleNotStarted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// A record referenced a troop that does not exist
    #[error("Unknown troop {0}")]
    UnknownTroop(TroopId),

    #[error("Unknown actor {0}")]
    UnknownActor(ActorId),
}

/// Why a troop is being put on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A player committing a fresh troop
    Deploy,
    /// The engine stepping a troop forward
    Advance,
}

const FELL_IN_BATTLE: &str = "has fallen in battle";
const BEHIND_ENEMY_LINES: &str = "slipped behind enemy lines";

pub struct BattleSession<'w> {
    battle: &'w mut Battle,
    troops: &'w mut BTreeMap<TroopId, Troop>,
    actors: &'w BTreeMap<ActorId, Actor>,
    rules: &'w BattleConfig,
    now: Timestamp,
}

impl<'w> BattleSession<'w> {
    pub fn new(
        battle: &'w mut Battle,
        troops: &'w mut BTreeMap<TroopId, Troop>,
        actors: &'w BTreeMap<ActorId, Actor>,
        rules: &'w BattleConfig,
        now: Timestamp,
    ) -> Self {
        Self {
            battle,
            troops,
            actors,
            rules,
            now,
        }
    }

    pub fn battle(&self) -> &Battle {
        self.battle
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    fn troop(&self, id: TroopId) -> Result<&Troop, BattleError> {
        self.troops.get(&id).ok_or(BattleError::UnknownTroop(id))
    }

    fn troop_mut(&mut self, id: TroopId) -> Result<&mut Troop, BattleError> {
        self.troops.get_mut(&id).ok_or(BattleError::UnknownTroop(id))
    }

    /// Side a troop fights for, derived from its current owner
    pub fn side_of(&self, id: TroopId) -> Result<Side, BattleError> {
        let owner = self.troop(id)?.owner;
        self.actors
            .get(&owner)
            .map(|actor| actor.side)
            .ok_or(BattleError::UnknownActor(owner))
    }

    /// Turn signed coordinates into a cell on this board
    fn cell(&self, col: i64, row: i64) -> Result<Position, PlacementError> {
        let grid = &self.battle.grid;
        let row = usize::try_from(row)
            .ok()
            .filter(|r| *r < grid.rows())
            .ok_or(PlacementError::OutOfBounds(Boundary::Row))?;
        let col = usize::try_from(col)
            .ok()
            .filter(|c| *c < grid.cols())
            .ok_or(PlacementError::OutOfBounds(Boundary::Column))?;
        Ok(Position::new(row, col))
    }

    fn check_deployment(&self, side: Side, col: i64, row: i64) -> Result<Position, PlacementError> {
        if !self.battle.relevant || self.now >= self.battle.ends {
            return Err(PlacementError::BattleEnded);
        }
        if !self.battle.active {
            if self.now < self.battle.begins {
                return Err(PlacementError::BattleNotStarted);
            }
            return Err(PlacementError::BattleEndedEarly);
        }
        let cell = self.cell(col, row)?;
        if self.battle.grid.territory(cell.col) != Some(side) {
            return Err(PlacementError::OutOfBounds(Boundary::EnemyTerritory));
        }
        if self.battle.grid.occupant(cell).is_some() {
            return Err(PlacementError::Occupied);
        }
        Ok(cell)
    }

    /// Put a troop on a cell, either as a player deployment or as one step
    /// of automatic movement
    ///
    /// Deployment validates timing, bounds, territory and occupancy, and
    /// fails without touching anything. Advancing never fails on the board
    /// itself: running off the far edge scores, bumping a friend halts, and
    /// bumping an enemy starts a fight.
    pub fn place_troop(
        &mut self,
        id: TroopId,
        col: i64,
        row: i64,
        placement: Placement,
    ) -> Result<Outcome, BattleError> {
        let side = self.side_of(id)?;
        let mut report = String::new();

        let target = match placement {
            Placement::Deploy => {
                let cell = self.check_deployment(side, col, row)?;
                let battle_id = self.battle.id;
                self.troop_mut(id)?.battle = Some(battle_id);
                self.battle.enlist(id);
                cell
            }
            Placement::Advance => {
                if col < 0 || col >= self.battle.grid.cols() as i64 {
                    return self.cross_goal(id, side);
                }
                let cell = self.cell(col, row)?;

                if let Some(other) = self.battle.grid.occupant(cell).filter(|o| *o != id) {
                    let other_side = self.side_of(other)?;
                    if other_side == side {
                        return Ok(Outcome::info(format!(
                            "Troop {} halted to avoid friendly fire",
                            id
                        )));
                    }

                    let (ours, theirs) = (self.troop(id)?.kind, self.troop(other)?.kind);
                    match fight(ours, theirs) {
                        FightOutcome::Attacker => {
                            self.triumph(id, other, side)?;
                            report = format!(": defeated {}", other);
                        }
                        FightOutcome::Defender => {
                            self.triumph(other, id, other_side)?;
                            report = format!(": was defeated by {}", other);
                        }
                        FightOutcome::Tie => {
                            self.evict_troop(id, true)?;
                            self.evict_troop(other, true)?;
                            report = format!(": tied with {}", other);
                        }
                    }
                }
                cell
            }
        };

        if self.troop(id)?.is_on_field(self.battle.id) {
            self.settle(id, target)?;
            let verb = match placement {
                Placement::Deploy => "placed at",
                Placement::Advance => "moved to",
            };
            Ok(Outcome::info(format!("Troop {} {} {}{}", id, verb, target, report)))
        } else {
            Ok(Outcome::info(format!("Troop {} left the field{}", id, report)))
        }
    }

    /// Record a troop on its new cell, clearing the one it left
    fn settle(&mut self, id: TroopId, target: Position) -> Result<(), BattleError> {
        let now = self.now;
        let troop = self.troop_mut(id)?;
        let previous = troop.position.replace(target);
        troop.last_move = now;

        if let Some(previous) = previous.filter(|p| *p != target) {
            self.battle.grid.vacate(id, previous);
        }
        self.battle.grid.place(id, target);
        Ok(())
    }

    fn triumph(&mut self, winner: TroopId, loser: TroopId, side: Side) -> Result<(), BattleError> {
        let victor = self.troop_mut(winner)?;
        victor.visible = true;
        victor.opposed = true;

        self.kill_troop(loser, FELL_IN_BATTLE)?;
        self.battle.scores.award(side, self.rules.kill_score);
        tracing::debug!(
            "Battle {}: troop {} defeated troop {}, side {} +{}",
            self.battle.id,
            winner,
            loser,
            side,
            self.rules.kill_score
        );
        Ok(())
    }

    fn cross_goal(&mut self, id: TroopId, side: Side) -> Result<Outcome, BattleError> {
        let unopposed = !self.troop(id)?.opposed;
        self.kill_troop(id, BEHIND_ENEMY_LINES)?;

        let mut amount = self.rules.goal_score;
        if unopposed {
            amount = amount.saturating_mul(2);
        }
        self.battle.scores.award(side, amount);
        tracing::debug!(
            "Battle {}: troop {} reached the goal, side {} +{}",
            self.battle.id,
            id,
            side,
            amount
        );

        Ok(Outcome::score(
            format!(
                "Troop {} slipped behind enemy lines, awarding side {} {} points",
                id, side, amount
            ),
            side,
            amount,
        ))
    }

    /// Step a troop one column toward the enemy's edge
    pub fn move_troop(&mut self, id: TroopId) -> Result<Outcome, BattleError> {
        let side = self.side_of(id)?;
        let Some(from) = self.troop(id)?.position else {
            return Ok(Outcome::info(format!("Troop {} is not on the field", id)));
        };

        let col = from.col as i64 + side.advance();
        let outcome = self.place_troop(id, col, from.row as i64, Placement::Advance)?;

        if self.troop(id)?.position != Some(from) {
            self.battle.grid.vacate(id, from);
        }
        tracing::debug!("Battle {}: {}", self.battle.id, outcome.text);
        Ok(outcome)
    }

    /// Take a troop off the board without releasing it from the battle
    ///
    /// The affiliation stays so status reports can say where it died.
    pub fn kill_troop(&mut self, id: TroopId, cause: &str) -> Result<(), BattleError> {
        let battle_id = self.battle.id;
        let troop = self.troop_mut(id)?;
        troop.fall(cause);
        let cell = if troop.battle == Some(battle_id) {
            troop.position.take()
        } else {
            None
        };

        if let Some(cell) = cell {
            self.battle.grid.vacate(id, cell);
        }
        Ok(())
    }

    /// Revive a troop and release it from this battle
    pub fn evict_troop(&mut self, id: TroopId, clear_board: bool) -> Result<(), BattleError> {
        let battle_id = self.battle.id;
        let troop = self.troop_mut(id)?;
        if troop.battle != Some(battle_id) {
            return Ok(());
        }

        troop.revive();
        troop.battle = None;
        let cell = troop.position.take();

        self.battle.discharge(id);
        if let (true, Some(cell)) = (clear_board, cell) {
            self.battle.grid.vacate(id, cell);
        }
        Ok(())
    }

    pub fn start(&mut self) {
        self.battle.active = true;
        tracing::info!("Battle {} has begun", self.battle.id);
    }

    /// Conclude the battle and send every troop home alive
    pub fn end(&mut self) -> Result<Option<Side>, BattleError> {
        let victor = self.battle.scores.leader();
        self.battle.victor = victor;
        self.battle.active = false;
        self.battle.relevant = false;

        for id in self.battle.roster.clone() {
            self.evict_troop(id, true)?;
        }

        tracing::info!(
            "Battle {} has completed, scores {:?}, victor {:?}",
            self.battle.id,
            self.battle.scores.0,
            victor
        );
        Ok(victor)
    }

    /// Advance this battle to `now`
    ///
    /// A pending battle only starts; an active one moves every due troop in
    /// enlistment order and then ends if its time is up.
    pub fn update(&mut self) -> Result<Vec<Outcome>, BattleError> {
        let mut outcomes = Vec::new();
        let battle_id = self.battle.id;

        if !self.battle.active {
            if self.battle.relevant && self.now >= self.battle.begins {
                self.start();
                outcomes.push(Outcome::battle_began(battle_id));
            }
            return Ok(outcomes);
        }

        for id in self.battle.roster.clone() {
            let troop = self.troop(id)?;
            if !troop.is_on_field(battle_id) {
                continue;
            }
            if troop.last_move.saturating_add(self.rules.troop_delay) <= self.now {
                outcomes.push(self.move_troop(id)?);
            }
        }

        if self.now >= self.battle.ends {
            let victor = self.end()?;
            outcomes.push(Outcome::battle_ended(battle_id, victor));
        }
        Ok(outcomes)
    }
}
