//! Command execution - binds a parsed command to its requester and a battle

use crate::battle::session::{BattleError, Placement};
use crate::channel::{Channel, Message};
use crate::command::error::CommandError;
use crate::command::outcome::{Outcome, OutcomeExtra};
use crate::command::parser::{Command, SkirmishOrder};
use crate::command::resolver::{ExtractionError, OrderResolver};
use crate::command::status::StatusReport;
use crate::core::config::BattleConfig;
use crate::core::types::Timestamp;
use crate::world::World;

/// Everything a command may read or change while it runs
pub struct ExecutionContext<'a> {
    pub world: &'a mut World,
    pub rules: &'a BattleConfig,
    pub now: Timestamp,
    pub channel: &'a dyn Channel,
    pub message: &'a Message,
}

impl Command {
    /// Run against the world; refusals come back as recoverable errors
    pub fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<Outcome, CommandError> {
        match self {
            Command::Skirmish(order) => skirmish(order, ctx),
            Command::Status => status(ctx),
        }
    }
}

fn skirmish(order: &SkirmishOrder, ctx: &mut ExecutionContext<'_>) -> Result<Outcome, CommandError> {
    let issuer = ctx.message.issuer;
    if ctx.world.actor(issuer).is_none() {
        return Err(BattleError::UnknownActor(issuer).into());
    }

    let resolver = OrderResolver::new(ctx.world, ctx.channel);
    let battle = resolver.battle(order.battle, ctx.message)?;
    let troop = resolver.troop(issuer, &order.troop_type)?;

    let mut session = ctx
        .world
        .session(battle, ctx.rules, ctx.now)
        .ok_or(ExtractionError::NoSuchBattle(battle))?;
    let col = i64::try_from(order.col).unwrap_or(i64::MAX);
    let row = i64::try_from(order.row).unwrap_or(i64::MAX);
    session.place_troop(troop, col, row, Placement::Deploy)?;

    tracing::info!("Actor {} deployed troop {} in battle {}", issuer, troop, battle);
    let text = format!(
        "{} #{} with {} at {}{}",
        order.verb.gerund(),
        battle,
        order.troop_type,
        order.raw_col.to_ascii_uppercase(),
        order.raw_row
    );
    Ok(Outcome::reply(ctx.message, text).with_extra(OutcomeExtra::Deployed { battle, troop }))
}

fn status(ctx: &mut ExecutionContext<'_>) -> Result<Outcome, CommandError> {
    let issuer = ctx.message.issuer;
    let report = StatusReport::for_actor(ctx.world, issuer)
        .ok_or(CommandError::Battle(BattleError::UnknownActor(issuer)))?;
    Ok(Outcome::reply(ctx.message, ctx.channel.render_status(&report)))
}
