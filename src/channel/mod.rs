//! The messaging collaborator
//!
//! A `Channel` is where player commands come from and where outcomes go.
//! The arbiter only ever talks to it through this trait; a chat platform,
//! the console REPL and the scripted test harness are all channels.

pub mod console;
pub mod scripted;

use serde_json::{Map, Value};

use crate::battle::record::Battle;
use crate::command::outcome::Outcome;
use crate::command::status::StatusReport;
use crate::core::types::{ActorId, BattleId};
use crate::world::World;

pub use console::{render_board, ConsoleChannel};
pub use scripted::ScriptedChannel;

/// One command as received from a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub raw_text: String,
    pub issuer: ActorId,
}

impl Message {
    pub fn new(raw_text: impl Into<String>, issuer: ActorId) -> Self {
        Self {
            raw_text: raw_text.into(),
            issuer,
        }
    }
}

pub trait Channel {
    /// Next batch of commands, in arrival order; `None` asks the loop to stop
    fn poll_messages(&mut self, world: &World) -> Option<Vec<Message>>;

    /// Battle a message refers to, when its context makes that clear
    fn infer_battle(&self, _message: &Message, _world: &World) -> Option<BattleId> {
        None
    }

    /// Attach channel-owned data to a battle before it is first stored
    ///
    /// By convention the map is keyed by channel name so several channels
    /// can share one battle.
    fn populate_battle_data(&mut self, _battle: &Battle, _data: &mut Map<String, Value>) {}

    fn render_status(&self, report: &StatusReport) -> String {
        report.to_string()
    }

    /// A battle is still running after this tick
    fn update_battle(&mut self, _battle: &Battle, _world: &World) {}

    /// A battle concluded this tick
    fn report_battle_end(&mut self, _battle: &Battle, _world: &World) {}

    /// Every outcome of one loop iteration, in order
    fn report_results(&mut self, _outcomes: &[Outcome], _world: &World) {}
}

/// Never has anything to say and ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChannel;

impl Channel for NullChannel {
    fn poll_messages(&mut self, _world: &World) -> Option<Vec<Message>> {
        Some(Vec::new())
    }
}
