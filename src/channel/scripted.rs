//! Channel that replays queued messages and remembers what it was told

use serde_json::{json, Map, Value};

use crate::battle::record::Battle;
use crate::channel::{Channel, Message};
use crate::command::outcome::Outcome;
use crate::core::types::{ActorId, BattleId};
use crate::world::World;

#[derive(Debug, Default)]
pub struct ScriptedChannel {
    queue: Vec<Message>,
    closed: bool,
    /// Answer for every `infer_battle` call
    pub inferred: Option<BattleId>,
    /// Everything passed to `report_results`, one entry per loop iteration
    pub reported: Vec<Vec<Outcome>>,
    pub updated: Vec<BattleId>,
    pub ended: Vec<BattleId>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for the next poll
    pub fn push(&mut self, raw_text: impl Into<String>, issuer: ActorId) {
        self.queue.push(Message::new(raw_text, issuer));
    }

    /// Stop the loop once the queue has drained
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Outcomes of the most recent loop iteration
    pub fn last_results(&self) -> &[Outcome] {
        self.reported.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Channel for ScriptedChannel {
    fn poll_messages(&mut self, _world: &World) -> Option<Vec<Message>> {
        if self.closed && self.queue.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.queue))
    }

    fn infer_battle(&self, _message: &Message, _world: &World) -> Option<BattleId> {
        self.inferred
    }

    fn populate_battle_data(&mut self, battle: &Battle, data: &mut Map<String, Value>) {
        data.insert("scripted".into(), json!({ "battle": battle.id.0 }));
    }

    fn update_battle(&mut self, battle: &Battle, _world: &World) {
        self.updated.push(battle.id);
    }

    fn report_battle_end(&mut self, battle: &Battle, _world: &World) {
        self.ended.push(battle.id);
    }

    fn report_results(&mut self, outcomes: &[Outcome], _world: &World) {
        self.reported.push(outcomes.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_drains_then_closes() {
        let world = World::new();
        let mut channel = ScriptedChannel::new();
        channel.push("status", ActorId(1));
        channel.close();

        let batch = channel.poll_messages(&world).unwrap();
        assert_eq!(batch, vec![Message::new("status", ActorId(1))]);
        assert_eq!(channel.poll_messages(&world), None);
    }

    #[test]
    fn test_open_channel_polls_empty() {
        let world = World::new();
        let mut channel = ScriptedChannel::new();
        assert_eq!(channel.poll_messages(&world), Some(Vec::new()));
        assert!(channel.last_results().is_empty());
    }
}
