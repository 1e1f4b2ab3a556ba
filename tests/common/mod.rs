//! Shared harness: a driver over a scripted channel and a hand-cranked clock

#![allow(dead_code)]

use warboard::battle::Troop;
use warboard::channel::ScriptedChannel;
use warboard::command::Outcome;
use warboard::core::{
    ActorId, BattleConfig, BattleId, BotConfig, Clock, Config, ManualClock, Position, Side,
    TroopId, WarError,
};
use warboard::simulation::Driver;
use warboard::store::Store;

pub const START: i64 = 1_000_000;

pub struct Harness {
    pub driver: Driver<ScriptedChannel, ManualClock>,
    pub alice: ActorId,
    pub bob: ActorId,
    pub battle: BattleId,
}

impl Harness {
    /// Two players and one running battle; troops wait an hour between steps
    pub fn new() -> Self {
        Self::with_troop_delay(3600)
    }

    pub fn with_troop_delay(troop_delay: i64) -> Self {
        let config = Config {
            bot: BotConfig {
                seed: Some(42),
                ..BotConfig::default()
            },
            battle: BattleConfig {
                start_delay: 600,
                duration: 7200,
                rows: 5,
                columns: 11,
                troop_delay,
                goal_score: 2,
                kill_score: 1,
                ..BattleConfig::default()
            },
        };
        let mut driver = Driver::new(
            Store::in_memory(),
            ScriptedChannel::new(),
            ManualClock::new(START),
            config,
        );
        let alice = driver.register_player("alice", Side::West).unwrap();
        let bob = driver.register_player("bob", Side::East).unwrap();
        let battle = driver.create_battle().unwrap();
        driver.start_battle(battle).unwrap();

        Self {
            driver,
            alice,
            bob,
            battle,
        }
    }

    /// One loop iteration with no new messages
    pub fn bot_loop(&mut self) -> Vec<Outcome> {
        self.driver.loop_once().unwrap()
    }

    /// Send a command and run the loop; the command itself must succeed
    pub fn execute(&mut self, text: &str, who: ActorId) -> Vec<Outcome> {
        self.driver.channel_mut().push(text, who);
        let results = self.bot_loop();
        assert!(results[0].success, "`{}` failed: {}", text, results[0].text);
        results
    }

    /// Send a command that must be refused with exactly `err_text`
    pub fn fail_to_execute(&mut self, text: &str, who: ActorId, err_text: &str) -> Vec<Outcome> {
        self.driver.channel_mut().push(text, who);
        let results = self.bot_loop();
        assert!(!results[0].success, "`{}` unexpectedly succeeded", text);
        assert_eq!(results[0].text, err_text);
        results
    }

    /// Jump to the battle's real end and run the loop
    pub fn end_battle(&mut self) -> Vec<Outcome> {
        let ends = self.driver.store().world().battle(self.battle).unwrap().ends;
        if self.driver.clock().now() < ends {
            self.driver.clock().set(ends);
        }
        self.bot_loop()
    }

    pub fn occupant(&self, row: usize, col: usize) -> Option<TroopId> {
        self.occupant_in(self.battle, row, col)
    }

    pub fn occupant_in(&self, battle: BattleId, row: usize, col: usize) -> Option<TroopId> {
        self.driver
            .store()
            .world()
            .battle(battle)
            .unwrap()
            .grid
            .occupant(Position::new(row, col))
    }

    pub fn troop(&self, id: TroopId) -> Troop {
        self.driver.store().world().troop(id).unwrap().clone()
    }

    pub fn troops_of(&self, who: ActorId) -> Vec<Troop> {
        self.driver.store().world().troops_of(who).cloned().collect()
    }

    pub fn scores(&self) -> [u32; 2] {
        self.driver.store().world().battle(self.battle).unwrap().scores.0
    }

    pub fn kill(&mut self, troop: TroopId, cause: &str) {
        let rules = self.driver.config().battle.clone();
        let now = self.driver.clock().now();
        let battle = self.battle;
        self.driver
            .store_mut()
            .transaction(|world| {
                let mut session = world
                    .session(battle, &rules, now)
                    .ok_or(WarError::BattleNotFound(battle))?;
                session.kill_troop(troop, cause)?;
                Ok::<_, WarError>(())
            })
            .unwrap();
    }
}
