//! Main loop - poll the channel, run commands, tick battles, report
//!
//! Each command and each battle frame is its own store transaction, so a
//! failure part way through one never leaves half-applied state behind.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Map;

use crate::channel::{Channel, Message};
use crate::command::error::CommandError;
use crate::command::executor::ExecutionContext;
use crate::command::outcome::Outcome;
use crate::command::parser::parse;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::Config;
use crate::core::error::WarError;
use crate::core::types::{ActorId, BattleId, Side};
use crate::simulation::tick::advance_battle;
use crate::store::Store;

pub struct Driver<C: Channel, K: Clock = SystemClock> {
    store: Store,
    channel: C,
    clock: K,
    config: Config,
    rng: ChaCha8Rng,
    running: bool,
}

impl<C: Channel, K: Clock> Driver<C, K> {
    pub fn new(store: Store, channel: C, clock: K, config: Config) -> Self {
        let rng = match config.bot.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            store,
            channel,
            clock,
            config,
            rng,
            running: true,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Register a player unless one with that name exists
    pub fn register_player(&mut self, name: &str, side: Side) -> Result<ActorId, WarError> {
        let now = self.clock.now();
        self.store
            .transaction(|world| Ok::<_, WarError>(world.register_actor(name, side, now)))
    }

    /// Create a pending battle, letting the channel attach its own data
    pub fn create_battle(&mut self) -> Result<BattleId, WarError> {
        let now = self.clock.now();
        let Self {
            store,
            channel,
            config,
            rng,
            ..
        } = self;

        store.transaction(|world| {
            let id = world.create_battle(&config.battle, now, rng);
            if let Some(battle) = world.battle_mut(id) {
                let mut data = Map::new();
                channel.populate_battle_data(battle, &mut data);
                battle.external = data;
                tracing::info!(
                    "Created battle {}: begins {}, ends {} (shown as {})",
                    id,
                    battle.begins,
                    battle.ends,
                    battle.display_ends
                );
            }
            Ok::<_, WarError>(id)
        })
    }

    /// Start a pending battle now rather than at its scheduled time
    pub fn start_battle(&mut self, id: BattleId) -> Result<(), WarError> {
        let now = self.clock.now();
        let rules = &self.config.battle;
        self.store.transaction(|world| {
            let mut session = world
                .session(id, rules, now)
                .ok_or(WarError::BattleNotFound(id))?;
            if session.battle().relevant && !session.battle().active {
                session.start();
            }
            Ok(())
        })
    }

    /// Parse and run one message
    ///
    /// Refusals come back as failure outcomes; only fatal errors are `Err`.
    pub fn handle(&mut self, message: &Message) -> Result<Outcome, WarError> {
        tracing::info!("Handling: {:?}", message);
        let now = self.clock.now();
        let Self {
            store,
            channel,
            config,
            ..
        } = self;

        let result = parse(&message.raw_text)
            .map_err(CommandError::from)
            .and_then(|command| {
                store.transaction(|world| {
                    let mut ctx = ExecutionContext {
                        world,
                        rules: &config.battle,
                        now,
                        channel: &*channel,
                        message,
                    };
                    command.execute(&mut ctx)
                })
            });

        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => match e.kind() {
                Some(kind) => {
                    tracing::warn!("Refused `{}`: {}", message.raw_text, e);
                    Ok(Outcome::refusal(message, e.to_string(), kind))
                }
                None => Err(e.into()),
            },
        }
    }

    /// Advance every relevant battle by one tick
    pub fn frame(&mut self) -> Result<Vec<Outcome>, WarError> {
        tracing::info!("Updating battles");
        let now = self.clock.now();
        let mut outcomes = Vec::new();

        for id in self.store.world().relevant_battles() {
            tracing::info!("Updating battle {}", id);
            let rules = &self.config.battle;
            let tick = self
                .store
                .transaction(|world| advance_battle(world, id, rules, now))?;

            let world = self.store.world();
            if let Some(battle) = world.battle(id) {
                if tick.concluded {
                    self.channel.report_battle_end(battle, world);
                } else if tick.active {
                    self.channel.update_battle(battle, world);
                }
            }
            outcomes.extend(tick.outcomes);
        }
        Ok(outcomes)
    }

    /// One full iteration; returns everything reported to the channel
    pub fn loop_once(&mut self) -> Result<Vec<Outcome>, WarError> {
        let Some(messages) = self.channel.poll_messages(self.store.world()) else {
            tracing::info!("Channel closed, stopping");
            self.running = false;
            return Ok(Vec::new());
        };

        tracing::info!("Handling messages");
        let mut outcomes = Vec::with_capacity(messages.len());
        for message in &messages {
            outcomes.push(self.handle(message)?);
        }
        outcomes.extend(self.frame()?);

        self.channel.report_results(&outcomes, self.store.world());
        tracing::debug!("Results: {:?}", outcomes);
        Ok(outcomes)
    }

    /// Loop until the channel closes or something fatal happens
    pub fn loop_forever(&mut self) -> Result<(), WarError> {
        while self.running {
            self.loop_once()?;
            let delay = self.config.bot.sleep;
            if delay > 0 && self.running {
                tracing::info!("Sleeping for {} seconds", delay);
                std::thread::sleep(Duration::from_secs(delay));
            }
        }
        Ok(())
    }
}
