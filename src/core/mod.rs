pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BattleConfig, BotConfig, Config, ConfigError, Schedule};
pub use error::{Result, WarError};
pub use types::{ActorId, BattleId, Position, Side, Timestamp, TroopId};
