use thiserror::Error;

use crate::battle::BattleError;
use crate::command::CommandError;
use crate::core::config::ConfigError;
use crate::core::types::BattleId;
use crate::store::StoreError;

/// Errors that stop the main loop
#[derive(Error, Debug)]
pub enum WarError {
    #[error("Battle not found: {0}")]
    BattleNotFound(BattleId),

    #[error("Battle error: {0}")]
    Battle(#[from] BattleError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WarError>;
