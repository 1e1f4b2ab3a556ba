//! Errors raised while running a player command

use thiserror::Error;

use crate::battle::session::{BattleError, PlacementError};
use crate::command::outcome::FailureKind;
use crate::command::parser::ParseError;
use crate::command::resolver::ExtractionError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Placement(PlacementError),

    #[error("Could not find any free '{0}' troops")]
    NoFreeTroops(String),

    /// Broken records; stops the loop
    #[error(transparent)]
    Battle(BattleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BattleError> for CommandError {
    fn from(e: BattleError) -> Self {
        match e {
            BattleError::Placement(p) => CommandError::Placement(p),
            other => CommandError::Battle(other),
        }
    }
}

impl CommandError {
    /// Failure family for errors the requester should simply be told about;
    /// `None` means the error is fatal
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            CommandError::Parse(_) => Some(FailureKind::Parse),
            CommandError::Extraction(_) => Some(FailureKind::BattleExtraction),
            CommandError::Placement(_) => Some(FailureKind::Placement),
            CommandError::NoFreeTroops(_) => Some(FailureKind::UnitAvailability),
            CommandError::Battle(_) | CommandError::Store(_) => None,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind().is_some()
    }
}
