//! Uniform record of everything that happens in a loop iteration
//!
//! Replies to players and engine notices share one shape so the channel can
//! publish them in order. Codes borrow from HTTP for the request/response
//! cases; the 6xx range is for engine notices the channel acts on.

use std::fmt;

use crate::channel::Message;
use crate::core::types::{BattleId, Side, TroopId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeCode {
    /// The requested action worked
    Ok,
    /// The requested action was refused
    Nok,
    /// Purely informational
    Info,
    /// A side gained points; see `OutcomeExtra::Score`
    Score,
    /// A battle started; see `OutcomeExtra::Battle`
    BattleBegan,
    /// A battle concluded; see `OutcomeExtra::Battle`
    BattleEnded,
}

impl OutcomeCode {
    pub fn as_u16(self) -> u16 {
        match self {
            OutcomeCode::Ok => 200,
            OutcomeCode::Nok => 400,
            OutcomeCode::Info => 600,
            OutcomeCode::Score => 601,
            OutcomeCode::BattleBegan => 698,
            OutcomeCode::BattleEnded => 699,
        }
    }
}

/// Which family of recoverable failure refused a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Parse,
    BattleExtraction,
    Placement,
    UnitAvailability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeExtra {
    Deployed { battle: BattleId, troop: TroopId },
    Score { side: Side, amount: u32 },
    Battle { battle: BattleId, victor: Option<Side> },
    Failure(FailureKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub text: String,
    pub success: bool,
    pub code: OutcomeCode,
    /// The command this answers; `None` for engine notices
    pub message: Option<Message>,
    pub extra: Option<OutcomeExtra>,
}

impl Outcome {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            code: OutcomeCode::Info,
            message: None,
            extra: None,
        }
    }

    pub fn score(text: impl Into<String>, side: Side, amount: u32) -> Self {
        Self {
            code: OutcomeCode::Score,
            extra: Some(OutcomeExtra::Score { side, amount }),
            ..Self::info(text)
        }
    }

    pub fn battle_began(battle: BattleId) -> Self {
        Self {
            code: OutcomeCode::BattleBegan,
            extra: Some(OutcomeExtra::Battle {
                battle,
                victor: None,
            }),
            ..Self::info(format!("Battle {} has begun", battle))
        }
    }

    pub fn battle_ended(battle: BattleId, victor: Option<Side>) -> Self {
        Self {
            code: OutcomeCode::BattleEnded,
            extra: Some(OutcomeExtra::Battle { battle, victor }),
            ..Self::info(format!("Battle {} has completed", battle))
        }
    }

    /// Successful answer to a command
    pub fn reply(message: &Message, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            code: OutcomeCode::Ok,
            message: Some(message.clone()),
            extra: None,
        }
    }

    /// Refusal of a command; the text is shown to the requester verbatim
    pub fn refusal(message: &Message, text: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            text: text.into(),
            success: false,
            code: OutcomeCode::Nok,
            message: Some(message.clone()),
            extra: Some(OutcomeExtra::Failure(kind)),
        }
    }

    pub fn with_extra(mut self, extra: OutcomeExtra) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Engine notice with nobody to reply to
    pub fn is_internal(&self) -> bool {
        self.message.is_none()
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self.extra {
            Some(OutcomeExtra::Failure(kind)) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
