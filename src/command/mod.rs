//! Command pipeline
//!
//! Raw text -> parser -> Command -> resolver + executor -> Outcome

pub mod error;
pub mod executor;
pub mod outcome;
pub mod parser;
pub mod resolver;
pub mod status;

pub use error::CommandError;
pub use executor::ExecutionContext;
pub use outcome::{FailureKind, Outcome, OutcomeCode, OutcomeExtra};
pub use parser::{parse, Command, ParseError, SkirmishOrder, Verb};
pub use resolver::{ExtractionError, OrderResolver};
pub use status::{Disposition, StatusReport, TroopStatus};
