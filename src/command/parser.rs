//! Command grammar
//!
//! ```text
//! command  = skirmish | status
//! skirmish = verb [ "#" digits ] "at" letter [ "," ] digits "with" text
//! verb     = "attack" | "oppose" | "support"
//! status   = "status"
//! ```
//!
//! Input is lowercased and only its first line is read. Whitespace between
//! tokens is optional. The troop text after `with` is taken verbatim to the
//! end of the line; whether it names a real troop kind is decided when the
//! command runs.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, multispace0, satisfy};
use nom::combinator::{cut, eof, map, map_opt, map_res, not, opt, rest, value, verify};
use nom::error::{ErrorKind, FromExternalError, ParseError as NomParseError};
use nom::sequence::{preceded, terminated};
use nom::{IResult, Parser};
use thiserror::Error;

use crate::battle::coords::letter_to_col;
use crate::core::types::BattleId;

/// Grammar failure, pointing at where parsing stopped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error for command `{line}`, col {column}.  Message: {message}")]
pub struct ParseError {
    pub line: String,
    /// 1-based, in characters
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Attack,
    Oppose,
    Support,
}

impl Verb {
    /// Progressive form used in replies
    pub fn gerund(self) -> &'static str {
        match self {
            Verb::Attack => "Attacking",
            Verb::Oppose => "Opposing",
            Verb::Support => "Supporting",
        }
    }
}

/// A request to deploy one troop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkirmishOrder {
    pub verb: Verb,
    /// Explicit `#id`, if given
    pub battle: Option<BattleId>,
    pub raw_col: char,
    pub raw_row: String,
    pub col: usize,
    /// 0-based; a written row of 0 is treated as the first row
    pub row: usize,
    pub troop_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Skirmish(SkirmishOrder),
    Status,
}

/// What the parser was looking for when it gave up
#[derive(Debug, Clone, PartialEq)]
struct Expected<'a> {
    input: &'a str,
    what: &'static str,
}

impl<'a> NomParseError<&'a str> for Expected<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        Self {
            input,
            what: "a command",
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    /// Keep whichever branch got further
    fn or(self, other: Self) -> Self {
        if other.input.len() <= self.input.len() {
            other
        } else {
            self
        }
    }
}

impl<'a, E> FromExternalError<&'a str, E> for Expected<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        Self::from_error_kind(input, kind)
    }
}

type PResult<'a, O> = IResult<&'a str, O, Expected<'a>>;

/// Relabel a recoverable failure of `parser`
fn expect<'a, O, P>(what: &'static str, mut parser: P) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    P: Parser<&'a str, Output = O, Error = Expected<'a>>,
{
    move |input: &'a str| match parser.parse(input) {
        Err(nom::Err::Error(_)) => Err(nom::Err::Error(Expected { input, what })),
        other => other,
    }
}

fn ws<'a, O, P>(parser: P) -> impl Parser<&'a str, Output = O, Error = Expected<'a>>
where
    P: Parser<&'a str, Output = O, Error = Expected<'a>>,
{
    preceded(multispace0, parser)
}

/// A whole word; `attackers` is not `attack`
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    move |input: &'a str| {
        terminated(
            tag(word),
            not(satisfy(|c: char| c.is_alphanumeric() || c == '_')),
        )
        .parse(input)
    }
}

fn verb(input: &str) -> PResult<'_, Verb> {
    alt((
        value(Verb::Attack, keyword("attack")),
        value(Verb::Oppose, keyword("oppose")),
        value(Verb::Support, keyword("support")),
    ))
    .parse(input)
}

fn battle_ref(input: &str) -> PResult<'_, Option<BattleId>> {
    opt(preceded(
        char('#'),
        cut(expect(
            "a battle number after `#`",
            map_res(digit1, |d: &str| d.parse::<u64>().map(BattleId)),
        )),
    ))
    .parse(input)
}

fn column(input: &str) -> PResult<'_, (char, usize)> {
    map_opt(satisfy(|c: char| c.is_ascii_alphabetic()), |c: char| {
        letter_to_col(c).map(|col| (c, col))
    })
    .parse(input)
}

/// Rows too large for `u64` saturate; the board rejects them later
fn row(input: &str) -> PResult<'_, (&str, u64)> {
    map(digit1, |d: &str| (d, d.parse::<u64>().unwrap_or(u64::MAX))).parse(input)
}

fn troop_text(input: &str) -> PResult<'_, String> {
    map(verify(rest, |s: &str| !s.trim().is_empty()), |s: &str| {
        s.trim().to_string()
    })
    .parse(input)
}

fn skirmish(input: &str) -> PResult<'_, Command> {
    let (input, verb) = verb(input)?;
    let (input, (battle, _, (raw_col, col), _, (raw_row, row), _, troop_type)) = cut((
        ws(battle_ref),
        ws(expect("`at`", tag("at"))),
        ws(expect("a single column letter", column)),
        ws(opt(char(','))),
        ws(expect("a row number", row)),
        ws(expect("`with`", tag("with"))),
        ws(expect("a troop type", troop_text)),
    ))
    .parse(input)?;

    let row = usize::try_from(row.saturating_sub(1)).unwrap_or(usize::MAX);
    Ok((
        input,
        Command::Skirmish(SkirmishOrder {
            verb,
            battle,
            raw_col,
            raw_row: raw_row.to_string(),
            col,
            row,
            troop_type,
        }),
    ))
}

fn status(input: &str) -> PResult<'_, Command> {
    value(
        Command::Status,
        terminated(keyword("status"), cut(ws(expect("end of command", eof)))),
    )
    .parse(input)
}

fn command(input: &str) -> PResult<'_, Command> {
    expect("attack, oppose, support or status", alt((skirmish, status))).parse(input)
}

/// Parse one player command
pub fn parse(text: &str) -> Result<Command, ParseError> {
    let lowered = text.to_lowercase();
    let line = lowered.lines().next().unwrap_or_default().trim();

    let failure = |rest: &str, message: String| {
        let consumed = &line[..line.len().saturating_sub(rest.len())];
        ParseError {
            line: line.to_string(),
            column: consumed.chars().count() + 1,
            message,
        }
    };

    match command(line) {
        Ok((_, command)) => Ok(command),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(failure(e.input, format!("Expected {}", e.what)))
        }
        Err(nom::Err::Incomplete(_)) => Err(failure("", "Unexpected end of command".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skirmish_order(src: &str) -> SkirmishOrder {
        match parse(src) {
            Ok(Command::Skirmish(order)) => order,
            other => panic!("expected a skirmish from {:?}, got {:?}", src, other),
        }
    }

    #[test]
    fn test_skirmish() {
        let order = skirmish_order("attack at A1 with infantry");
        assert_eq!(order.verb, Verb::Attack);
        assert_eq!(order.raw_col, 'a');
        assert_eq!(order.raw_row, "1");
        assert_eq!(order.troop_type, "infantry");
        assert_eq!(order.battle, None);
    }

    #[test]
    fn test_skirmish_converts_coordinates() {
        let order = skirmish_order("attack at C5 with infantry");
        assert_eq!(order.col, 2);
        assert_eq!(order.row, 4);
    }

    #[test]
    fn test_row_zero_is_first_row() {
        let order = skirmish_order("attack at C0 with infantry");
        assert_eq!(order.col, 2);
        assert_eq!(order.row, 0);
    }

    #[test]
    fn test_oversized_row_saturates() {
        let order = skirmish_order("attack at a99999999999999999999 with infantry");
        assert_eq!(order.raw_row, "99999999999999999999");
        assert_eq!(order.row, usize::try_from(u64::MAX - 1).unwrap_or(usize::MAX));
    }

    #[test]
    fn test_skirmish_with_comma() {
        let order = skirmish_order("attack at A,1 with infantry");
        assert_eq!(order.raw_col, 'a');
        assert_eq!(order.raw_row, "1");
    }

    #[test]
    fn test_skirmish_with_battle() {
        let order = skirmish_order("attack #7 at A1 with infantry");
        assert_eq!(order.battle, Some(BattleId(7)));
        assert_eq!(order.troop_type, "infantry");
    }

    #[test]
    fn test_other_verbs() {
        assert_eq!(skirmish_order("oppose at A1 with infantry").verb, Verb::Oppose);
        assert_eq!(skirmish_order("Support at A1 with infantry").verb, Verb::Support);
    }

    #[test]
    fn test_unknown_type_still_parses() {
        let order = skirmish_order("attack at Q12 with zorple");
        assert_eq!(order.raw_col, 'q');
        assert_eq!(order.raw_row, "12");
        assert_eq!(order.troop_type, "zorple");
    }

    #[test]
    fn test_troop_text_runs_to_end_of_line() {
        let order = skirmish_order("attack at N5 with a rubber chicken\nsecond line");
        assert_eq!(order.troop_type, "a rubber chicken");
    }

    #[test]
    fn test_column_only_one_char() {
        assert!(parse("attack at AZ1 with infantry").is_err());
    }

    #[test]
    fn test_row_must_be_number() {
        let err = parse("attack at A,X with infantry").unwrap_err();
        assert_eq!(err.message, "Expected a row number");
        assert_eq!(err.column, 13);
    }

    #[test]
    fn test_no_unicode_col() {
        assert!(parse("attack at ☃3 with infantry").is_err());
    }

    #[test]
    fn test_missing_troop_type() {
        let err = parse("attack at A1 with").unwrap_err();
        assert_eq!(err.message, "Expected a troop type");
    }

    #[test]
    fn test_bad_battle_number() {
        let err = parse("attack #x at A1 with infantry").unwrap_err();
        assert_eq!(err.message, "Expected a battle number after `#`");
    }

    #[test]
    fn test_status() {
        assert_eq!(parse("status"), Ok(Command::Status));
        assert_eq!(parse("  STATUS  "), Ok(Command::Status));
        assert!(parse("statuses").is_err());
        assert_eq!(parse("status now").unwrap_err().message, "Expected end of command");
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("fortify at A1").unwrap_err();
        assert_eq!(err.column, 1);
        assert_eq!(err.line, "fortify at a1");
        assert_eq!(
            err.to_string(),
            "Parse error for command `fortify at a1`, col 1.  \
             Message: Expected attack, oppose, support or status"
        );
    }

    #[test]
    fn test_keyword_needs_word_boundary() {
        assert!(parse("attacker at A1 with infantry").is_err());
    }
}
