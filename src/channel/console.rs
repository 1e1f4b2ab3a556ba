//! Console channel - a line-based debug front end
//!
//! Commands are read one per line; an empty line ends the batch. Lines
//! starting with `#` talk to the console itself:
//!
//! - `#exit` stops the loop at once; end of input stops it after the
//!   last batch has run
//! - `#become <name>` issues later commands as another player

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use crate::battle::record::Battle;
use crate::channel::{Channel, Message};
use crate::command::outcome::Outcome;
use crate::core::types::{ActorId, Position, Side};
use crate::world::World;

pub struct ConsoleChannel<R: BufRead, W: Write> {
    input: R,
    output: W,
    me: Option<ActorId>,
    /// Input ran out after a partial batch; stop on the next poll
    exhausted: bool,
}

impl<R: BufRead, W: Write> ConsoleChannel<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            me: None,
            exhausted: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{}", text).and_then(|_| self.output.flush()) {
            tracing::warn!("Console write failed: {}", e);
        }
    }

    /// Who typed commands are issued as; defaults to the first player
    fn issuer(&self, world: &World) -> Option<ActorId> {
        self.me.or_else(|| world.actors().next().map(|a| a.id))
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                tracing::warn!("Console read failed: {}", e);
                None
            }
        }
    }

    /// Returns false when the console should shut down
    fn handle_directive(&mut self, directive: &str, world: &World) -> bool {
        let directive = directive.to_lowercase();
        if directive == "exit" {
            return false;
        }
        if let Some(name) = directive.strip_prefix("become ") {
            match world.find_actor(name.trim()) {
                Some(id) => {
                    self.me = Some(id);
                    self.say(&format!("Okay, you are now {}", name.trim()));
                }
                None => self.say("I don't know who that is"),
            }
        }
        true
    }
}

impl<R: BufRead, W: Write> Channel for ConsoleChannel<R, W> {
    fn poll_messages(&mut self, world: &World) -> Option<Vec<Message>> {
        if self.exhausted {
            return None;
        }
        self.say("\nIn command loop; enter your commands.\nEnter an empty line when done");

        let mut messages = Vec::new();
        loop {
            let Some(line) = self.read_line() else {
                if messages.is_empty() {
                    return None;
                }
                self.exhausted = true;
                return Some(messages);
            };
            if line.is_empty() {
                return Some(messages);
            }
            if let Some(directive) = line.strip_prefix('#') {
                if !self.handle_directive(directive, world) {
                    return None;
                }
                continue;
            }
            match self.issuer(world) {
                Some(issuer) => messages.push(Message::new(line, issuer)),
                None => self.say("Nobody is registered to issue that"),
            }
        }
    }

    fn report_results(&mut self, outcomes: &[Outcome], world: &World) {
        let mut text = String::from("The following results happen:");
        for outcome in outcomes {
            let speaker = match &outcome.message {
                None => "INTERNAL".to_string(),
                Some(message) => world
                    .actor(message.issuer)
                    .map_or_else(|| message.issuer.to_string(), |a| a.name.clone()),
            };
            let _ = write!(text, "\n{}: {}", speaker, outcome.text);
        }

        let shown = world
            .battles()
            .filter(|b| b.relevant)
            .last()
            .or_else(|| world.battles().last());
        if let Some(battle) = shown {
            let _ = write!(
                text,
                "\n\nThe state of battle {} is:\n{}",
                battle.id,
                render_board(world, battle)
            );
        }
        self.say(&text);
    }
}

fn icon(world: &World, battle: &Battle, position: Position) -> String {
    let Some(troop) = battle.grid.occupant(position).and_then(|id| world.troop(id)) else {
        return ". ".to_string();
    };
    let glyph = if troop.visible {
        troop.kind.name().chars().next().map_or('?', |c| c.to_ascii_uppercase())
    } else {
        '?'
    };
    match world.side_of(troop.id) {
        Some(Side::East) => format!("<{}", glyph),
        _ => format!("{}>", glyph),
    }
}

/// ASCII rendering of a battle grid with letter columns and 1-based rows
///
/// Hidden troops show as `?`; troops that have won a fight show their
/// kind's initial. The arrow points the way the troop is heading.
pub fn render_board(world: &World, battle: &Battle) -> String {
    let grid = &battle.grid;
    let label_width = grid.rows().to_string().len();

    let mut out = " ".repeat(label_width);
    let labels: Vec<String> = (0..grid.cols())
        .map(|c| crate::battle::coords::col_to_letter(c).map_or_else(|| "?".into(), String::from))
        .collect();
    out.push_str(&labels.join(" "));

    for row in 0..grid.rows() {
        let _ = write!(out, "\n{:<width$}", row + 1, width = label_width);
        for col in 0..grid.cols() {
            out.push_str(&icon(world, battle, Position::new(row, col)));
        }
    }
    out
}
