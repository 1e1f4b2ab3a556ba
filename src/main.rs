//! Warboard - Entry Point
//!
//! Runs the arbiter against the console channel. Commands come from stdin,
//! or from a script file with `--script`; `#become <name>` switches which
//! player later lines are issued as.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use warboard::channel::ConsoleChannel;
use warboard::core::clock::SystemClock;
use warboard::core::config::Config;
use warboard::core::error::Result;
use warboard::core::types::Side;
use warboard::simulation::Driver;
use warboard::store::Store;

/// Grid skirmish arbiter
#[derive(Parser, Debug)]
#[command(name = "warboard")]
#[command(about = "Run the skirmish arbiter from the console")]
struct Args {
    /// Config file (defaults to WARBOARD_CONFIG or ./config/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// JSON store file; overrides the config, omit both to stay in memory
    #[arg(long)]
    store: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Player to register if missing, as NAME:SIDE with side 0 (west) or 1 (east)
    #[arg(long = "player", value_parser = parse_player, default_values = ["alice:0", "bob:1"])]
    players: Vec<(String, Side)>,

    /// Random seed for battle end times
    #[arg(long)]
    seed: Option<u64>,

    /// Log at info level
    #[arg(long, short = 'v', conflicts_with = "debug")]
    verbose: bool,

    /// Log at debug level
    #[arg(long, short = 'd')]
    debug: bool,
}

fn parse_player(text: &str) -> std::result::Result<(String, Side), String> {
    let (name, side) = text
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:SIDE, got `{}`", text))?;
    let side = side
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(Side::from_index)
        .ok_or_else(|| format!("side must be 0 or 1, got `{}`", side))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("player name is empty".to_string());
    }
    Ok((name.to_string(), side))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warboard={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = Config::locate(args.config.as_deref())?;
    if args.store.is_some() {
        config.bot.store = args.store.clone();
    }
    if args.seed.is_some() {
        config.bot.seed = args.seed;
    }

    let store = match &config.bot.store {
        Some(path) => Store::open(path)?,
        None => Store::in_memory(),
    };

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let channel = ConsoleChannel::new(input, io::stdout());
    let mut driver = Driver::new(store, channel, SystemClock, config);

    for (name, side) in &args.players {
        if driver.store().world().find_actor(name).is_none() {
            driver.register_player(name, *side)?;
        }
    }

    if driver.store().world().relevant_battles().is_empty() {
        let id = driver.create_battle()?;
        driver.start_battle(id)?;
        tracing::info!("Started battle {}", id);
    }

    driver.loop_forever()?;
    tracing::info!("Arbiter stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player() {
        assert_eq!(parse_player("alice:0"), Ok(("alice".to_string(), Side::West)));
        assert_eq!(parse_player("bob : 1"), Ok(("bob".to_string(), Side::East)));
        assert!(parse_player("carol").is_err());
        assert!(parse_player("carol:2").is_err());
        assert!(parse_player(":1").is_err());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["warboard"]).unwrap();
        assert_eq!(args.players.len(), 2);
        assert!(Args::try_parse_from(["warboard", "-v", "-d"]).is_err());
    }
}
