//! Arbiter configuration with documented defaults
//!
//! All tunable numbers live here. Values are read from a TOML file with a
//! `[bot]` table (loop behaviour) and a `[battle]` table (rules of play);
//! any key left out falls back to its default.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::Timestamp;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "WARBOARD_CONFIG";

/// Longest time span any rule may name, in seconds (about ten years)
pub const MAX_SPAN: i64 = 10 * 365 * 24 * 60 * 60;

/// Places searched, in order, when no explicit path is given
const CONFIG_CANDIDATES: [&str; 3] = [
    "./config/config.toml",
    "../config/config.toml",
    "/etc/warboard/config.toml",
];

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main loop settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Seconds to sleep between loop iterations (0 = no sleep)
    pub sleep: u64,

    /// Where the durable store lives; `None` keeps everything in memory
    pub store: Option<PathBuf>,

    /// Seed for the end-time jitter RNG
    ///
    /// Leave unset in production; fixing it makes battle end times
    /// reproducible.
    pub seed: Option<u64>,
}

/// Rules of play for every battle created under this config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seconds between creating a battle and its start
    pub start_delay: i64,

    /// Nominal battle length in seconds
    ///
    /// This is what players are shown as the end time.
    pub duration: i64,

    /// Width of the window the real end time is drawn from, in seconds
    ///
    /// The real end lands uniformly within `jitter / 2` either side of the
    /// displayed end, so players cannot time a last-second rush.
    pub end_jitter: i64,

    /// Grid height
    pub rows: usize,

    /// Grid width; every column must be addressable by a single letter
    pub columns: usize,

    /// Seconds a troop waits between automatic steps forward
    pub troop_delay: i64,

    /// Points for a troop crossing the far edge (doubled if never opposed)
    pub goal_score: u32,

    /// Points for winning a fight
    pub kill_score: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            start_delay: 600,
            duration: 7200,
            end_jitter: 0,
            rows: 5,
            columns: 11,
            troop_delay: 300,
            goal_score: 2,
            kill_score: 1,
        }
    }
}

/// Start and end times chosen for a new battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub begins: Timestamp,
    pub ends: Timestamp,
    pub display_ends: Timestamp,
}

impl BattleConfig {
    /// Pick the timeline of a battle created at `now`
    pub fn schedule<R: Rng>(&self, now: Timestamp, rng: &mut R) -> Schedule {
        let begins = now.saturating_add(self.start_delay);
        let display_ends = begins.saturating_add(self.duration);
        let jitter = self.end_jitter.clamp(0, MAX_SPAN);
        let offset = rng.gen_range(0..=jitter) - jitter / 2;
        Schedule {
            begins,
            ends: display_ends.saturating_add(offset),
            display_ends,
        }
    }

    /// Validate rules for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::Invalid("rows must be at least 1".into()));
        }

        // Both sides need territory plus the neutral middle
        if self.columns < 3 {
            return Err(ConfigError::Invalid(format!(
                "columns ({}) must be at least 3",
                self.columns
            )));
        }

        if self.columns > 26 {
            return Err(ConfigError::Invalid(format!(
                "columns ({}) must fit in the letters A-Z",
                self.columns
            )));
        }

        if self.start_delay < 0 || self.duration < 0 || self.troop_delay < 0 {
            return Err(ConfigError::Invalid(
                "start_delay, duration and troop_delay must not be negative".into(),
            ));
        }

        if self.end_jitter < 0 {
            return Err(ConfigError::Invalid(format!(
                "end_jitter ({}) must not be negative",
                self.end_jitter
            )));
        }

        let spans = [
            ("start_delay", self.start_delay),
            ("duration", self.duration),
            ("end_jitter", self.end_jitter),
            ("troop_delay", self.troop_delay),
        ];
        if let Some((name, value)) = spans.iter().find(|(_, v)| *v > MAX_SPAN) {
            return Err(ConfigError::Invalid(format!(
                "{} ({}) must be at most {} seconds",
                name, value, MAX_SPAN
            )));
        }

        Ok(())
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bot: BotConfig,
    pub battle: BattleConfig,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.battle.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        tracing::info!("Loaded config file from {:?}", path);
        Ok(config)
    }

    /// Find and load the config file
    ///
    /// An explicit path must exist. Otherwise `WARBOARD_CONFIG` and the
    /// standard locations are tried; if none exists the defaults are used.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load(path);
        }

        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let candidates = from_env
            .into_iter()
            .chain(CONFIG_CANDIDATES.iter().map(PathBuf::from));

        for path in candidates {
            if path.exists() {
                return Self::load(&path);
            }
        }

        tracing::warn!("No config file found, using defaults");
        Ok(Self::default())
    }
}
