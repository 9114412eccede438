//! Runtime configuration read from the environment.

use thiserror::Error;
use yahtzee_core::BotDifficulty;

const DEFAULT_PLAYERS: usize = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAHTZEE_PLAYERS must be a positive integer, got {0:?}")]
    Players(String),

    #[error("YAHTZEE_SEED must be an unsigned integer, got {0:?}")]
    Seed(String),

    #[error("YAHTZEE_BOT must be \"easy\" or \"medium\", got {0:?}")]
    Bot(String),
}

/// Settings for a demo game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub players: usize,
    /// Fixed seed for reproducible dice; random when unset
    pub seed: Option<u64>,
    pub difficulty: BotDifficulty,
    /// Print the final game state as JSON
    pub json: bool,
}

impl Config {
    /// Read `YAHTZEE_PLAYERS`, `YAHTZEE_SEED`, `YAHTZEE_BOT` and `YAHTZEE_JSON`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let players = match lookup("YAHTZEE_PLAYERS") {
            Some(raw) => {
                let parsed = raw.trim().parse::<usize>();
                match parsed {
                    Ok(n) if n > 0 => n,
                    _ => return Err(ConfigError::Players(raw)),
                }
            }
            None => DEFAULT_PLAYERS,
        };

        let seed = lookup("YAHTZEE_SEED")
            .map(|raw| raw.trim().parse::<u64>().map_err(|_| ConfigError::Seed(raw)))
            .transpose()?;

        let difficulty = match lookup("YAHTZEE_BOT") {
            None => BotDifficulty::Medium,
            Some(level) if level.trim().eq_ignore_ascii_case("easy") => BotDifficulty::Easy,
            Some(level) if level.trim().eq_ignore_ascii_case("medium") => BotDifficulty::Medium,
            Some(other) => return Err(ConfigError::Bot(other)),
        };

        let json = matches!(
            lookup("YAHTZEE_JSON").as_deref(),
            Some("1") | Some("true")
        );

        Ok(Self {
            players,
            seed,
            difficulty,
            json,
        })
    }
}
