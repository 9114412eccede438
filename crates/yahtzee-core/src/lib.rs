//! Yahtzee - a programmable n-player Yahtzee engine
//!
//! This crate provides the core game logic, including:
//! - Dice rolling with per-die holds
//! - Category scoring for all thirteen scorecard rows
//! - Per-player scorecards with upper and Yahtzee bonuses
//! - Turn rotation, end-of-game detection, and winner/tie reporting
//!
//! # Example
//!
//! ```
//! use yahtzee_core::{DiceMask, Game};
//!
//! let mut game = Game::new(2).unwrap();
//! game.roll_all().unwrap();
//! game.roll(DiceMask::from_positions(&[0, 1]).unwrap()).unwrap();
//! let best = game.current().theoretical().best().unwrap().category;
//! game.score(best).unwrap();
//! assert_eq!(game.current().name, "P2");
//! ```
//!
//! # Modules
//!
//! - [`dice`]: Dice values and reroll masks
//! - [`scoring`]: Categories and the rules that score them
//! - [`scorecard`]: Committed and theoretical scorecards
//! - [`player`]: Player state and turn mechanics
//! - [`game`]: Game state machine
//! - [`actions`]: Serializable actions and events
//! - [`bot`]: Automated players

pub mod actions;
pub mod bot;
pub mod dice;
pub mod game;
pub mod player;
pub mod scorecard;
pub mod scoring;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use bot::{Bot, BotDifficulty};
pub use dice::{Dice, DiceMask, NUM_DICE, ROLLS_PER_TURN};
pub use game::{Game, GameError, GameOutcome, GamePhase, NUM_ROUNDS};
pub use player::{Player, PlayerId, TurnScore};
pub use scorecard::{ScoreEntry, ScoreOption, Scorecard, TheoreticalScorecard};
pub use scoring::{score, scores_for_dice, Category};
