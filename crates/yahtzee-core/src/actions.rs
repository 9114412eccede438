//! Game actions that players can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions.

use crate::dice::{Dice, DiceMask};
use crate::game::GameOutcome;
use crate::player::PlayerId;
use crate::scoring::Category;
use serde::{Deserialize, Serialize};

/// All possible actions a player can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Roll the selected dice (the first roll of a turn must select all)
    Roll(DiceMask),
    /// Record dice rolled outside the engine
    EnterRoll(Dice),
    /// Score the current dice and end the turn
    Score(Category),
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled
    DiceRolled {
        player: PlayerId,
        dice: Dice,
        rolls_left: u8,
    },

    /// A category was written on the scorecard
    CategoryScored {
        player: PlayerId,
        category: Category,
        points: u32,
    },

    /// An extra Yahtzee was rolled after the Yahtzee box held 50
    YahtzeeBonus { player: PlayerId, points: u32 },

    /// Play passed to the next player
    TurnStarted { player: PlayerId, round: u8 },

    /// Every scorecard is complete
    GameFinished { outcome: GameOutcome },
}
