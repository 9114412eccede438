//! Player state: dice on the table, rolls left, and scorecards.

use crate::dice::{Dice, DiceMask, ROLLS_PER_TURN};
use crate::game::GameError;
use crate::scorecard::{ScoreEntry, Scorecard, TheoreticalScorecard};
use crate::scoring::Category;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Player index within a game
pub type PlayerId = u8;

/// Result of committing a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnScore {
    pub category: Category,
    /// Points written in the category box
    pub points: u32,
    /// Whether this turn also earned a Yahtzee bonus
    pub yahtzee_bonus: bool,
}

/// A single player's state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PlayerRecord")]
pub struct Player {
    /// Player ID (seat order)
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Dice on the table; `None` until the first roll of a turn
    dice: Option<Dice>,
    /// Rolls remaining this turn (0..=3)
    rolls_left: u8,
    scorecard: Scorecard,
    theoretical: TheoreticalScorecard,
}

/// Serialized form of `Player`, checked before it becomes one.
///
/// The theoretical scorecard is not trusted; it is rebuilt from the dice.
#[derive(Deserialize)]
struct PlayerRecord {
    id: PlayerId,
    name: String,
    dice: Option<Dice>,
    rolls_left: u8,
    scorecard: Scorecard,
}

impl TryFrom<PlayerRecord> for Player {
    type Error = GameError;

    fn try_from(record: PlayerRecord) -> Result<Self, Self::Error> {
        let rolls_ok = match record.dice {
            None => record.rolls_left == ROLLS_PER_TURN,
            Some(_) => record.rolls_left < ROLLS_PER_TURN,
        };
        if !rolls_ok {
            return Err(GameError::InvalidState(format!(
                "player {} has {} rolls left with dice {}",
                record.id,
                record.rolls_left,
                if record.dice.is_some() { "on the table" } else { "unrolled" }
            )));
        }

        let theoretical = match record.dice {
            Some(dice) => TheoreticalScorecard::compute(
                &dice,
                &record.scorecard,
                ROLLS_PER_TURN - record.rolls_left,
            ),
            None => TheoreticalScorecard::default(),
        };

        Ok(Self {
            id: record.id,
            name: record.name,
            dice: record.dice,
            rolls_left: record.rolls_left,
            scorecard: record.scorecard,
            theoretical,
        })
    }
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            dice: None,
            rolls_left: ROLLS_PER_TURN,
            scorecard: Scorecard::new(),
            theoretical: TheoreticalScorecard::default(),
        }
    }

    pub fn dice(&self) -> Option<Dice> {
        self.dice
    }

    pub fn rolls_left(&self) -> u8 {
        self.rolls_left
    }

    /// Rolls taken so far this turn
    pub fn rolls_used(&self) -> u8 {
        ROLLS_PER_TURN - self.rolls_left
    }

    pub fn scorecard(&self) -> &Scorecard {
        &self.scorecard
    }

    /// Potential scores for the current dice
    pub fn theoretical(&self) -> &TheoreticalScorecard {
        &self.theoretical
    }

    /// Every category has been scored
    pub fn is_done(&self) -> bool {
        self.scorecard.is_complete()
    }

    /// Roll the dice selected by `mask`.
    ///
    /// The first roll of a turn must select all five dice.
    pub fn roll<R: Rng>(&mut self, mask: DiceMask, rng: &mut R) -> Result<Dice, GameError> {
        self.check_can_roll()?;

        let dice = match self.dice {
            None if !mask.is_all() => return Err(GameError::NotRolled),
            None => Dice::roll(rng),
            Some(mut dice) => {
                dice.reroll(mask, rng);
                dice
            }
        };
        self.accept_roll(dice);
        Ok(dice)
    }

    /// Roll all five dice
    pub fn roll_all<R: Rng>(&mut self, rng: &mut R) -> Result<Dice, GameError> {
        self.roll(DiceMask::ALL, rng)
    }

    /// Record dice rolled outside the engine; consumes a roll like `roll`
    pub fn enter_roll(&mut self, dice: Dice) -> Result<(), GameError> {
        self.check_can_roll()?;
        self.accept_roll(dice);
        Ok(())
    }

    fn check_can_roll(&self) -> Result<(), GameError> {
        if self.rolls_left == 0 {
            return Err(GameError::NoRollsLeft);
        }
        if self.is_done() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    fn accept_roll(&mut self, dice: Dice) {
        self.rolls_left -= 1;
        self.dice = Some(dice);
        self.theoretical = TheoreticalScorecard::compute(&dice, &self.scorecard, self.rolls_used());
        debug!(
            player = %self.name,
            %dice,
            rolls_left = self.rolls_left,
            "dice rolled"
        );
    }

    /// Score the current dice in `category` and end the turn
    pub fn score(&mut self, category: Category) -> Result<TurnScore, GameError> {
        let dice = self.dice.ok_or(GameError::NotRolled)?;
        if self.scorecard.is_filled(category) {
            return Err(GameError::CategoryFilled(category));
        }

        let yahtzee_bonus = self.scorecard.earns_yahtzee_bonus(&dice);
        let points = category.score(&dice);
        self.scorecard.record(
            category,
            ScoreEntry {
                points,
                dice,
                rolls_used: self.rolls_used(),
            },
        )?;
        if yahtzee_bonus {
            self.scorecard.add_yahtzee_bonus();
            info!(player = %self.name, "Yahtzee bonus added");
        }
        info!(player = %self.name, %category, points, "category scored");

        self.end_turn();
        Ok(TurnScore {
            category,
            points,
            yahtzee_bonus,
        })
    }

    /// Reset turn state
    fn end_turn(&mut self) {
        self.dice = None;
        self.rolls_left = ROLLS_PER_TURN;
        self.theoretical = TheoreticalScorecard::default();
    }

    /// Running total including bonuses
    pub fn total_score(&self) -> u32 {
        self.scorecard.total()
    }

    /// Final score; fails while the scorecard has open categories
    pub fn final_score(&self) -> Result<u32, GameError> {
        self.scorecard.final_total()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        match self.dice {
            Some(dice) => writeln!(f, "  Dice: {} ({} roll(s) left)", dice, self.rolls_left)?,
            None => writeln!(f, "  Dice: not rolled")?,
        }
        writeln!(f, "Scorecard:")?;
        writeln!(f, "{}", self.scorecard)?;
        if !self.theoretical.is_empty() {
            writeln!(f, "Theoretical Scorecard:")?;
            write!(f, "{}", self.theoretical)?;
        }
        Ok(())
    }
}
