//! Per-player scorecards.
//!
//! This module contains:
//! - `Scorecard`: the committed entries, one per category, plus bonuses
//! - `TheoreticalScorecard`: what every open category would score with the
//!   dice currently on the table

use crate::dice::{Dice, DiceMask};
use crate::game::GameError;
use crate::scoring::{
    contributing_dice, Category, NUM_CATEGORIES, UPPER_BONUS_POINTS, UPPER_BONUS_THRESHOLD,
    YAHTZEE_BONUS_POINTS, YAHTZEE_POINTS,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A committed scorecard row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Points written in the box
    pub points: u32,
    /// The dice that were scored
    pub dice: Dice,
    /// Rolls taken before scoring (1..=3)
    pub rolls_used: u8,
}

/// A player's scorecard.
///
/// Each category is written at most once. A zero is a valid entry and still
/// closes the category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    entries: [Option<ScoreEntry>; NUM_CATEGORIES],
    /// Extra Yahtzees scored after the Yahtzee box was filled with 50
    yahtzee_bonuses: u32,
}

impl Scorecard {
    /// Create an empty scorecard
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for a category, if filled
    pub fn get(&self, category: Category) -> Option<&ScoreEntry> {
        self.entries[category.index()].as_ref()
    }

    /// Points in a category, if filled
    pub fn points(&self, category: Category) -> Option<u32> {
        self.get(category).map(|e| e.points)
    }

    pub fn is_filled(&self, category: Category) -> bool {
        self.entries[category.index()].is_some()
    }

    /// Categories still open, in scorecard order
    pub fn open_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|&c| !self.is_filled(c))
    }

    /// Number of filled categories
    pub fn filled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Every category has been written
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|e| e.is_some())
    }

    /// Write an entry, refusing categories that are already filled
    pub fn record(&mut self, category: Category, entry: ScoreEntry) -> Result<(), GameError> {
        let slot = &mut self.entries[category.index()];
        if slot.is_some() {
            return Err(GameError::CategoryFilled(category));
        }
        *slot = Some(entry);
        Ok(())
    }

    /// Whether scoring `dice` now would earn a Yahtzee bonus
    pub fn earns_yahtzee_bonus(&self, dice: &Dice) -> bool {
        crate::scoring::is_yahtzee(dice) && self.points(Category::Yahtzee) == Some(YAHTZEE_POINTS)
    }

    pub(crate) fn add_yahtzee_bonus(&mut self) {
        self.yahtzee_bonuses += 1;
    }

    /// Number of bonus Yahtzees
    pub fn yahtzee_bonuses(&self) -> u32 {
        self.yahtzee_bonuses
    }

    /// Sum of Ones through Sixes
    pub fn upper_subtotal(&self) -> u32 {
        Category::UPPER
            .iter()
            .filter_map(|&c| self.points(c))
            .sum()
    }

    /// Sum of the lower section
    pub fn lower_subtotal(&self) -> u32 {
        Category::ALL
            .iter()
            .filter(|c| !c.is_upper())
            .filter_map(|&c| self.points(c))
            .sum()
    }

    /// 35 once the upper subtotal reaches 63
    pub fn upper_bonus(&self) -> u32 {
        if self.upper_subtotal() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS_POINTS
        } else {
            0
        }
    }

    pub fn yahtzee_bonus_points(&self) -> u32 {
        self.yahtzee_bonuses * YAHTZEE_BONUS_POINTS
    }

    /// Running total including both bonuses
    pub fn total(&self) -> u32 {
        self.upper_subtotal() + self.upper_bonus() + self.lower_subtotal() + self.yahtzee_bonus_points()
    }

    /// Final total; fails while any category is open
    pub fn final_total(&self) -> Result<u32, GameError> {
        if !self.is_complete() {
            return Err(GameError::ScorecardIncomplete {
                open: NUM_CATEGORIES - self.filled_count(),
            });
        }
        Ok(self.total())
    }
}

impl fmt::Display for Scorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in Category::ALL {
            match self.get(category) {
                Some(entry) => writeln!(
                    f,
                    "  {:<16}{:>4}  {} in {} roll(s)",
                    category.label(),
                    entry.points,
                    entry.dice,
                    entry.rolls_used
                )?,
                None => writeln!(f, "  {:<16}{:>4}", category.label(), "-")?,
            }
            if category == Category::Sixes {
                writeln!(f, "  {:<16}{:>4}", "Upper Bonus", self.upper_bonus())?;
            }
        }
        writeln!(f, "  {:<16}{:>4}", "Yahtzee Bonus", self.yahtzee_bonus_points())?;
        write!(f, "  {:<16}{:>4}", "Total", self.total())
    }
}

/// What an open category would score with the current dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOption {
    pub category: Category,
    pub points: u32,
    /// Positions of the dice that make up the score
    pub used: DiceMask,
    /// Rolls taken so far this turn
    pub rolls_used: u8,
}

/// Potential scores for every open category, recomputed after each roll.
///
/// Filled categories and turns with no dice yet have no options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoreticalScorecard {
    options: [Option<ScoreOption>; NUM_CATEGORIES],
}

impl TheoreticalScorecard {
    /// Evaluate `dice` against every category `scorecard` leaves open
    pub fn compute(dice: &Dice, scorecard: &Scorecard, rolls_used: u8) -> Self {
        let mut theoretical = Self::default();
        for category in scorecard.open_categories() {
            theoretical.options[category.index()] = Some(ScoreOption {
                category,
                points: category.score(dice),
                used: contributing_dice(dice, category),
                rolls_used,
            });
        }
        theoretical
    }

    pub fn get(&self, category: Category) -> Option<&ScoreOption> {
        self.options[category.index()].as_ref()
    }

    /// Options in scorecard order
    pub fn iter(&self) -> impl Iterator<Item = &ScoreOption> {
        self.options.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Highest-scoring option; ties go to the earlier category
    pub fn best(&self) -> Option<&ScoreOption> {
        self.options
            .iter()
            .flatten()
            .rev()
            .max_by_key(|o| o.points)
    }
}

impl fmt::Display for TheoreticalScorecard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for option in self.iter() {
            let used: Vec<String> = option.used.positions().map(|i| i.to_string()).collect();
            writeln!(
                f,
                "  {:<16}{:>4}  dice [{}]",
                option.category.label(),
                option.points,
                used.join(" ")
            )?;
        }
        Ok(())
    }
}
