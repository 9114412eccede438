//! Scorecard categories and the rules that score them.
//!
//! All functions here are pure: they look only at the five dice and never at
//! a player's scorecard. Bonuses that depend on scorecard history (upper
//! section bonus, extra Yahtzees) are applied by [`crate::scorecard`].

use crate::dice::{Dice, DiceMask, NUM_FACES};
use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points for a full house
pub const FULL_HOUSE_POINTS: u32 = 25;

/// Points for a small straight (four in a row)
pub const SMALL_STRAIGHT_POINTS: u32 = 30;

/// Points for a large straight (five in a row)
pub const LARGE_STRAIGHT_POINTS: u32 = 40;

/// Points for five of a kind
pub const YAHTZEE_POINTS: u32 = 50;

/// Points for each Yahtzee after the first, once the Yahtzee box holds 50
pub const YAHTZEE_BONUS_POINTS: u32 = 100;

/// Upper section subtotal needed for the bonus
pub const UPPER_BONUS_THRESHOLD: u32 = 63;

/// Points awarded for reaching the upper threshold
pub const UPPER_BONUS_POINTS: u32 = 35;

/// Number of scorecard categories
pub const NUM_CATEGORIES: usize = 13;

/// A row on the scorecard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    /// All categories in scorecard order
    pub const ALL: [Category; NUM_CATEGORIES] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeOfAKind,
        Category::FourOfAKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yahtzee,
        Category::Chance,
    ];

    /// Upper section categories
    pub const UPPER: [Category; 6] = [
        Category::Ones,
        Category::Twos,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
    ];

    /// Position on the scorecard (0..13)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Category at a scorecard position
    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    /// Stable machine name, also accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            Category::Ones => "ones",
            Category::Twos => "twos",
            Category::Threes => "threes",
            Category::Fours => "fours",
            Category::Fives => "fives",
            Category::Sixes => "sixes",
            Category::ThreeOfAKind => "three_of_a_kind",
            Category::FourOfAKind => "four_of_a_kind",
            Category::FullHouse => "full_house",
            Category::SmallStraight => "small_straight",
            Category::LargeStraight => "large_straight",
            Category::Yahtzee => "yahtzee",
            Category::Chance => "chance",
        }
    }

    /// Human-readable label for scorecard printing
    pub fn label(self) -> &'static str {
        match self {
            Category::Ones => "Ones",
            Category::Twos => "Twos",
            Category::Threes => "Threes",
            Category::Fours => "Fours",
            Category::Fives => "Fives",
            Category::Sixes => "Sixes",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::FourOfAKind => "Four of a Kind",
            Category::FullHouse => "Full House",
            Category::SmallStraight => "Small Straight",
            Category::LargeStraight => "Large Straight",
            Category::Yahtzee => "Yahtzee",
            Category::Chance => "Chance",
        }
    }

    /// Whether this category counts toward the upper bonus
    pub fn is_upper(self) -> bool {
        self.face().is_some()
    }

    /// The die face an upper category counts
    pub fn face(self) -> Option<u8> {
        match self {
            Category::Ones => Some(1),
            Category::Twos => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }

    /// Score these dice in this category
    pub fn score(self, dice: &Dice) -> u32 {
        score(dice, self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = GameError;

    /// Accepts machine names and labels, ignoring case, spaces and dashes
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        Category::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| GameError::UnknownCategory(s.to_string()))
    }
}

/// Score a hand in a category.
///
/// Bonuses are not included; see [`YAHTZEE_BONUS_POINTS`] and
/// [`UPPER_BONUS_POINTS`].
pub fn score(dice: &Dice, category: Category) -> u32 {
    let counts = dice.counts();
    let max_count = counts.iter().copied().max().unwrap_or(0);

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => {
            let face = category.face().unwrap_or(0);
            dice.count_of(face) as u32 * face as u32
        }
        Category::ThreeOfAKind if max_count >= 3 => dice.sum(),
        Category::FourOfAKind if max_count >= 4 => dice.sum(),
        Category::FullHouse if is_full_house(dice) => FULL_HOUSE_POINTS,
        Category::SmallStraight if straight_start(dice, 4).is_some() => SMALL_STRAIGHT_POINTS,
        Category::LargeStraight if straight_start(dice, 5).is_some() => LARGE_STRAIGHT_POINTS,
        Category::Yahtzee if max_count == 5 => YAHTZEE_POINTS,
        Category::Chance => dice.sum(),
        _ => 0,
    }
}

/// Raw scores for every category, in scorecard order
pub fn scores_for_dice(dice: &Dice) -> [u32; NUM_CATEGORIES] {
    let mut scores = [0; NUM_CATEGORIES];
    for category in Category::ALL {
        scores[category.index()] = score(dice, category);
    }
    scores
}

/// Five of a kind
pub fn is_yahtzee(dice: &Dice) -> bool {
    dice.most_common().1 == 5
}

/// Exactly three of one face and two of another
pub fn is_full_house(dice: &Dice) -> bool {
    let counts = dice.counts();
    counts.contains(&3) && counts.contains(&2)
}

/// Lowest face starting a run of `len` consecutive faces, if any
fn straight_start(dice: &Dice, len: u8) -> Option<u8> {
    (1..=NUM_FACES + 1 - len).find(|&start| (start..start + len).all(|face| dice.contains(face)))
}

/// The dice positions that produce a category's score.
///
/// Empty when the category scores nothing. For straights one die per face in
/// the run is marked, so duplicates are left free to reroll.
pub fn contributing_dice(dice: &Dice, category: Category) -> DiceMask {
    if score(dice, category) == 0 {
        return DiceMask::NONE;
    }

    match category {
        Category::Ones
        | Category::Twos
        | Category::Threes
        | Category::Fours
        | Category::Fives
        | Category::Sixes => dice.positions_of(category.face().unwrap_or(0)),
        Category::ThreeOfAKind | Category::FourOfAKind => dice.positions_of(dice.most_common().0),
        Category::SmallStraight => match straight_start(dice, 4) {
            Some(start) => first_of_each(dice, start..start + 4),
            None => DiceMask::NONE,
        },
        Category::FullHouse | Category::LargeStraight | Category::Yahtzee | Category::Chance => {
            DiceMask::ALL
        }
    }
}

/// Mark the first position showing each face in `faces`
fn first_of_each(dice: &Dice, faces: std::ops::Range<u8>) -> DiceMask {
    let values = dice.values();
    let mut mask = DiceMask::NONE;
    for face in faces {
        if let Some(i) = values.iter().position(|&v| v == face) {
            mask.0[i] = true;
        }
    }
    mask
}
