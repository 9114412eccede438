//! Dice and reroll selection.
//!
//! This module contains:
//! - `Dice`, a validated hand of five values in 1..=6
//! - `DiceMask`, a per-position selection used for rerolls and for
//!   marking which dice contribute to a score

use crate::game::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of dice in a hand
pub const NUM_DICE: usize = 5;

/// Number of faces on each die
pub const NUM_FACES: u8 = 6;

/// Rolls available at the start of every turn
pub const ROLLS_PER_TURN: u8 = 3;

/// Five dice, each showing a value in 1..=6.
///
/// Positions are stable: rerolling never reorders the dice that were kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 5]", into = "[u8; 5]")]
pub struct Dice([u8; NUM_DICE]);

impl Dice {
    /// Create a hand from explicit values
    pub fn new(values: [u8; NUM_DICE]) -> Result<Self, GameError> {
        if let Some(&bad) = values.iter().find(|&&v| !(1..=NUM_FACES).contains(&v)) {
            return Err(GameError::InvalidDieValue(bad));
        }
        Ok(Self(values))
    }

    /// Create a hand from a slice, which must hold exactly five values
    pub fn from_slice(values: &[u8]) -> Result<Self, GameError> {
        let values: [u8; NUM_DICE] = values
            .try_into()
            .map_err(|_| GameError::InvalidDiceCount(values.len()))?;
        Self::new(values)
    }

    /// Roll all five dice
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        let mut values = [0; NUM_DICE];
        for v in values.iter_mut() {
            *v = rng.gen_range(1..=NUM_FACES);
        }
        Self(values)
    }

    /// Reroll the selected positions, keeping the rest in place
    pub fn reroll<R: Rng>(&mut self, mask: DiceMask, rng: &mut R) {
        for i in mask.positions() {
            self.0[i] = rng.gen_range(1..=NUM_FACES);
        }
    }

    /// The raw values, in position order
    pub fn values(&self) -> [u8; NUM_DICE] {
        self.0
    }

    /// Sum of all five dice
    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&v| v as u32).sum()
    }

    /// Occurrences of each face, indexed by face value (index 0 is unused)
    pub fn counts(&self) -> [u8; NUM_FACES as usize + 1] {
        let mut counts = [0; NUM_FACES as usize + 1];
        for &v in &self.0 {
            counts[v as usize] += 1;
        }
        counts
    }

    /// Number of dice showing `face`
    pub fn count_of(&self, face: u8) -> u8 {
        self.0.iter().filter(|&&v| v == face).count() as u8
    }

    /// Whether `face` shows on at least one die
    pub fn contains(&self, face: u8) -> bool {
        self.0.contains(&face)
    }

    /// Values sorted ascending
    pub fn sorted(&self) -> [u8; NUM_DICE] {
        let mut sorted = self.0;
        sorted.sort_unstable();
        sorted
    }

    /// Positions of the dice showing `face`
    pub fn positions_of(&self, face: u8) -> DiceMask {
        let mut mask = DiceMask::NONE;
        for (i, &v) in self.0.iter().enumerate() {
            mask.0[i] = v == face;
        }
        mask
    }

    /// The face with the most dice; ties go to the higher face
    pub fn most_common(&self) -> (u8, u8) {
        let counts = self.counts();
        (1..=NUM_FACES)
            .map(|face| (face, counts[face as usize]))
            .max_by_key(|&(face, count)| (count, face))
            .unwrap_or((1, 0))
    }
}

impl TryFrom<[u8; NUM_DICE]> for Dice {
    type Error = GameError;

    fn try_from(values: [u8; NUM_DICE]) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Dice> for [u8; NUM_DICE] {
    fn from(dice: Dice) -> Self {
        dice.0
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.0;
        write!(f, "[{} {} {} {} {}]", a, b, c, d, e)
    }
}

/// A selection of dice positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceMask(pub [bool; NUM_DICE]);

impl DiceMask {
    /// Every position selected
    pub const ALL: DiceMask = DiceMask([true; NUM_DICE]);

    /// No position selected
    pub const NONE: DiceMask = DiceMask([false; NUM_DICE]);

    /// Build a mask from a slice of flags, which must hold exactly five entries
    pub fn from_slice(flags: &[bool]) -> Result<Self, GameError> {
        let flags: [bool; NUM_DICE] = flags
            .try_into()
            .map_err(|_| GameError::InvalidDiceCount(flags.len()))?;
        Ok(Self(flags))
    }

    /// Build a mask selecting the given positions (0-based)
    pub fn from_positions(positions: &[usize]) -> Result<Self, GameError> {
        let mut mask = Self::NONE;
        for &i in positions {
            if i >= NUM_DICE {
                return Err(GameError::InvalidDieIndex(i));
            }
            mask.0[i] = true;
        }
        Ok(mask)
    }

    /// Mask with the bits of `bits` (bit `i` is position `i`)
    pub fn from_bits(bits: u8) -> Self {
        let mut mask = Self::NONE;
        for i in 0..NUM_DICE {
            mask.0[i] = bits & (1 << i) != 0;
        }
        mask
    }

    /// Every non-empty mask, in bit order
    pub fn all_rerolls() -> impl Iterator<Item = DiceMask> {
        (1u8..(1 << NUM_DICE)).map(Self::from_bits)
    }

    /// Flip every position
    pub fn inverted(self) -> Self {
        let mut mask = self;
        for flag in mask.0.iter_mut() {
            *flag = !*flag;
        }
        mask
    }

    pub fn is_all(&self) -> bool {
        self.0.iter().all(|&f| f)
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|&f| f)
    }

    /// Number of positions selected
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }

    /// Whether position `i` is selected
    pub fn is_set(&self, i: usize) -> bool {
        self.0.get(i).copied().unwrap_or(false)
    }

    /// Selected positions in ascending order
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_dice_rejects_out_of_range_values() {
        assert!(matches!(
            Dice::new([1, 2, 3, 4, 7]),
            Err(GameError::InvalidDieValue(7))
        ));
        assert!(matches!(
            Dice::new([0, 2, 3, 4, 5]),
            Err(GameError::InvalidDieValue(0))
        ));
        assert!(Dice::new([6, 6, 1, 1, 3]).is_ok());
    }

    #[test]
    fn test_dice_from_slice_length() {
        assert!(matches!(
            Dice::from_slice(&[1, 2, 3, 4]),
            Err(GameError::InvalidDiceCount(4))
        ));
        assert!(matches!(
            Dice::from_slice(&[1, 2, 3, 4, 5, 6]),
            Err(GameError::InvalidDiceCount(6))
        ));
        assert_eq!(
            Dice::from_slice(&[3, 1, 4, 1, 5]).unwrap().values(),
            [3, 1, 4, 1, 5]
        );
    }

    #[test]
    fn test_roll_values_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let dice = Dice::roll(&mut rng);
            assert!(dice.values().iter().all(|v| (1..=6).contains(v)));
        }
    }

    #[test]
    fn test_reroll_keeps_unselected_positions() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut dice = Dice::new([1, 2, 3, 4, 5]).unwrap();
        let mask = DiceMask::from_positions(&[1, 3]).unwrap();

        for _ in 0..50 {
            dice.reroll(mask, &mut rng);
            let v = dice.values();
            assert_eq!((v[0], v[2], v[4]), (1, 3, 5));
        }
    }

    #[test]
    fn test_counts_and_most_common() {
        let dice = Dice::new([2, 5, 2, 5, 3]).unwrap();
        assert_eq!(dice.counts(), [0, 0, 2, 1, 0, 2, 0]);
        assert_eq!(dice.count_of(5), 2);
        // Tie between 2s and 5s goes to the higher face
        assert_eq!(dice.most_common(), (5, 2));
        assert_eq!(dice.sum(), 17);
        assert_eq!(dice.sorted(), [2, 2, 3, 5, 5]);
    }

    #[test]
    fn test_positions_of() {
        let dice = Dice::new([4, 1, 4, 4, 2]).unwrap();
        let mask = dice.positions_of(4);
        assert_eq!(mask.positions().collect::<Vec<_>>(), vec![0, 2, 3]);
        assert!(dice.positions_of(6).is_empty());
    }

    #[test]
    fn test_mask_from_slice_and_positions() {
        assert!(matches!(
            DiceMask::from_slice(&[true, true, true, true]),
            Err(GameError::InvalidDiceCount(4))
        ));
        assert!(matches!(
            DiceMask::from_positions(&[0, 5]),
            Err(GameError::InvalidDieIndex(5))
        ));
        let mask = DiceMask::from_slice(&[false, true, true, true, true]).unwrap();
        assert_eq!(mask.count(), 4);
        assert!(!mask.is_set(0));
        assert!(!mask.is_all());
        assert_eq!(mask.inverted(), DiceMask([true, false, false, false, false]));
    }

    #[test]
    fn test_all_rerolls_enumerates_non_empty_masks() {
        let masks: Vec<_> = DiceMask::all_rerolls().collect();
        assert_eq!(masks.len(), 31);
        assert!(masks.iter().all(|m| !m.is_empty()));
        assert_eq!(masks.last(), Some(&DiceMask::ALL));
    }

    #[test]
    fn test_dice_serde_validates() {
        let dice = Dice::new([1, 1, 2, 3, 6]).unwrap();
        let json = serde_json::to_string(&dice).unwrap();
        assert_eq!(json, "[1,1,2,3,6]");

        let back: Dice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dice);

        assert!(serde_json::from_str::<Dice>("[1,1,2,3,9]").is_err());
    }
}
