//! Core game state machine.
//!
//! This module contains the main `Game` struct: seat order, turn
//! advancement, and end-of-game scoring.

use crate::actions::{GameAction, GameEvent};
use crate::dice::{Dice, DiceMask, NUM_DICE, NUM_FACES, ROLLS_PER_TURN};
use crate::player::{Player, PlayerId};
use crate::scoring::{Category, NUM_CATEGORIES, YAHTZEE_BONUS_POINTS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::info;

/// Rounds in a game; every player scores once per round
pub const NUM_ROUNDS: u8 = NUM_CATEGORIES as u8;

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("No rolls remaining this turn")]
    NoRollsLeft,

    #[error("Dice have not been rolled this turn")]
    NotRolled,

    #[error("Expected 5 dice, got {0}")]
    InvalidDiceCount(usize),

    #[error("Die position {0} is out of range (0-4)")]
    InvalidDieIndex(usize),

    #[error("Die value {0} is out of range (1-6)")]
    InvalidDieValue(u8),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("{0} has already been scored")]
    CategoryFilled(Category),

    #[error("Scorecard has {open} unscored categories")]
    ScorecardIncomplete { open: usize },

    #[error("A game needs at least one player")]
    NoPlayers,

    #[error("Too many players: {0}")]
    TooManyPlayers(usize),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game is over")]
    GameOver,

    #[error("Invalid saved state: {0}")]
    InvalidState(String),
}

/// How a finished game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Winner { player: PlayerId, score: u32 },
    /// Two or more players share the top score
    Tie { players: Vec<PlayerId>, score: u32 },
}

impl GameOutcome {
    /// Players holding the top score
    pub fn leaders(&self) -> Vec<PlayerId> {
        match self {
            GameOutcome::Winner { player, .. } => vec![*player],
            GameOutcome::Tie { players, .. } => players.clone(),
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            GameOutcome::Winner { score, .. } | GameOutcome::Tie { score, .. } => *score,
        }
    }
}

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players are taking turns
    InProgress,

    /// Every scorecard is complete
    Finished { outcome: GameOutcome },
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GameRecord")]
pub struct Game {
    /// All players, in seat order
    pub players: Vec<Player>,
    /// Current player index
    pub current_player: PlayerId,
    /// Round number (starts at 1)
    pub round: u8,
    /// Current game phase
    pub phase: GamePhase,
    /// Random number generator seed (for deterministic replays)
    rng_seed: u64,
    /// Dice drawn from `rng` so far
    dice_drawn: u64,
    #[serde(skip)]
    rng: StdRng,
}

/// Serialized form of `Game`, checked before it becomes one.
///
/// The dice generator is rebuilt from the seed and fast-forwarded past
/// `dice_drawn` draws, so a restored game rolls what the original would have.
#[derive(Deserialize)]
struct GameRecord {
    players: Vec<Player>,
    current_player: PlayerId,
    round: u8,
    phase: GamePhase,
    rng_seed: u64,
    #[serde(default)]
    dice_drawn: u64,
}

impl TryFrom<GameRecord> for Game {
    type Error = GameError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        if record.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if record.players.len() > PlayerId::MAX as usize {
            return Err(GameError::TooManyPlayers(record.players.len()));
        }
        if record.current_player as usize >= record.players.len() {
            return Err(GameError::InvalidState(format!(
                "current player {} but only {} players",
                record.current_player,
                record.players.len()
            )));
        }
        if !(1..=NUM_ROUNDS).contains(&record.round) {
            return Err(GameError::InvalidState(format!(
                "round {} outside 1..={}",
                record.round, NUM_ROUNDS
            )));
        }
        if let Some((seat, p)) = record
            .players
            .iter()
            .enumerate()
            .find(|(seat, p)| p.id as usize != *seat)
        {
            return Err(GameError::InvalidState(format!(
                "player {} sits in seat {}",
                p.id, seat
            )));
        }

        let max_draws = record.players.len() as u64
            * NUM_ROUNDS as u64
            * (ROLLS_PER_TURN as usize * NUM_DICE) as u64;
        if record.dice_drawn > max_draws {
            return Err(GameError::InvalidState(format!(
                "{} dice drawn, at most {} fit in a game",
                record.dice_drawn, max_draws
            )));
        }

        let mut rng = StdRng::seed_from_u64(record.rng_seed);
        for _ in 0..record.dice_drawn {
            let _: u8 = rng.gen_range(1..=NUM_FACES);
        }

        Ok(Self {
            players: record.players,
            current_player: record.current_player,
            round: record.round,
            phase: record.phase,
            rng_seed: record.rng_seed,
            dice_drawn: record.dice_drawn,
            rng,
        })
    }
}

impl Game {
    /// Create a game with players named "P1".."Pn"
    pub fn new(num_players: usize) -> Result<Self, GameError> {
        if num_players == 0 {
            return Err(GameError::NoPlayers);
        }
        if num_players > PlayerId::MAX as usize {
            return Err(GameError::TooManyPlayers(num_players));
        }
        Self::with_names((1..=num_players).map(|i| format!("P{}", i)).collect())
    }

    /// Create a game with the given player names, in seat order
    pub fn with_names(player_names: Vec<String>) -> Result<Self, GameError> {
        let seed = rand::thread_rng().gen();
        Self::with_seed(player_names, seed)
    }

    /// Create a game whose dice are reproducible from `seed`
    pub fn with_seed(player_names: Vec<String>, seed: u64) -> Result<Self, GameError> {
        if player_names.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if player_names.len() > PlayerId::MAX as usize {
            return Err(GameError::TooManyPlayers(player_names.len()));
        }

        let players = player_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerId, name))
            .collect();

        Ok(Self {
            players,
            current_player: 0,
            round: 1,
            phase: GamePhase::InProgress,
            rng_seed: seed,
            dice_drawn: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Seed the dice were created from
    pub fn seed(&self) -> u64 {
        self.rng_seed
    }

    /// Get the number of players
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    /// The player whose turn it is
    pub fn current(&self) -> &Player {
        &self.players[self.current_player as usize]
    }

    fn current_mut(&mut self) -> &mut Player {
        &mut self.players[self.current_player as usize]
    }

    /// Rounds still to be started or finished, counting the current one
    pub fn remaining_turns(&self) -> u8 {
        if self.is_finished() {
            0
        } else {
            NUM_ROUNDS + 1 - self.round
        }
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Get the outcome if the game is finished
    pub fn outcome(&self) -> Option<&GameOutcome> {
        match &self.phase {
            GamePhase::Finished { outcome } => Some(outcome),
            GamePhase::InProgress => None,
        }
    }

    /// Get the sole winner, if there is one
    pub fn winner(&self) -> Option<PlayerId> {
        match self.outcome()? {
            GameOutcome::Winner { player, .. } => Some(*player),
            GameOutcome::Tie { .. } => None,
        }
    }

    /// Final scores in seat order; fails while any scorecard is open
    pub fn final_scores(&self) -> Result<Vec<(PlayerId, u32)>, GameError> {
        self.players
            .iter()
            .map(|p| Ok((p.id, p.final_score()?)))
            .collect()
    }

    /// Roll the current player's selected dice
    pub fn roll(&mut self, mask: DiceMask) -> Result<Dice, GameError> {
        self.ensure_in_progress()?;
        let Self {
            players,
            current_player,
            rng,
            dice_drawn,
            ..
        } = self;
        let dice = players[*current_player as usize].roll(mask, rng)?;
        *dice_drawn += mask.count() as u64;
        Ok(dice)
    }

    /// Roll all of the current player's dice
    pub fn roll_all(&mut self) -> Result<Dice, GameError> {
        self.roll(DiceMask::ALL)
    }

    /// Score the current player's dice and pass the turn
    pub fn score(&mut self, category: Category) -> Result<Vec<GameEvent>, GameError> {
        self.apply_action(self.current_player, GameAction::Score(category))
    }

    /// Get all currently valid actions for a player
    pub fn valid_actions(&self, player: PlayerId) -> Vec<GameAction> {
        let mut actions = Vec::new();
        if self.is_finished() || player != self.current_player {
            return actions;
        }

        let p = self.current();
        if p.rolls_left() > 0 {
            match p.dice() {
                None => actions.push(GameAction::Roll(DiceMask::ALL)),
                Some(_) => actions.extend(DiceMask::all_rerolls().map(GameAction::Roll)),
            }
        }
        if p.dice().is_some() {
            actions.extend(p.scorecard().open_categories().map(GameAction::Score));
        }

        actions
    }

    /// Apply an action to the game state
    pub fn apply_action(
        &mut self,
        player: PlayerId,
        action: GameAction,
    ) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_in_progress()?;
        if player != self.current_player {
            return Err(GameError::NotYourTurn);
        }

        let mut events = Vec::new();

        match action {
            GameAction::Roll(mask) => {
                let dice = self.roll(mask)?;
                events.push(GameEvent::DiceRolled {
                    player,
                    dice,
                    rolls_left: self.current().rolls_left(),
                });
            }

            GameAction::EnterRoll(dice) => {
                self.current_mut().enter_roll(dice)?;
                events.push(GameEvent::DiceRolled {
                    player,
                    dice,
                    rolls_left: self.current().rolls_left(),
                });
            }

            GameAction::Score(category) => {
                let result = self.current_mut().score(category)?;
                events.push(GameEvent::CategoryScored {
                    player,
                    category,
                    points: result.points,
                });
                if result.yahtzee_bonus {
                    events.push(GameEvent::YahtzeeBonus {
                        player,
                        points: YAHTZEE_BONUS_POINTS,
                    });
                }
                events.extend(self.advance_turn());
            }
        }

        Ok(events)
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    /// Pass play to the next seat, wrapping into the next round
    fn advance_turn(&mut self) -> Vec<GameEvent> {
        if self.players.iter().all(|p| p.is_done()) {
            let outcome = self.compute_outcome();
            info!(?outcome, "game finished");
            self.phase = GamePhase::Finished {
                outcome: outcome.clone(),
            };
            return vec![GameEvent::GameFinished { outcome }];
        }

        self.current_player = ((self.current_player as usize + 1) % self.players.len()) as PlayerId;
        if self.current_player == 0 {
            self.round += 1;
        }

        vec![GameEvent::TurnStarted {
            player: self.current_player,
            round: self.round,
        }]
    }

    fn compute_outcome(&self) -> GameOutcome {
        let top = self
            .players
            .iter()
            .map(|p| p.total_score())
            .max()
            .unwrap_or(0);
        let leaders: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.total_score() == top)
            .map(|p| p.id)
            .collect();

        match leaders.as_slice() {
            [player] => GameOutcome::Winner {
                player: *player,
                score: top,
            },
            _ => GameOutcome::Tie {
                players: leaders,
                score: top,
            },
        }
    }

    fn player_name(&self, id: PlayerId) -> &str {
        self.get_player(id).map(|p| p.name.as_str()).unwrap_or("?")
    }

    /// Render the outcome with player names
    pub fn describe_outcome(&self) -> Option<String> {
        let text = match self.outcome()? {
            GameOutcome::Winner { player, score } => {
                format!("{} wins with {} points", self.player_name(*player), score)
            }
            GameOutcome::Tie { players, score } => {
                let names: Vec<&str> = players.iter().map(|&id| self.player_name(id)).collect();
                format!("Tie between {} at {} points", names.join(", "), score)
            }
        };
        Some(text)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turns Remaining: {}", self.remaining_turns())?;
        match self.describe_outcome() {
            Some(outcome) => writeln!(f, "Result: {}", outcome)?,
            None => writeln!(f, "Current player: {}", self.current().name)?,
        }
        for player in &self.players {
            writeln!(f)?;
            write!(f, "{}", player)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("Player {}", i + 1)).collect()
    }

    /// Roll once and score the first open category
    fn take_turn(game: &mut Game) -> Vec<GameEvent> {
        game.roll_all().unwrap();
        let category = game.current().scorecard().open_categories().next().unwrap();
        game.score(category).unwrap()
    }

    #[test]
    fn test_new_game() {
        let game = Game::new(3).unwrap();
        assert_eq!(game.player_count(), 3);
        assert_eq!(game.current().name, "P1");
        assert_eq!(game.round, 1);
        assert_eq!(game.remaining_turns(), 13);
        assert!(!game.is_finished());
    }

    #[test]
    fn test_no_players() {
        assert!(matches!(Game::new(0), Err(GameError::NoPlayers)));
    }

    #[test]
    fn test_too_many_players() {
        assert_eq!(
            Game::new(usize::MAX).unwrap_err(),
            GameError::TooManyPlayers(usize::MAX)
        );
        assert_eq!(
            Game::with_seed(names(256), 1).unwrap_err(),
            GameError::TooManyPlayers(256)
        );
        assert_eq!(Game::new(255).unwrap().player_count(), 255);
    }

    #[test]
    fn test_restored_game_continues_dice_sequence() {
        let mut game = Game::with_seed(names(2), 7).unwrap();
        game.roll_all().unwrap();
        game.roll(DiceMask::from_positions(&[0, 3]).unwrap()).unwrap();

        let json = serde_json::to_string(&game).unwrap();
        let mut restored: Game = serde_json::from_str(&json).unwrap();

        let mask = DiceMask::from_positions(&[1, 2, 4]).unwrap();
        assert_eq!(restored.roll(mask).unwrap(), game.roll(mask).unwrap());
    }

    #[test]
    fn test_restore_rejects_bad_seat_and_round() {
        let game = Game::with_seed(names(2), 3).unwrap();
        let json = serde_json::to_value(&game).unwrap();

        let mut bad_seat = json.clone();
        bad_seat["current_player"] = serde_json::json!(7);
        assert!(serde_json::from_value::<Game>(bad_seat).is_err());

        for round in [0, 14] {
            let mut bad_round = json.clone();
            bad_round["round"] = serde_json::json!(round);
            assert!(serde_json::from_value::<Game>(bad_round).is_err());
        }

        let mut no_players = json.clone();
        no_players["players"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Game>(no_players).is_err());

        let mut swapped = json.clone();
        swapped["players"][0]["id"] = serde_json::json!(1);
        assert!(serde_json::from_value::<Game>(swapped).is_err());

        let mut overdrawn = json;
        overdrawn["dice_drawn"] = serde_json::json!(u64::MAX);
        assert!(serde_json::from_value::<Game>(overdrawn).is_err());
    }

    #[test]
    fn test_next_player_normal() {
        let mut game = Game::with_seed(names(3), 1).unwrap();
        let events = take_turn(&mut game);
        assert_eq!(game.current_player, 1);
        assert_eq!(game.remaining_turns(), 13);
        assert!(events.contains(&GameEvent::TurnStarted {
            player: 1,
            round: 1
        }));
    }

    #[test]
    fn test_next_player_wraps() {
        let mut game = Game::with_seed(names(2), 2).unwrap();
        take_turn(&mut game);
        take_turn(&mut game);
        assert_eq!(game.current_player, 0);
        assert_eq!(game.round, 2);
        assert_eq!(game.remaining_turns(), 12);
    }

    #[test]
    fn test_not_your_turn() {
        let mut game = Game::with_seed(names(2), 3).unwrap();
        assert!(matches!(
            game.apply_action(1, GameAction::Roll(DiceMask::ALL)),
            Err(GameError::NotYourTurn)
        ));
        assert!(game.valid_actions(1).is_empty());
    }

    #[test]
    fn test_valid_actions_progression() {
        let mut game = Game::with_seed(names(1), 4).unwrap();
        assert_eq!(game.valid_actions(0), vec![GameAction::Roll(DiceMask::ALL)]);

        game.roll_all().unwrap();
        let actions = game.valid_actions(0);
        let rolls = actions
            .iter()
            .filter(|a| matches!(a, GameAction::Roll(_)))
            .count();
        let scores = actions
            .iter()
            .filter(|a| matches!(a, GameAction::Score(_)))
            .count();
        assert_eq!(rolls, 31);
        assert_eq!(scores, 13);

        game.roll_all().unwrap();
        game.roll_all().unwrap();
        assert!(game
            .valid_actions(0)
            .iter()
            .all(|a| matches!(a, GameAction::Score(_))));
    }

    #[test]
    fn test_single_player_game_ends_with_winner() {
        let mut game = Game::with_seed(names(1), 5).unwrap();
        for _ in 0..12 {
            take_turn(&mut game);
        }
        assert!(!game.is_finished());

        let events = take_turn(&mut game);
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some(0));
        assert_eq!(game.remaining_turns(), 0);
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameFinished { .. })
        ));
        assert!(matches!(game.roll_all(), Err(GameError::GameOver)));
    }

    #[test]
    fn test_tie_on_equal_totals() {
        let mut game = Game::with_seed(names(2), 6).unwrap();
        let hand = Dice::new([1, 2, 3, 4, 6]).unwrap();
        for _ in 0..NUM_ROUNDS {
            for player in 0..2 {
                game.apply_action(player, GameAction::EnterRoll(hand)).unwrap();
                let category = game.current().scorecard().open_categories().next().unwrap();
                game.apply_action(player, GameAction::Score(category)).unwrap();
            }
        }

        // Ones 1 + Twos 2 + Threes 3 + Fours 4 + Sixes 6 + Small Straight 30 + Chance 16
        let outcome = game.outcome().unwrap();
        assert_eq!(
            outcome,
            &GameOutcome::Tie {
                players: vec![0, 1],
                score: 62
            }
        );
        assert_eq!(game.winner(), None);
        assert_eq!(
            game.describe_outcome().unwrap(),
            "Tie between Player 1, Player 2 at 62 points"
        );
    }

    #[test]
    fn test_final_scores_before_end() {
        let game = Game::new(2).unwrap();
        assert!(matches!(
            game.final_scores(),
            Err(GameError::ScorecardIncomplete { .. })
        ));
    }

    #[test]
    fn test_seeded_games_replay() {
        let mut a = Game::with_seed(names(2), 99).unwrap();
        let mut b = Game::with_seed(names(2), 99).unwrap();
        for _ in 0..3 {
            assert_eq!(a.roll_all().unwrap(), b.roll_all().unwrap());
        }
        assert_eq!(a.seed(), 99);
    }

    #[test]
    fn test_status_display() {
        let game = Game::new(2).unwrap();
        let status = game.to_string();
        assert!(status.starts_with("Turns Remaining: 13"));
        assert!(status.contains("Current player: P1"));
        assert!(status.contains("P2"));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GameError::CategoryFilled(Category::FullHouse).to_string(),
            "Full House has already been scored"
        );
        assert_eq!(
            GameError::InvalidDiceCount(4).to_string(),
            "Expected 5 dice, got 4"
        );
    }
}
