//! AI Bot players.
//!
//! This module provides different difficulty levels of AI players:
//! - Easy: Random valid moves
//! - Medium: Greedy play (chase the most common face, take the best score)

use crate::actions::GameAction;
use crate::dice::DiceMask;
use crate::game::Game;
use crate::player::{Player, PlayerId};
use crate::scoring::Category;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Categories a medium bot banks as soon as they are made
const MADE_HANDS: [Category; 3] = [
    Category::Yahtzee,
    Category::LargeStraight,
    Category::FullHouse,
];

/// Bot difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotDifficulty {
    Easy,
    Medium,
}

/// A bot player that can decide on actions
pub struct Bot {
    pub player_id: PlayerId,
    pub difficulty: BotDifficulty,
    rng: StdRng,
}

impl Bot {
    pub fn new(player_id: PlayerId, difficulty: BotDifficulty) -> Self {
        Self {
            player_id,
            difficulty,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(player_id: PlayerId, difficulty: BotDifficulty, seed: u64) -> Self {
        Self {
            player_id,
            difficulty,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Choose an action from the valid actions
    pub fn choose_action(&mut self, game: &Game) -> Option<GameAction> {
        let valid_actions = game.valid_actions(self.player_id);
        if valid_actions.is_empty() {
            return None;
        }

        match self.difficulty {
            BotDifficulty::Easy => self.choose_easy(&valid_actions),
            BotDifficulty::Medium => {
                let player = game.get_player(self.player_id)?;
                Some(choose_medium(player))
            }
        }
    }

    /// Easy: Just pick a random valid action
    fn choose_easy(&mut self, actions: &[GameAction]) -> Option<GameAction> {
        actions.choose(&mut self.rng).copied()
    }
}

/// Medium: roll toward the most common face, bank made hands early
fn choose_medium(player: &Player) -> GameAction {
    let dice = match player.dice() {
        Some(dice) => dice,
        None => return GameAction::Roll(DiceMask::ALL),
    };

    let best = player.theoretical().best();
    let made_hand = MADE_HANDS.iter().any(|&c| {
        player
            .theoretical()
            .get(c)
            .map_or(false, |option| option.points > 0)
    });

    if player.rolls_left() > 0 && !made_hand {
        let (face, _) = dice.most_common();
        let reroll = dice.positions_of(face).inverted();
        if !reroll.is_empty() {
            return GameAction::Roll(reroll);
        }
    }

    let category = if made_hand {
        MADE_HANDS
            .into_iter()
            .find(|&c| {
                player
                    .theoretical()
                    .get(c)
                    .map_or(false, |option| option.points > 0)
            })
            .or(best.map(|o| o.category))
    } else {
        best.map(|o| o.category)
    };

    // A player with dice on the table always has an open category
    GameAction::Score(category.unwrap_or(Category::Chance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::Dice;
    use crate::game::GameError;

    fn play_out(difficulty: BotDifficulty, seed: u64) -> Game {
        let mut game = Game::with_seed(vec!["A".into(), "B".into()], seed).unwrap();
        let mut bots = [
            Bot::with_seed(0, difficulty, seed),
            Bot::with_seed(1, difficulty, seed + 1),
        ];

        let mut steps = 0;
        while !game.is_finished() {
            let player = game.current_player;
            let action = bots[player as usize].choose_action(&game).unwrap();
            game.apply_action(player, action).unwrap();
            steps += 1;
            assert!(steps < 200, "game did not finish");
        }
        game
    }

    #[test]
    fn test_easy_bots_finish_game() {
        let game = play_out(BotDifficulty::Easy, 11);
        assert!(game.outcome().is_some());
        assert!(game.players.iter().all(|p| p.is_done()));
    }

    #[test]
    fn test_medium_bots_finish_game() {
        let game = play_out(BotDifficulty::Medium, 12);
        assert!(game.final_scores().unwrap().iter().all(|&(_, s)| s > 0));
    }

    #[test]
    fn test_bot_waits_for_its_turn() {
        let game = Game::with_seed(vec!["A".into(), "B".into()], 3).unwrap();
        let mut bot = Bot::with_seed(1, BotDifficulty::Medium, 3);
        assert_eq!(bot.choose_action(&game), None);
    }

    #[test]
    fn test_medium_opens_with_full_roll() {
        let player = Player::new(0, "Bot");
        assert_eq!(choose_medium(&player), GameAction::Roll(DiceMask::ALL));
    }

    #[test]
    fn test_medium_banks_large_straight() {
        let mut player = Player::new(0, "Bot");
        player.enter_roll(Dice::new([2, 3, 4, 5, 6]).unwrap()).unwrap();
        assert_eq!(
            choose_medium(&player),
            GameAction::Score(Category::LargeStraight)
        );
    }

    #[test]
    fn test_medium_rerolls_toward_pairs() {
        let mut player = Player::new(0, "Bot");
        player.enter_roll(Dice::new([4, 1, 4, 2, 6]).unwrap()).unwrap();
        assert_eq!(
            choose_medium(&player),
            GameAction::Roll(DiceMask([false, true, false, true, true]))
        );
    }

    #[test]
    fn test_medium_scores_best_on_last_roll() {
        let mut player = Player::new(0, "Bot");
        for _ in 0..3 {
            player.enter_roll(Dice::new([5, 5, 5, 1, 2]).unwrap()).unwrap();
        }
        assert!(matches!(
            player.enter_roll(Dice::new([5, 5, 5, 1, 2]).unwrap()),
            Err(GameError::NoRollsLeft)
        ));
        // Three of a Kind and Chance both score 18; the earlier row wins
        assert_eq!(
            choose_medium(&player),
            GameAction::Score(Category::ThreeOfAKind)
        );
    }
}
