//! WebAssembly bindings for the Yahtzee engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::GameAction;
#[cfg(feature = "wasm")]
use crate::bot::{Bot, BotDifficulty};
#[cfg(feature = "wasm")]
use crate::game::Game;
#[cfg(feature = "wasm")]
use serde::Serialize;

/// Serialize for JS, falling back to `fallback` if encoding fails
#[cfg(feature = "wasm")]
fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

#[cfg(feature = "wasm")]
fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: Game,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a new game from a JSON array of player names
    #[wasm_bindgen(constructor)]
    pub fn new(player_names_json: &str) -> Result<WasmGame, JsValue> {
        let names: Vec<String> =
            serde_json::from_str(player_names_json).map_err(|e| js_error("Invalid player names", e))?;
        let state = Game::with_names(names).map_err(|e| js_error("Cannot start game", e))?;
        Ok(WasmGame { state })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        to_json(&self.state, "{}")
    }

    /// Get the current player ID
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.state.current_player
    }

    /// Get valid actions for the current player as JSON array
    #[wasm_bindgen(js_name = getValidActions)]
    pub fn get_valid_actions(&self) -> String {
        to_json(&self.state.valid_actions(self.state.current_player), "[]")
    }

    /// Apply an action from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyAction)]
    pub fn apply_action(&mut self, player: u8, action_json: &str) -> Result<String, JsValue> {
        let action: GameAction =
            serde_json::from_str(action_json).map_err(|e| js_error("Invalid action JSON", e))?;
        let events = self
            .state
            .apply_action(player, action)
            .map_err(|e| js_error("Action failed", e))?;
        Ok(to_json(&events, "[]"))
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Get the outcome as JSON (null while the game is running)
    #[wasm_bindgen(js_name = getOutcome)]
    pub fn get_outcome(&self) -> String {
        to_json(&self.state.outcome(), "null")
    }

    /// Get a player's running total
    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self, player: u8) -> u32 {
        self.state
            .get_player(player)
            .map(|p| p.total_score())
            .unwrap_or(0)
    }

    /// Get a specific player's state as JSON
    #[wasm_bindgen(js_name = getPlayer)]
    pub fn get_player(&self, player: u8) -> String {
        match self.state.get_player(player) {
            Some(p) => to_json(p, "{}"),
            None => "null".to_string(),
        }
    }

    /// Get a player's theoretical scorecard as JSON
    #[wasm_bindgen(js_name = getTheoretical)]
    pub fn get_theoretical(&self, player: u8) -> String {
        match self.state.get_player(player) {
            Some(p) => to_json(&p.theoretical().iter().collect::<Vec<_>>(), "[]"),
            None => "[]".to_string(),
        }
    }

    /// Get the printable game status
    #[wasm_bindgen(js_name = getStatus)]
    pub fn get_status(&self) -> String {
        self.state.to_string()
    }

    /// Get a bot's suggested action for a player
    /// difficulty: "Easy" or "Medium"
    #[wasm_bindgen(js_name = getBotAction)]
    pub fn get_bot_action(&self, player: u8, difficulty: &str) -> String {
        let diff = if difficulty.eq_ignore_ascii_case("easy") {
            BotDifficulty::Easy
        } else {
            BotDifficulty::Medium
        };

        let action = Bot::new(player, diff).choose_action(&self.state);
        to_json(&action, "null")
    }
}
