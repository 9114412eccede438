//! Plays a full Yahtzee game between bots and prints the scorecards.

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yahtzee_core::{Bot, Game, GameEvent};

mod config;

use config::Config;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(?config, "Starting Yahtzee demo game...");

    let names: Vec<String> = (1..=config.players).map(|i| format!("P{}", i)).collect();
    let mut game = match config.seed {
        Some(seed) => Game::with_seed(names, seed)?,
        None => Game::with_names(names)?,
    };
    info!(seed = game.seed(), "dice seeded");

    let mut bots: Vec<Bot> = game
        .players
        .iter()
        .map(|p| Bot::with_seed(p.id, config.difficulty, game.seed().wrapping_add(p.id as u64)))
        .collect();

    while !game.is_finished() {
        let player = game.current_player;
        let action = bots[player as usize]
            .choose_action(&game)
            .context("bot has no action on its own turn")?;

        for event in game.apply_action(player, action)? {
            match event {
                GameEvent::TurnStarted { player: 0, round } => {
                    println!("===== Round {} =====", round);
                    println!("{}", game);
                }
                GameEvent::GameFinished { .. } => println!("----- End of Game -----"),
                other => debug!(?other, "event"),
            }
        }
    }

    println!("{}", game);
    if let Some(result) = game.describe_outcome() {
        println!("{}", result);
    }

    if config.json {
        println!("{}", serde_json::to_string_pretty(&game)?);
    }

    Ok(())
}
