//! Cryptcrawl - Entry Point
//!
//! Starts a new session, prints the generated floor, and leaves a save
//! behind. An optional first argument fixes the RNG seed.

use anyhow::{Context, Result};

use cryptcrawl::config::CONFIG_FILE;
use cryptcrawl::{Dungeon, Game, GameConfig, Position};

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    )
    .init();

    log::info!("Starting Cryptcrawl v{}", env!("CARGO_PKG_VERSION"));

    let mut config = GameConfig::load_or_default(CONFIG_FILE);
    if let Some(arg) = std::env::args().nth(1) {
        let seed = arg
            .parse()
            .with_context(|| format!("seed must be an unsigned integer, got {:?}", arg))?;
        config.seed = Some(seed);
    }

    let mut game = Game::with_file_store(config);
    game.initialize_game(None)?;

    let dungeon = game.dungeon().context("session started without a dungeon")?;
    print!("{}", render(dungeon, game.player().position()));
    println!(
        "{} rooms, start {:?}, exit {:?}",
        dungeon.rooms().len(),
        dungeon.start_position(),
        dungeon.end_position()
    );
    if let Some(id) = game.current_save_id() {
        println!("Saved as {}", id);
    }

    game.end_session();
    log::info!("Cryptcrawl shut down cleanly");
    Ok(())
}

/// Draw the floor with the player and exit marked
fn render(dungeon: &Dungeon, player: Position) -> String {
    let mut out = dungeon.to_ascii();
    let stride = dungeon.width() as usize + 1;
    let mut mark = |pos: Position, glyph: &str| {
        if dungeon.in_bounds(pos.x, pos.y) {
            let idx = pos.y as usize * stride + pos.x as usize;
            out.replace_range(idx..idx + 1, glyph);
        }
    };

    if !dungeon.rooms().is_empty() {
        mark(dungeon.end_position(), ">");
    }
    mark(player, "@");
    out
}
