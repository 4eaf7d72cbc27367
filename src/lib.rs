//! Cryptcrawl - procedural dungeon generation for a dungeon crawler
//!
//! Rooms-and-corridors level generation over a wall/floor tile grid, the
//! player session that moves through it, and JSON save games.

pub mod config;
pub mod game;
pub mod world;
pub mod entities;
pub mod items;
pub mod progression;
pub mod save;

// Re-export commonly used types
pub use config::GameConfig;
pub use game::{Game, GameStatus};
pub use world::{generate_dungeon, Dungeon, Position, Room, Tile};
