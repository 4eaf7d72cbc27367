//! World module
//!
//! Contains the dungeon grid, tiles, and procedural generation.

pub mod map;
pub mod tile;
pub mod position;
pub mod generation;

pub use map::{Dungeon, Room};
pub use tile::Tile;
pub use position::Position;
pub use generation::generate_dungeon;
