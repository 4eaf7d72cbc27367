//! Tile definitions
//!
//! A dungeon cell is either solid wall or walkable floor.

use serde::{Deserialize, Serialize};

/// A single cell of the dungeon grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Wall,
    Floor,
}

impl Tile {
    pub fn is_walkable(&self) -> bool {
        matches!(self, Tile::Floor)
    }

    pub fn glyph(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Floor => '.',
        }
    }

    /// Numeric code used in save records (1 = wall, 0 = floor)
    pub fn code(&self) -> u8 {
        match self {
            Tile::Wall => 1,
            Tile::Floor => 0,
        }
    }

    /// Decode a save-record tile code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Floor),
            1 => Some(Tile::Wall),
            _ => None,
        }
    }
}
