//! Procedural dungeon generation

pub mod rooms;

pub use rooms::{generate_dungeon, ROOM_BUFFER, ROOM_COUNT, ROOM_MARGIN, ROOM_SIZE};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::Dungeon;

/// Generate a dungeon from a fixed seed
pub fn generate_seeded(width: i32, height: i32, seed: u64) -> Dungeon {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_dungeon(width, height, &mut rng)
}

/// Generate a dungeon from OS entropy
pub fn generate(width: i32, height: i32) -> Dungeon {
    let mut rng = StdRng::from_entropy();
    generate_dungeon(width, height, &mut rng)
}
