//! Player state and creation

pub mod player;

pub use player::{Player, STARTING_HEALTH};
