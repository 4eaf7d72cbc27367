//! Progression systems

pub mod xp;

pub use xp::{xp_for_level, HEALTH_PER_LEVEL};
