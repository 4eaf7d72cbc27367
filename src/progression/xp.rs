//! Experience and leveling
//!
//! XP thresholds and the health growth granted on level up.

/// Max health gained per level
pub const HEALTH_PER_LEVEL: i32 = 10;

/// XP needed to advance from `level` to the next one
pub fn xp_for_level(level: u32) -> u32 {
    level.saturating_mul(100)
}
