//! Player state

use serde::{Deserialize, Serialize};

use crate::items::Item;
use crate::progression::{xp_for_level, HEALTH_PER_LEVEL};
use crate::world::Position;

/// Default health for a fresh character
pub const STARTING_HEALTH: i32 = 100;

/// The player character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub experience: u32,
    pub inventory: Vec<Item>,
}

impl Player {
    /// Create a level 1 player at full health
    pub fn new(pos: Position, max_health: i32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            health: max_health,
            max_health,
            level: 1,
            experience: 0,
            inventory: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn set_position(&mut self, pos: Position) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Apply damage, clamping at zero. Returns true if the player died.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0);
        self.is_dead()
    }

    /// Add XP and return true if leveled up.
    ///
    /// At most one level is gained per call; any surplus carries over.
    /// Leveling raises max health and refills health to the new max.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        let total = self.experience.saturating_add(amount);
        let needed = xp_for_level(self.level);

        if total >= needed {
            self.level += 1;
            self.experience = total - needed;
            self.max_health += HEALTH_PER_LEVEL;
            self.health = self.max_health;
            true
        } else {
            self.experience = total;
            false
        }
    }

    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Position::default(), STARTING_HEALTH)
    }
}
