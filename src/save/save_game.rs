//! Game save/load system
//!
//! Save records are kept as one JSON object (id -> record) under the
//! `game_saves` key, with the id of the most recent save under
//! `current_save`.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::storage::KeyValueStore;
use crate::entities::Player;
use crate::world::{Dungeon, Position, Room, Tile};

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = 1;

const SAVES_KEY: &str = "game_saves";
const CURRENT_SAVE_KEY: &str = "current_save";

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("Invalid save data: {0}")]
    InvalidData(String),
}

/// Complete save record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGame {
    pub version: u32,
    pub id: String,
    pub player_data: Player,
    pub dungeon_state: DungeonSaveData,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
}

impl SaveGame {
    /// Rebuild the live player and dungeon from this record
    pub fn restore(&self) -> Result<(Player, Dungeon), SaveError> {
        let dungeon = self.dungeon_state.to_dungeon()?;
        Ok((self.player_data.clone(), dungeon))
    }
}

/// Dungeon grid as stored in a save record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonSaveData {
    pub width: i32,
    pub height: i32,
    /// `[y][x]` tile codes, 1 = wall, 0 = floor
    pub tiles: Vec<Vec<u8>>,
    pub rooms: Vec<Room>,
    pub start_position: Position,
    pub end_position: Position,
}

impl DungeonSaveData {
    pub fn from_dungeon(dungeon: &Dungeon) -> Self {
        Self {
            width: dungeon.width(),
            height: dungeon.height(),
            tiles: (0..dungeon.height())
                .map(|y| {
                    (0..dungeon.width())
                        .map(|x| dungeon.tile(x, y).unwrap_or_default().code())
                        .collect()
                })
                .collect(),
            rooms: dungeon.rooms().to_vec(),
            start_position: dungeon.start_position(),
            end_position: dungeon.end_position(),
        }
    }

    pub fn to_dungeon(&self) -> Result<Dungeon, SaveError> {
        if self.tiles.len() != self.height.max(0) as usize {
            return Err(SaveError::InvalidData(format!(
                "expected {} tile rows, found {}",
                self.height,
                self.tiles.len()
            )));
        }

        let mut tiles = Vec::with_capacity(self.tiles.iter().map(Vec::len).sum());
        for (y, row) in self.tiles.iter().enumerate() {
            if row.len() != self.width.max(0) as usize {
                return Err(SaveError::InvalidData(format!(
                    "row {} has {} tiles, expected {}",
                    y,
                    row.len(),
                    self.width
                )));
            }
            for &code in row {
                let tile = Tile::from_code(code).ok_or_else(|| {
                    SaveError::InvalidData(format!("unknown tile code {} in row {}", code, y))
                })?;
                tiles.push(tile);
            }
        }

        Dungeon::from_parts(
            self.width,
            self.height,
            tiles,
            self.rooms.clone(),
            self.start_position,
            self.end_position,
        )
        .ok_or_else(|| SaveError::InvalidData("dungeon dimensions do not match tiles".to_string()))
    }
}

impl From<&Dungeon> for DungeonSaveData {
    fn from(dungeon: &Dungeon) -> Self {
        Self::from_dungeon(dungeon)
    }
}

/// Current time in milliseconds since the Unix epoch
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Save game service over a key-value backend
pub struct SaveStore {
    backend: Box<dyn KeyValueStore>,
    /// Last timestamp handed out, keeps ids unique within a session
    last_stamp: u64,
}

impl SaveStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            last_stamp: 0,
        }
    }

    /// Read every save. Missing or unreadable data reads as no saves.
    fn read_saves(&self) -> BTreeMap<String, SaveGame> {
        let data = match self.backend.get_item(SAVES_KEY) {
            Ok(Some(data)) => data,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                log::error!("Error getting saves: {}", e);
                return BTreeMap::new();
            }
        };

        serde_json::from_str(&data).unwrap_or_else(|e| {
            log::error!("Error parsing saves: {}", e);
            BTreeMap::new()
        })
    }

    fn write_saves(&mut self, saves: &BTreeMap<String, SaveGame>) -> Result<(), SaveError> {
        let json = serde_json::to_string(saves)?;
        self.backend.set_item(SAVES_KEY, &json)
    }

    /// Next strictly increasing timestamp
    fn next_stamp(&mut self) -> u64 {
        let stamp = now_millis().max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }

    /// Id of the most recent save, if any
    pub fn current_save_id(&self) -> Result<Option<String>, SaveError> {
        self.backend.get_item(CURRENT_SAVE_KEY)
    }

    /// Write a new save record and make it current. Returns its id.
    pub fn save_game(&mut self, player: &Player, dungeon: &Dungeon) -> Result<String, SaveError> {
        let mut saves = self.read_saves();

        let mut stamp = self.next_stamp();
        while saves.contains_key(&stamp.to_string()) {
            stamp = self.next_stamp();
        }
        let id = stamp.to_string();

        saves.insert(
            id.clone(),
            SaveGame {
                version: SAVE_VERSION,
                id: id.clone(),
                player_data: player.clone(),
                dungeon_state: DungeonSaveData::from_dungeon(dungeon),
                timestamp: stamp,
            },
        );
        self.write_saves(&saves)?;
        self.backend.set_item(CURRENT_SAVE_KEY, &id)?;

        log::info!("Game saved as {}", id);
        Ok(id)
    }

    /// Load a save by id
    pub fn load_game(&self, save_id: &str) -> Result<Option<SaveGame>, SaveError> {
        let Some(save) = self.read_saves().remove(save_id) else {
            return Ok(None);
        };

        // Version check
        if save.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: save.version,
            });
        }

        log::info!("Game loaded from {}", save_id);
        Ok(Some(save))
    }

    /// Load the most recent save
    pub fn load_current_game(&self) -> Result<Option<SaveGame>, SaveError> {
        match self.current_save_id()? {
            Some(id) => self.load_game(&id),
            None => Ok(None),
        }
    }

    /// All saves, newest first
    pub fn get_all_saves(&self) -> Vec<SaveGame> {
        let mut saves: Vec<SaveGame> = self.read_saves().into_values().collect();
        saves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        saves
    }

    /// Delete a save. Clears the current save marker if it pointed there.
    pub fn delete_save(&mut self, save_id: &str) -> Result<(), SaveError> {
        let mut saves = self.read_saves();
        saves.remove(save_id);
        self.write_saves(&saves)?;

        if self.current_save_id()?.as_deref() == Some(save_id) {
            self.backend.remove_item(CURRENT_SAVE_KEY)?;
        }

        log::info!("Deleted save {}", save_id);
        Ok(())
    }

    /// Remove every save
    pub fn clear_all_saves(&mut self) -> Result<(), SaveError> {
        self.backend.remove_item(SAVES_KEY)?;
        self.backend.remove_item(CURRENT_SAVE_KEY)?;
        log::info!("Cleared all saves");
        Ok(())
    }

    /// Overwrite the current save, or create one if there is none.
    /// Returns the id written.
    pub fn quick_save(&mut self, player: &Player, dungeon: &Dungeon) -> Result<String, SaveError> {
        match self.current_save_id()? {
            Some(id) => {
                self.overwrite_save(&id, player, dungeon)?;
                Ok(id)
            }
            None => self.save_game(player, dungeon),
        }
    }

    /// Replace the record stored under `save_id` with fresh state
    pub fn overwrite_save(
        &mut self,
        save_id: &str,
        player: &Player,
        dungeon: &Dungeon,
    ) -> Result<(), SaveError> {
        let mut saves = self.read_saves();
        let timestamp = self.next_stamp();
        saves.insert(
            save_id.to_string(),
            SaveGame {
                version: SAVE_VERSION,
                id: save_id.to_string(),
                player_data: player.clone(),
                dungeon_state: DungeonSaveData::from_dungeon(dungeon),
                timestamp,
            },
        );
        self.write_saves(&saves)?;

        log::info!("Quick saved to {}", save_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemoryStore;
    use crate::world::generation::generate_seeded;

    fn store() -> SaveStore {
        SaveStore::new(MemoryStore::new())
    }

    #[test]
    fn test_save_and_load() {
        let mut store = store();
        let dungeon = generate_seeded(50, 50, 3);
        let player = Player::new(dungeon.start_position(), 100);

        let id = store.save_game(&player, &dungeon).unwrap();
        assert_eq!(store.current_save_id().unwrap().as_deref(), Some(id.as_str()));

        let save = store.load_game(&id).unwrap().unwrap();
        let (loaded_player, loaded_dungeon) = save.restore().unwrap();
        assert_eq!(loaded_player, player);
        assert_eq!(loaded_dungeon, dungeon);
    }

    #[test]
    fn test_load_missing() {
        let store = store();
        assert!(store.load_game("nope").unwrap().is_none());
        assert!(store.load_current_game().unwrap().is_none());
    }

    #[test]
    fn test_saves_listed_newest_first() {
        let mut store = store();
        let dungeon = generate_seeded(30, 30, 1);
        let player = Player::default();

        let first = store.save_game(&player, &dungeon).unwrap();
        let second = store.save_game(&player, &dungeon).unwrap();
        let third = store.save_game(&player, &dungeon).unwrap();

        let ids: Vec<String> = store.get_all_saves().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third, second, first]);
    }

    #[test]
    fn test_delete_current_clears_marker() {
        let mut store = store();
        let dungeon = generate_seeded(30, 30, 1);
        let player = Player::default();

        let old = store.save_game(&player, &dungeon).unwrap();
        let current = store.save_game(&player, &dungeon).unwrap();

        store.delete_save(&old).unwrap();
        assert_eq!(store.current_save_id().unwrap().as_deref(), Some(current.as_str()));

        store.delete_save(&current).unwrap();
        assert!(store.current_save_id().unwrap().is_none());
        assert!(store.get_all_saves().is_empty());
    }

    #[test]
    fn test_quick_save_overwrites_current() {
        let mut store = store();
        let dungeon = generate_seeded(30, 30, 8);
        let mut player = Player::default();

        let id = store.quick_save(&player, &dungeon).unwrap();
        player.take_damage(25);
        let again = store.quick_save(&player, &dungeon).unwrap();

        assert_eq!(id, again);
        assert_eq!(store.get_all_saves().len(), 1);
        let save = store.load_game(&id).unwrap().unwrap();
        assert_eq!(save.player_data.health, 75);
    }

    #[test]
    fn test_clear_all_saves() {
        let mut store = store();
        let dungeon = generate_seeded(30, 30, 2);
        store.save_game(&Player::default(), &dungeon).unwrap();
        store.clear_all_saves().unwrap();
        assert!(store.get_all_saves().is_empty());
        assert!(store.current_save_id().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_saves_read_as_empty() {
        let mut backend = MemoryStore::new();
        backend.set_item(SAVES_KEY, "{not json").unwrap();
        let store = SaveStore::new(backend);
        assert!(store.get_all_saves().is_empty());
    }

    #[test]
    fn test_version_mismatch() {
        let mut store = store();
        let dungeon = generate_seeded(30, 30, 2);
        let id = store.save_game(&Player::default(), &dungeon).unwrap();

        let mut saves = store.read_saves();
        saves.get_mut(&id).unwrap().version = SAVE_VERSION + 1;
        store.write_saves(&saves).unwrap();

        assert!(matches!(
            store.load_game(&id),
            Err(SaveError::VersionMismatch { found, .. }) if found == SAVE_VERSION + 1
        ));
    }

    #[test]
    fn test_tile_rows_in_record() {
        let dungeon = generate_seeded(20, 12, 4);
        let data = DungeonSaveData::from(&dungeon);
        assert_eq!(data.tiles.len(), 12);
        assert!(data.tiles.iter().all(|row| row.len() == 20));
        assert!(data.tiles[0].iter().all(|&code| code == 1));
    }

    #[test]
    fn test_bad_tile_code_rejected() {
        let dungeon = generate_seeded(20, 12, 4);
        let mut data = DungeonSaveData::from(&dungeon);
        data.tiles[3][3] = 9;
        assert!(matches!(data.to_dungeon(), Err(SaveError::InvalidData(_))));
    }
}
