//! Save/load system
//!
//! Save records and the key-value storage they are written to.

pub mod save_game;
pub mod storage;

pub use save_game::{DungeonSaveData, SaveError, SaveGame, SaveStore, SAVE_VERSION};
pub use storage::{save_directory, FileStore, KeyValueStore, MemoryStore};
