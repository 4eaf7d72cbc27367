//! Game session state
//!
//! Owns the player and the current dungeon for one session, applies player
//! actions, and drives saving.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::autosave::AutoSave;
use crate::config::GameConfig;
use crate::entities::Player;
use crate::items::Item;
use crate::save::{FileStore, SaveError, SaveGame, SaveStore};
use crate::world::{generate_dungeon, Dungeon, Position};

/// High-level session status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Main menu, no session running
    Menu,
    /// Session is being set up
    Loading,
    /// Actively playing
    Playing,
    /// Game is paused
    Paused,
    /// Player died
    GameOver,
}

/// The main game struct that holds all session data
pub struct Game {
    status: GameStatus,
    config: GameConfig,
    player: Player,
    /// Current dungeon, shared read-only with renderers
    dungeon: Option<Arc<Dungeon>>,
    /// Save record this session writes to
    current_save_id: Option<String>,
    store: SaveStore,
    autosave: AutoSave,
    /// Random number generator (seeded for reproducibility)
    rng: StdRng,
}

impl Game {
    /// Create a new game instance
    pub fn new(config: GameConfig, store: SaveStore) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let autosave = AutoSave::new(config.autosave_interval());
        Self {
            status: GameStatus::Menu,
            player: Player::new(Position::default(), config.starting_health),
            config,
            dungeon: None,
            current_save_id: None,
            store,
            autosave,
            rng,
        }
    }

    /// Create a game that saves to the configured directory
    pub fn with_file_store(config: GameConfig) -> Self {
        let store = SaveStore::new(FileStore::new(config.save_dir()));
        Self::new(config, store)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GameStatus) {
        log::debug!("Status transition: {:?} -> {:?}", self.status, status);
        self.status = status;
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn dungeon(&self) -> Option<&Arc<Dungeon>> {
        self.dungeon.as_ref()
    }

    pub fn current_save_id(&self) -> Option<&str> {
        self.current_save_id.as_deref()
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn autosave(&self) -> &AutoSave {
        &self.autosave
    }

    /// Start a session, either from a save or with a fresh dungeon.
    ///
    /// A save id that does not exist falls through to a new game. On
    /// failure the session returns to the menu.
    pub fn initialize_game(&mut self, save_id: Option<&str>) -> Result<(), SaveError> {
        self.set_status(GameStatus::Loading);

        match self.start_session(save_id) {
            Ok(()) => {
                self.autosave.start();
                self.set_status(GameStatus::Playing);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to initialize game: {}", e);
                self.set_status(GameStatus::Menu);
                Err(e)
            }
        }
    }

    fn start_session(&mut self, save_id: Option<&str>) -> Result<(), SaveError> {
        if let Some(id) = save_id {
            match self.store.load_game(id)? {
                Some(save) => return self.apply_save(save),
                None => log::warn!("Save {} not found, starting a new game", id),
            }
        }

        let dungeon = generate_dungeon(
            self.config.dungeon_width,
            self.config.dungeon_height,
            &mut self.rng,
        );
        let player = Player::new(dungeon.start_position(), self.config.starting_health);

        let id = self.store.save_game(&player, &dungeon)?;

        log::info!(
            "New game {} with {} rooms, starting at {:?}",
            id,
            dungeon.rooms().len(),
            dungeon.start_position()
        );
        self.player = player;
        self.dungeon = Some(Arc::new(dungeon));
        self.current_save_id = Some(id);
        Ok(())
    }

    fn apply_save(&mut self, save: SaveGame) -> Result<(), SaveError> {
        let (player, dungeon) = save.restore()?;
        self.player = player;
        self.dungeon = Some(Arc::new(dungeon));
        self.current_save_id = Some(save.id);
        Ok(())
    }

    /// Try to move the player by a delta. Returns true if the move happened.
    pub fn move_player(&mut self, dx: i32, dy: i32) -> bool {
        let Some(dungeon) = &self.dungeon else {
            return false;
        };

        let target = Position::new(self.player.x + dx, self.player.y + dy);
        if dungeon.is_walkable(target.x, target.y) {
            self.player.set_position(target);
            true
        } else {
            false
        }
    }

    /// Deal damage to player; the session ends when health reaches zero
    pub fn take_damage(&mut self, amount: i32) {
        if self.player.take_damage(amount) {
            log::info!("Player died");
            self.autosave.stop();
            self.set_status(GameStatus::GameOver);
        }
    }

    /// Award experience. Returns true on level up.
    pub fn gain_experience(&mut self, amount: u32) -> bool {
        let leveled = self.player.gain_experience(amount);
        if leveled {
            log::info!("Player reached level {}", self.player.level);
        }
        leveled
    }

    pub fn add_to_inventory(&mut self, item: Item) {
        log::debug!("Picked up {} ({})", item.name, item.kind.name());
        self.player.add_item(item);
    }

    /// Write a new save record for the session and make it current
    pub fn save_game(&mut self) -> Result<String, SaveError> {
        let dungeon = self
            .dungeon
            .as_ref()
            .ok_or_else(|| SaveError::InvalidData("No dungeon".to_string()))?;
        let id = self.store.save_game(&self.player, dungeon)?;
        self.current_save_id = Some(id.clone());
        Ok(id)
    }

    /// Replace the session with a stored save. Returns false if no such save.
    pub fn load_game(&mut self, save_id: &str) -> Result<bool, SaveError> {
        match self.store.load_game(save_id)? {
            Some(save) => {
                self.apply_save(save)?;
                self.set_status(GameStatus::Playing);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Overwrite the session's save record, creating one if needed
    pub fn quick_save(&mut self) -> Result<String, SaveError> {
        let Some(id) = self.current_save_id.clone() else {
            return self.save_game();
        };
        let dungeon = self
            .dungeon
            .as_ref()
            .ok_or_else(|| SaveError::InvalidData("No dungeon".to_string()))?;
        self.store.overwrite_save(&id, &self.player, dungeon)?;
        Ok(id)
    }

    /// Update game state (called every frame)
    pub fn update(&mut self, delta: Duration) {
        if self.autosave.update(delta) {
            if let Err(e) = self.quick_save() {
                log::warn!("Auto-save failed: {}", e);
            }
        }
    }

    /// Leave the session and return to the menu
    pub fn end_session(&mut self) {
        self.autosave.stop();
        self.set_status(GameStatus::Menu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemKind;
    use crate::save::MemoryStore;

    fn seeded_game(seed: u64) -> Game {
        let config = GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        };
        Game::new(config, SaveStore::new(MemoryStore::new()))
    }

    /// A direction out of the start cell that leads onto floor
    fn open_direction(game: &Game) -> (i32, i32) {
        let dungeon = game.dungeon().unwrap();
        let pos = game.player().position();
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .find(|(dx, dy)| dungeon.is_walkable(pos.x + dx, pos.y + dy))
            .unwrap()
    }

    #[test]
    fn test_starts_in_menu() {
        let game = seeded_game(1);
        assert_eq!(game.status(), GameStatus::Menu);
        assert!(game.dungeon().is_none());
        assert!(!game.autosave().is_running());
    }

    #[test]
    fn test_new_game() {
        let mut game = seeded_game(1);
        game.initialize_game(None).unwrap();

        assert_eq!(game.status(), GameStatus::Playing);
        assert!(game.autosave().is_running());
        let dungeon = game.dungeon().unwrap();
        assert_eq!(dungeon.width(), 50);
        assert_eq!(dungeon.height(), 50);
        assert_eq!(game.player().position(), dungeon.start_position());
        assert_eq!(game.player().health, 100);
        assert_eq!(game.player().max_health, 100);

        let id = game.current_save_id().unwrap().to_string();
        assert!(game.store().load_game(&id).unwrap().is_some());
    }

    #[test]
    fn test_missing_save_starts_new_game() {
        let mut game = seeded_game(2);
        game.initialize_game(Some("12345")).unwrap();
        assert_eq!(game.status(), GameStatus::Playing);
        assert_ne!(game.current_save_id(), Some("12345"));
    }

    #[test]
    fn test_move_player_respects_walls() {
        let mut game = seeded_game(3);
        assert!(!game.move_player(1, 0));

        game.initialize_game(None).unwrap();
        let start = game.player().position();

        let (dx, dy) = open_direction(&game);
        assert!(game.move_player(dx, dy));
        assert_eq!(game.player().position(), Position::new(start.x + dx, start.y + dy));

        // Walk left until blocked; the outer wall guarantees it stops
        let mut steps = 0;
        while game.move_player(-1, 0) {
            steps += 1;
            assert!(steps < 50);
        }
        let pos = game.player().position();
        assert!(!game.dungeon().unwrap().is_walkable(pos.x - 1, pos.y));
    }

    #[test]
    fn test_damage_ends_game() {
        let mut game = seeded_game(4);
        game.initialize_game(None).unwrap();

        game.take_damage(40);
        assert_eq!(game.player().health, 60);
        assert_eq!(game.status(), GameStatus::Playing);

        game.take_damage(100);
        assert_eq!(game.player().health, 0);
        assert_eq!(game.status(), GameStatus::GameOver);
        assert!(!game.autosave().is_running());
    }

    #[test]
    fn test_experience_and_inventory() {
        let mut game = seeded_game(5);
        game.initialize_game(None).unwrap();

        assert!(!game.gain_experience(50));
        assert!(game.gain_experience(50));
        assert_eq!(game.player().level, 2);
        assert_eq!(game.player().max_health, 110);

        game.add_to_inventory(Item::new("a1", "Leather Vest", ItemKind::Armor, 12));
        assert_eq!(game.player().inventory.len(), 1);
    }

    #[test]
    fn test_save_and_load_restores_session() {
        let mut game = seeded_game(6);
        game.initialize_game(None).unwrap();
        let (dx, dy) = open_direction(&game);
        game.move_player(dx, dy);
        let saved_pos = game.player().position();
        let saved_dungeon = game.dungeon().unwrap().clone();

        let id = game.save_game().unwrap();
        assert_eq!(game.current_save_id(), Some(id.as_str()));

        game.move_player(-dx, -dy);
        game.end_session();
        assert_eq!(game.status(), GameStatus::Menu);

        assert!(game.load_game(&id).unwrap());
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.player().position(), saved_pos);
        assert_eq!(**game.dungeon().unwrap(), *saved_dungeon);

        assert!(!game.load_game("missing").unwrap());
    }

    #[test]
    fn test_quick_save_overwrites_session_record() {
        let mut game = seeded_game(7);
        game.initialize_game(None).unwrap();
        let id = game.current_save_id().unwrap().to_string();

        game.take_damage(10);
        assert_eq!(game.quick_save().unwrap(), id);

        let saves = game.store().get_all_saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].player_data.health, 90);
    }

    #[test]
    fn test_autosave_fires_on_interval() {
        let mut game = seeded_game(8);
        game.initialize_game(None).unwrap();
        let id = game.current_save_id().unwrap().to_string();
        game.take_damage(30);

        game.update(Duration::from_secs(299));
        let save = game.store().load_game(&id).unwrap().unwrap();
        assert_eq!(save.player_data.health, 100);

        game.update(Duration::from_secs(1));
        let save = game.store().load_game(&id).unwrap().unwrap();
        assert_eq!(save.player_data.health, 70);
    }

    #[test]
    fn test_save_without_dungeon_fails() {
        let mut game = seeded_game(9);
        assert!(matches!(game.save_game(), Err(SaveError::InvalidData(_))));
    }
}
