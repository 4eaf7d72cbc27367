//! Game configuration
//!
//! Loaded from a RON file, with hardcoded defaults for anything missing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::STARTING_HEALTH;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "cryptcrawl.ron";

/// Config loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Tunable settings for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of generated dungeons in tiles
    pub dungeon_width: i32,
    /// Height of generated dungeons in tiles
    pub dungeon_height: i32,
    /// Max health of a new character
    pub starting_health: i32,
    /// Seconds between auto-saves
    pub autosave_interval_secs: u64,
    /// Fixed RNG seed; entropy when unset
    pub seed: Option<u64>,
    /// Save directory override
    pub save_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dungeon_width: 50,
            dungeon_height: 50,
            starting_health: STARTING_HEALTH,
            autosave_interval_secs: 5 * 60,
            seed: None,
            save_dir: None,
        }
    }
}

impl GameConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    /// Directory save files are written to
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir
            .clone()
            .unwrap_or_else(crate::save::save_directory)
    }

    /// Parse a config from RON text
    pub fn from_ron(content: &str, path: &Path) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&content, path)?;
        log::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    /// Load a config, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{}. Using defaults.", e);
            Self::default()
        })
    }
}
