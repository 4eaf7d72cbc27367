//! Key-value storage backends
//!
//! Save records live under string keys. The file backend keeps one file per
//! key in the save directory; the memory backend is for tests and tooling.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::SaveError;

/// Minimal string key-value store
pub trait KeyValueStore: Send {
    fn get_item(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove_item(&mut self, key: &str) -> Result<(), SaveError>;
}

/// Get the default save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "cryptcrawl", "Cryptcrawl") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Directory-backed store, one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(save_directory())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        // Ensure directory exists
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), SaveError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), SaveError> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get_item("current_save").unwrap(), None);
        store.set_item("current_save", "123").unwrap();
        assert_eq!(store.get_item("current_save").unwrap().as_deref(), Some("123"));

        store.remove_item("current_save").unwrap();
        assert_eq!(store.get_item("current_save").unwrap(), None);
        // Removing a missing key is not an error
        store.remove_item("current_save").unwrap();
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        store.set_item("a", "1").unwrap();
        store.set_item("a", "2").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("2"));
        store.remove_item("a").unwrap();
        assert!(store.get_item("a").unwrap().is_none());
    }
}
