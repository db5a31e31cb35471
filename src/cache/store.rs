//! Pluggable key-value backends for the response cache
//!
//! The cache itself owns no state beyond its key prefix; everything it
//! persists goes through a [`KeyValueStore`]. The file-backed store mirrors
//! the on-disk layout used for other persisted app state (one JSON file per
//! key in an XDG-compliant cache directory); the in-memory store exists for
//! tests and ephemeral use.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// A flat string-keyed store of string values.
///
/// Implementations only need best-effort durability; the cache layer treats
/// every store failure as soft.
pub trait KeyValueStore {
    /// Reads the value for a key, `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a value, overwriting any existing entry for the key.
    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()>;

    /// Deletes the entry for a key. Deleting an absent key is not an error.
    fn remove(&mut self, key: &str) -> std::io::Result<()>;

    /// Lists every key currently present.
    fn keys(&self) -> Vec<String>;
}

/// In-memory store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// File-backed store, one `<key>.json` file per entry
///
/// Files live in an XDG-compliant cache directory (`~/.cache/miqat/` on
/// Linux, or the platform equivalent).
#[derive(Debug, Clone)]
pub struct FileStore {
    store_dir: PathBuf,
}

impl FileStore {
    /// Creates a store in the platform cache directory.
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home
    /// directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "miqat")?;
        Some(Self {
            store_dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Creates a store rooted at a custom directory.
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(store_dir: PathBuf) -> Self {
        Self { store_dir }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{}.json", key))
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.store_dir)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.ensure_dir()?;
        fs::write(self.entry_path(key), value)
    }

    fn remove(&mut self, key: &str) -> std::io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn keys(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.store_dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? != "json" {
                    return None;
                }
                Some(path.file_stem()?.to_string_lossy().into_owned())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();

        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_memory_store_overwrite_and_remove() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));

        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
        // Removing again is a no-op
        store.remove("a").unwrap();
    }

    #[test]
    fn test_file_store_writes_json_file() {
        let (mut store, temp_dir) = create_test_store();
        store.set("some_key", "{\"v\":1}").unwrap();

        let expected = temp_dir.path().join("some_key.json");
        assert!(expected.exists(), "Entry file should exist");
        assert_eq!(store.get("some_key").as_deref(), Some("{\"v\":1}"));
    }

    #[test]
    fn test_file_store_missing_key_reads_none() {
        let (store, _temp_dir) = create_test_store();
        assert_eq!(store.get("nope"), None);
    }

    #[test]
    fn test_file_store_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("cache");
        let mut store = FileStore::with_dir(nested.clone());

        store.set("k", "v").unwrap();

        assert!(nested.exists(), "Nested directory should be created");
    }

    #[test]
    fn test_file_store_keys_lists_json_stems() {
        let (mut store, temp_dir) = create_test_store();
        store.set("first", "1").unwrap();
        store.set("second", "2").unwrap();
        // Non-JSON files in the directory are not cache entries
        fs::write(temp_dir.path().join("stray.txt"), "x").unwrap();

        let mut keys = store.keys();
        keys.sort();
        assert_eq!(keys, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_file_store_keys_on_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().join("never_created"));
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_file_store_remove_absent_key_is_ok() {
        let (mut store, _temp_dir) = create_test_store();
        assert!(store.remove("missing").is_ok());
    }
}
