//! File-backed cache store
//!
//! Keeps every cafeteria's entry in a single JSON file. Writes go to a
//! sibling temporary file that is then renamed over the cache file, so a
//! reader sees either the old mapping or the new one.

use directories::ProjectDirs;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{decode, encode, CacheError, CacheLoad, CacheMap, CacheStore};

/// File name used inside the cache directory
const CACHE_FILE_NAME: &str = "menu_cache.json";

/// Persists the menu cache as JSON on the local filesystem
///
/// By default the file lives in the XDG-compliant cache directory
/// (`~/.cache/kaistmenu/menu_cache.json` on Linux).
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    path: PathBuf,
}

impl FileCacheStore {
    /// Creates a store in the platform cache directory.
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "kaistmenu")?;
        Some(Self::with_path(project_dirs.cache_dir().join(CACHE_FILE_NAME)))
    }

    /// Creates a store backed by an explicit file path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CacheStore for FileCacheStore {
    fn load_state(&self) -> CacheLoad {
        match fs::read_to_string(&self.path) {
            Ok(content) => decode(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => CacheLoad::Missing,
            // Unreadable bytes (bad UTF-8, permissions) are as good as garbage
            Err(e) => CacheLoad::Corrupted(e.to_string()),
        }
    }

    fn save(&self, entries: &CacheMap) -> Result<(), CacheError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let json = encode(entries)?;
        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&temp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            self.io_error(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheEntry;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_store() -> (FileCacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileCacheStore::with_path(temp_dir.path().join(CACHE_FILE_NAME));
        (store, temp_dir)
    }

    fn sample_entries() -> CacheMap {
        let mut entries = CacheMap::new();
        entries.insert(
            "n6".to_string(),
            CacheEntry::new("n6", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), "Rice, Soup"),
        );
        entries
    }

    #[test]
    fn test_load_state_missing_file() {
        let (store, _temp_dir) = create_test_store();
        assert_eq!(store.load_state(), CacheLoad::Missing);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_creates_file_with_entries() {
        let (store, temp_dir) = create_test_store();

        store.save(&sample_entries()).expect("Save should succeed");

        let content = fs::read_to_string(temp_dir.path().join(CACHE_FILE_NAME)).expect("Should read file");
        assert!(content.contains("\"n6\""));
        assert!(content.contains("2024-03-01"));
        assert!(content.contains("Rice, Soup"));
    }

    #[test]
    fn test_save_then_load_returns_same_mapping() {
        let (store, _temp_dir) = create_test_store();
        let entries = sample_entries();

        store.save(&entries).expect("Save should succeed");

        assert_eq!(store.load(), entries);
    }

    #[test]
    fn test_save_replaces_prior_contents() {
        let (store, _temp_dir) = create_test_store();
        let mut first = sample_entries();
        first.insert(
            "west".to_string(),
            CacheEntry::new("west", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), "Bibimbap"),
        );
        store.save(&first).expect("First save should succeed");

        let second = sample_entries();
        store.save(&second).expect("Second save should succeed");

        assert_eq!(store.load(), second);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let (store, temp_dir) = create_test_store();

        store.save(&sample_entries()).expect("Save should succeed");

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(CACHE_FILE_NAME)]);
    }

    #[test]
    fn test_corrupted_file_loads_as_empty() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.path(), "{\"n6\": [trunc").unwrap();

        assert!(matches!(store.load_state(), CacheLoad::Corrupted(_)));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_non_utf8_file_loads_as_empty() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.path(), [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        assert!(matches!(store.load_state(), CacheLoad::Corrupted(_)));
    }

    #[test]
    fn test_save_over_corrupted_file_heals_it() {
        let (store, _temp_dir) = create_test_store();
        fs::write(store.path(), "garbage").unwrap();

        store.save(&sample_entries()).expect("Save should succeed");

        assert_eq!(store.load_state(), CacheLoad::Loaded(sample_entries()));
    }

    #[test]
    fn test_save_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("nested").join("cache");
        let store = FileCacheStore::with_path(nested.join(CACHE_FILE_NAME));

        store.save(&sample_entries()).expect("Save should succeed");

        assert!(nested.join(CACHE_FILE_NAME).exists());
    }

    #[test]
    fn test_save_into_unwritable_location_reports_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A regular file where the parent directory should be
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = FileCacheStore::with_path(blocker.join(CACHE_FILE_NAME));

        let err = store.save(&sample_entries()).unwrap_err();

        assert!(matches!(err, CacheError::Io { .. }));
        assert!(err.to_string().contains("blocker"));
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileCacheStore::new() {
            let path_str = store.path().to_string_lossy();
            assert!(path_str.contains("kaistmenu"), "Cache path should contain project name");
            assert!(path_str.ends_with(CACHE_FILE_NAME));
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
