//! In-memory cache store
//!
//! Holds the encoded mapping in memory instead of on disk. It goes through
//! the same encode/decode path as [`FileCacheStore`](super::FileCacheStore),
//! so it can be seeded with corrupt contents or told to refuse writes.

use std::cell::{Cell, RefCell};

use super::{decode, encode, CacheError, CacheLoad, CacheMap, CacheStore};

#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    contents: RefCell<Option<String>>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose persisted contents are exactly `raw`
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let store = Self::new();
        store.contents.replace(Some(raw.into()));
        store
    }

    /// Creates a store already holding `entries`
    pub fn with_entries(entries: &CacheMap) -> Self {
        let store = Self::new();
        store
            .contents
            .replace(Some(encode(entries).expect("cache entries should encode")));
        store
    }

    /// Makes every subsequent save fail
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// The currently persisted contents, if any
    pub fn raw(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl CacheStore for MemoryCacheStore {
    fn load_state(&self) -> CacheLoad {
        match self.contents.borrow().as_deref() {
            Some(content) => decode(content),
            None => CacheLoad::Missing,
        }
    }

    fn save(&self, entries: &CacheMap) -> Result<(), CacheError> {
        if self.fail_saves.get() {
            return Err(CacheError::Unavailable("memory store is read-only".to_string()));
        }
        let json = encode(entries)?;
        self.contents.replace(Some(json));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
