//! Cache module for keeping the day's menu on disk
//!
//! Each cafeteria code maps to exactly one [`CacheEntry`] holding the date it
//! was fetched for and the menu text. An entry is only trusted on the day it
//! was fetched for; anything unreadable on disk is treated as an empty cache
//! so the next lookup simply refetches and rewrites the file.

mod memory;
mod store;

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use memory::MemoryCacheStore;
pub use store::FileCacheStore;

/// All cached entries, keyed by cafeteria code
pub type CacheMap = BTreeMap<String, CacheEntry>;

/// A cached menu for a single cafeteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Cafeteria code this entry belongs to (also the key in [`CacheMap`])
    pub code: String,
    /// Calendar date the menu was fetched for
    pub date: NaiveDate,
    /// Menu text as produced by the fetcher
    pub text: String,
}

impl CacheEntry {
    pub fn new(code: impl Into<String>, date: NaiveDate, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            date,
            text: text.into(),
        }
    }
}

/// Returns true iff the entry was fetched for `today`.
///
/// Validity is strict calendar-date equality: a menu fetched at 23:59 is
/// already stale at 00:01 the next day.
pub fn is_valid(entry: &CacheEntry, today: NaiveDate) -> bool {
    entry.date == today
}

/// Outcome of reading the persisted cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLoad {
    /// Nothing has been persisted yet
    Missing,
    /// Persisted data exists but could not be decoded
    Corrupted(String),
    /// Persisted data decoded successfully
    Loaded(CacheMap),
}

impl CacheLoad {
    /// Collapses the outcome into a mapping; missing and corrupted data are empty.
    pub fn into_entries(self) -> CacheMap {
        match self {
            CacheLoad::Loaded(entries) => entries,
            CacheLoad::Missing | CacheLoad::Corrupted(_) => CacheMap::new(),
        }
    }
}

/// Errors that can occur when persisting the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Writing the cache file failed
    #[error("failed to write cache file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The mapping could not be encoded
    #[error("failed to encode cache: {0}")]
    Encode(#[from] serde_json::Error),

    /// The backing storage refused the write
    #[error("cache storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable code → entry storage consulted by the resolver
pub trait CacheStore {
    /// Reads the persisted mapping, reporting whether it was missing or corrupted.
    fn load_state(&self) -> CacheLoad;

    /// Replaces the persisted mapping with `entries`.
    fn save(&self, entries: &CacheMap) -> Result<(), CacheError>;

    /// Reads the persisted mapping; absent or corrupted data yields an empty map.
    fn load(&self) -> CacheMap {
        let state = self.load_state();
        match &state {
            CacheLoad::Missing => tracing::debug!("no menu cache yet"),
            CacheLoad::Corrupted(reason) => {
                tracing::warn!(%reason, "menu cache is unreadable, treating it as empty")
            }
            CacheLoad::Loaded(entries) => tracing::debug!(entries = entries.len(), "loaded menu cache"),
        }
        state.into_entries()
    }
}

/// Encodes a mapping in the on-disk JSON format.
pub(crate) fn encode(entries: &CacheMap) -> Result<String, CacheError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Decodes persisted JSON, rejecting entries whose key disagrees with their code.
pub(crate) fn decode(content: &str) -> CacheLoad {
    let entries: CacheMap = match serde_json::from_str(content) {
        Ok(entries) => entries,
        Err(e) => return CacheLoad::Corrupted(e.to_string()),
    };

    if let Some((key, entry)) = entries.iter().find(|(key, entry)| **key != entry.code) {
        return CacheLoad::Corrupted(format!(
            "entry stored under '{}' belongs to '{}'",
            key, entry.code
        ));
    }

    CacheLoad::Loaded(entries)
}
