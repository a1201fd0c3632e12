//! kaistmenu library
//!
//! Fetches the daily KAIST cafeteria menu and keeps one cached copy per
//! cafeteria for the day it was fetched for. Exposed as a library so the
//! resolver and cache can be driven from integration tests.

pub mod cache;
pub mod cafeteria;
pub mod cli;
pub mod config;
pub mod date;
pub mod fetch;
pub mod menu;
pub mod resolver;

pub use cache::{CacheEntry, CacheMap, CacheStore, FileCacheStore, MemoryCacheStore};
pub use cafeteria::Cafeteria;
pub use fetch::{FetchError, KaistFetcher, MenuFetcher};
pub use resolver::{MenuResolver, MenuSource, Resolution};
