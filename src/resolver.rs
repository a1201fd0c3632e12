//! Decides whether a menu comes from the cache or the network
//!
//! The resolver owns a [`CacheStore`] and a [`MenuFetcher`]. A valid entry
//! for the requested day is served as is; anything else (no entry, an entry
//! from another day, an unreadable cache, or a forced refresh) goes to the
//! fetcher and the result replaces that cafeteria's entry. Persisting is
//! best-effort: a failed save is logged and the fresh menu still returned.

use chrono::NaiveDate;

use crate::cache::{is_valid, CacheEntry, CacheStore};
use crate::cafeteria::Cafeteria;
use crate::fetch::{FetchError, MenuFetcher};

/// Where a resolved menu came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSource {
    /// Served from a cache entry valid for the day
    Cache,
    /// Fetched live
    Network,
}

/// A resolved menu and how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub source: MenuSource,
}

/// Mediates between the cache store and the live fetcher
pub struct MenuResolver<S, F> {
    store: S,
    fetcher: F,
}

impl<S: CacheStore, F: MenuFetcher> MenuResolver<S, F> {
    pub fn new(store: S, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the menu text for `cafeteria` on `today`.
    ///
    /// Only a fetch failure makes this fail; cache problems are absorbed.
    pub async fn resolve(
        &self,
        cafeteria: Cafeteria,
        force_refresh: bool,
        today: NaiveDate,
    ) -> Result<String, FetchError> {
        self.resolve_detailed(cafeteria, force_refresh, today)
            .await
            .map(|resolution| resolution.text)
    }

    /// Like [`resolve`](Self::resolve), also reporting whether the cache was used.
    pub async fn resolve_detailed(
        &self,
        cafeteria: Cafeteria,
        force_refresh: bool,
        today: NaiveDate,
    ) -> Result<Resolution, FetchError> {
        let code = cafeteria.code();
        let mut entries = self.store.load();

        if !force_refresh {
            match entries.get(code) {
                Some(entry) if is_valid(entry, today) => {
                    tracing::debug!(%code, %today, "serving menu from cache");
                    return Ok(Resolution {
                        text: entry.text.clone(),
                        source: MenuSource::Cache,
                    });
                }
                Some(entry) => tracing::info!(%code, cached = %entry.date, %today, "cached menu is stale"),
                None => tracing::info!(%code, "no cached menu"),
            }
        } else {
            tracing::info!(%code, "refresh requested, bypassing cache");
        }

        let text = self.fetcher.fetch(cafeteria, today).await?;

        entries.insert(code.to_string(), CacheEntry::new(code, today, text.clone()));
        if let Err(e) = self.store.save(&entries) {
            tracing::warn!(error = %e, "could not save menu cache");
        }

        Ok(Resolution {
            text,
            source: MenuSource::Network,
        })
    }

    /// Fetches the menu for an arbitrary day without touching the cache.
    pub async fn fetch_uncached(
        &self,
        cafeteria: Cafeteria,
        date: NaiveDate,
    ) -> Result<String, FetchError> {
        tracing::debug!(code = %cafeteria, %date, "fetching outside the cache");
        self.fetcher.fetch(cafeteria, date).await
    }
}
