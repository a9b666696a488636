//! Time-bounded memoization of forecast fetches.

use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::FetchError;
use crate::model::{DateWindow, Spot};
use crate::services::forecast_api::{ForecastSource, MarineRow, WindRow};

type Key = (String, DateWindow);

/// Map whose entries expire `ttl` after insertion.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a fresh value for `key`, evicting it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let expired = match entries.get(key) {
            Some((stored, value)) if stored.elapsed() < self.ttl => return Some(value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    /// Stores `value` under `key` and drops every other expired entry.
    pub fn insert(&self, key: K, value: V) {
        let ttl = self.ttl;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|_, (stored, _)| stored.elapsed() < ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`ForecastSource`] wrapper that reuses successful fetches for a while.
///
/// Entries are keyed by spot name and date window. Failures are never
/// cached, so the next call retries upstream.
pub struct CachedSource<S> {
    inner: S,
    marine: TtlCache<Key, Vec<MarineRow>>,
    wind: TtlCache<Key, Vec<WindRow>>,
}

impl<S> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            marine: TtlCache::new(ttl),
            wind: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl<S: ForecastSource> ForecastSource for CachedSource<S> {
    async fn fetch_marine(
        &self,
        spot: &Spot,
        window: DateWindow,
    ) -> Result<Vec<MarineRow>, FetchError> {
        let key = (spot.name.clone(), window);
        if let Some(rows) = self.marine.get(&key) {
            debug!(spot = %spot.name, "Marine cache hit");
            return Ok(rows);
        }
        let rows = self.inner.fetch_marine(spot, window).await?;
        self.marine.insert(key, rows.clone());
        Ok(rows)
    }

    async fn fetch_wind(&self, spot: &Spot, window: DateWindow) -> Result<Vec<WindRow>, FetchError> {
        let key = (spot.name.clone(), window);
        if let Some(rows) = self.wind.get(&key) {
            debug!(spot = %spot.name, "Wind cache hit");
            return Ok(rows);
        }
        let rows = self.inner.fetch_wind(spot, window).await?;
        self.wind.insert(key, rows.clone());
        Ok(rows)
    }
}
