//! Location/date-keyed cache for prayer-times API responses
//!
//! Prayer times are stable for a given place and calendar date, so every
//! successful fetch is persisted under a key derived from the rounded
//! coordinates and the date. A lookup is a hit only while the entry is
//! younger than the TTL and the query coordinates sit within a small
//! axis-aligned tolerance box of the stored ones; nearby queries therefore
//! share one entry instead of re-fetching.
//!
//! The cache is a pure optimization: parse and storage failures are logged
//! and degrade to a miss or a no-op, never an error for the caller.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::future::Future;

use super::store::KeyValueStore;

/// Prefix for every persisted cache key, keeping them clear of unrelated
/// persisted state.
pub const CACHE_PREFIX: &str = "prayer_times_cache_";

/// Maximum age before an entry is stale.
const CACHE_DURATION_DAYS: i64 = 30;

/// Per-axis coordinate drift still treated as the same place (~1 km).
const LOCATION_TOLERANCE_DEG: f64 = 0.01;

/// Serialized envelope format version; bump when the layout changes.
const ENVELOPE_VERSION: u32 = 1;

/// How many upcoming days a preload warms.
const PRELOAD_DAYS: u64 = 30;

/// Preload pauses after every this many fetches, as rate-limit courtesy.
const PRELOAD_PAUSE_EVERY: u64 = 5;
const PRELOAD_PAUSE: std::time::Duration = std::time::Duration::from_millis(500);

/// Coordinates recorded alongside a cached value at write time
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// On-store envelope wrapping a cached payload
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
    timestamp: DateTime<Utc>,
    location: Coordinates,
}

impl<T> Envelope<T> {
    /// Age and version check shared by reads and the sweep; the two paths
    /// must agree on what "valid" means.
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.version == ENVELOPE_VERSION
            && now - self.timestamp < Duration::days(CACHE_DURATION_DAYS)
    }

    fn matches_location(&self, latitude: f64, longitude: f64) -> bool {
        (self.location.latitude - latitude).abs() <= LOCATION_TOLERANCE_DEG
            && (self.location.longitude - longitude).abs() <= LOCATION_TOLERANCE_DEG
    }
}

/// Read-only aggregate over the cache's persisted footprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries under the cache prefix
    pub total_entries: usize,
    /// Approximate footprint (key + value bytes), formatted as kilobytes
    pub cache_size: String,
}

/// The prayer-times response cache over a pluggable store
#[derive(Debug, Clone)]
pub struct PrayerTimesCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> PrayerTimesCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Derives the persisted key for a location and date.
    fn cache_key(latitude: f64, longitude: f64, date: NaiveDate) -> String {
        format!(
            "{}{:.4}_{:.4}_{}",
            CACHE_PREFIX,
            latitude,
            longitude,
            date.format("%Y-%m-%d")
        )
    }

    /// Today in the local calendar; prayer times follow the civil date, not
    /// UTC.
    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Looks up cached data for a location and date (today when `None`).
    ///
    /// A hit requires the entry to be younger than 30 days and its stored
    /// coordinates within 0.01° of the query on both axes independently.
    /// The direct key is tried first; since the key embeds coordinates
    /// rounded to 4 decimal places, a query that drifted a few meters lands
    /// on a different key, so on a key miss the remaining entries for the
    /// same date are scanned against the tolerance box.
    ///
    /// Expired entries found along the way are deleted before returning.
    /// Unparsable entries read as a miss.
    pub fn get<T: DeserializeOwned>(
        &mut self,
        latitude: f64,
        longitude: f64,
        date: Option<NaiveDate>,
    ) -> Option<T> {
        let date = date.unwrap_or_else(Self::today);
        let direct_key = Self::cache_key(latitude, longitude, date);

        if let Some(data) = self.read_entry(&direct_key, latitude, longitude) {
            return Some(data);
        }

        // Tolerance fallback: any same-date entry written nearby still
        // answers this query.
        let date_suffix = format!("_{}", date.format("%Y-%m-%d"));
        let candidates: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|key| {
                key.starts_with(CACHE_PREFIX) && key.ends_with(&date_suffix) && *key != direct_key
            })
            .collect();

        for key in candidates {
            if let Some(data) = self.read_entry(&key, latitude, longitude) {
                return Some(data);
            }
        }

        None
    }

    /// Reads and validates one entry; deletes it when expired.
    fn read_entry<T: DeserializeOwned>(
        &mut self,
        key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Option<T> {
        let raw = self.store.get(key)?;

        let envelope: Envelope<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::warn!("unreadable cache entry {}: {}", key, e);
                return None;
            }
        };

        if !envelope.is_valid(Utc::now()) {
            // Lazy GC: stale entries are dropped the moment a read finds
            // them.
            if let Err(e) = self.store.remove(key) {
                log::warn!("failed to delete expired cache entry {}: {}", key, e);
            }
            return None;
        }

        if !envelope.matches_location(latitude, longitude) {
            return None;
        }

        Some(envelope.data)
    }

    /// Stores data for a location and date (today when `None`).
    ///
    /// Overwrites any existing entry for the key; storage failures are
    /// logged and swallowed.
    pub fn put<T: Serialize>(
        &mut self,
        latitude: f64,
        longitude: f64,
        data: &T,
        date: Option<NaiveDate>,
    ) {
        let date = date.unwrap_or_else(Self::today);
        let key = Self::cache_key(latitude, longitude, date);
        let envelope = Envelope {
            version: ENVELOPE_VERSION,
            data,
            timestamp: Utc::now(),
            location: Coordinates {
                latitude,
                longitude,
            },
        };

        match serde_json::to_string(&envelope) {
            Ok(json) => {
                if let Err(e) = self.store.set(&key, &json) {
                    log::warn!("failed to write cache entry {}: {}", key, e);
                }
            }
            Err(e) => log::warn!("failed to serialize cache entry {}: {}", key, e),
        }
    }

    /// Warms the cache for the next 30 days at a location.
    ///
    /// Days already cached are skipped. Each missing day is fetched through
    /// the supplied closure and written through; a failed day is logged and
    /// the loop moves on, so a mid-run failure never aborts the remaining
    /// days. A short pause every 5 iterations keeps the upstream API from
    /// being hammered.
    ///
    /// Always completes; never returns an error.
    pub async fn preload<T, E, F, Fut>(&mut self, latitude: f64, longitude: f64, mut fetch: F)
    where
        T: Serialize + DeserializeOwned,
        E: std::fmt::Display,
        F: FnMut(NaiveDate) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let today = Self::today();

        for offset in 0..PRELOAD_DAYS {
            let Some(date) = today.checked_add_days(chrono::Days::new(offset)) else {
                break;
            };

            if self.get::<T>(latitude, longitude, Some(date)).is_none() {
                match fetch(date).await {
                    Ok(data) => self.put(latitude, longitude, &data, Some(date)),
                    Err(e) => log::warn!("preload fetch failed for {}: {}", date, e),
                }
            }

            if (offset + 1) % PRELOAD_PAUSE_EVERY == 0 {
                tokio::time::sleep(PRELOAD_PAUSE).await;
            }
        }
    }

    /// Deletes every expired or unparsable entry under the cache prefix.
    ///
    /// Keys are collected during the scan and deleted in a batch afterward,
    /// so the store is never mutated mid-iteration.
    pub fn clear_expired(&mut self) {
        let now = Utc::now();
        let mut doomed = Vec::new();

        for key in self.store.keys() {
            if !key.starts_with(CACHE_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key) else {
                continue;
            };
            match serde_json::from_str::<Envelope<serde_json::Value>>(&raw) {
                Ok(envelope) if envelope.is_valid(now) => {}
                _ => doomed.push(key),
            }
        }

        for key in doomed {
            if let Err(e) = self.store.remove(&key) {
                log::warn!("failed to delete cache entry {}: {}", key, e);
            }
        }
    }

    /// Counts entries and sums their approximate byte footprint.
    pub fn stats(&self) -> CacheStats {
        let mut total_entries = 0;
        let mut total_bytes = 0;

        for key in self.store.keys() {
            if !key.starts_with(CACHE_PREFIX) {
                continue;
            }
            total_entries += 1;
            total_bytes += key.len();
            if let Some(value) = self.store.get(&key) {
                total_bytes += value.len();
            }
        }

        CacheStats {
            total_entries,
            cache_size: format!("{:.2} KB", total_bytes as f64 / 1024.0),
        }
    }
}
