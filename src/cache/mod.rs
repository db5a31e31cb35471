//! Cache module for persisting prayer-times API responses
//!
//! Entries are keyed by rounded coordinates and calendar date, carry a
//! 30-day TTL, and tolerate small location drift on lookup. Storage goes
//! through the pluggable [`KeyValueStore`] trait so the cache can run
//! against the filesystem in the app and an in-memory map in tests.

mod prayer;
mod store;

pub use prayer::{CacheStats, Coordinates, PrayerTimesCache, CACHE_PREFIX};
pub use store::{FileStore, KeyValueStore, MemoryStore};
