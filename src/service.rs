//! High-level prayer-times access: cache first, retried fetch on miss
//!
//! Ties the pieces together the way a feature caller would: ask the cache,
//! fall back to the AlAdhan client wrapped in the retry loop, and write the
//! fresh result back through the cache on success.

use chrono::{Local, NaiveDate};

use crate::cache::{KeyValueStore, PrayerTimesCache};
use crate::client::{AladhanClient, PrayerApiError, PrayerTimes};
use crate::error::ApiError;
use crate::retry::{with_retry_notify, RetryPolicy};

/// Cache-backed, retry-wrapped prayer-times provider
#[derive(Debug, Clone)]
pub struct PrayerTimesService<S: KeyValueStore> {
    client: AladhanClient,
    cache: PrayerTimesCache<S>,
    policy: RetryPolicy,
}

impl<S: KeyValueStore> PrayerTimesService<S> {
    /// Creates a service over the given store with default client and policy.
    pub fn new(store: S) -> Self {
        Self {
            client: AladhanClient::new(),
            cache: PrayerTimesCache::new(store),
            policy: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the API client.
    pub fn with_api_client(mut self, client: AladhanClient) -> Self {
        self.client = client;
        self
    }

    /// Returns prayer times for a location and date (today when `None`).
    ///
    /// See [`prayer_times_notify`](Self::prayer_times_notify); this variant
    /// drops the per-retry notification.
    pub async fn prayer_times(
        &mut self,
        latitude: f64,
        longitude: f64,
        date: Option<NaiveDate>,
    ) -> Result<PrayerTimes, PrayerApiError> {
        self.prayer_times_notify(latitude, longitude, date, |_, _| {}).await
    }

    /// Returns prayer times, reporting each retry attempt.
    ///
    /// The cache is consulted first; on a miss the fetch runs under the
    /// retry policy, with `notify` invoked before each retry (the hook for
    /// a "retrying..." indicator). A successful fetch is written back to
    /// the cache before returning. On exhausted retries the client's
    /// original error is propagated, so the caller can still classify it
    /// and pick a fallback message.
    pub async fn prayer_times_notify<N>(
        &mut self,
        latitude: f64,
        longitude: f64,
        date: Option<NaiveDate>,
        notify: N,
    ) -> Result<PrayerTimes, PrayerApiError>
    where
        N: FnMut(u32, &ApiError),
    {
        let date = date.unwrap_or_else(|| Local::now().date_naive());

        if let Some(cached) = self.cache.get(latitude, longitude, Some(date)) {
            return Ok(cached);
        }

        let client = &self.client;
        let times = with_retry_notify(
            &self.policy,
            || client.fetch_timings(latitude, longitude, date),
            notify,
        )
        .await?;

        self.cache.put(latitude, longitude, &times, Some(date));
        Ok(times)
    }

    /// Warms the cache with the next 30 days for a location.
    ///
    /// Best-effort: individual day failures are logged and skipped, and the
    /// call always completes.
    pub async fn preload(&mut self, latitude: f64, longitude: f64) {
        let client = &self.client;
        self.cache
            .preload(latitude, longitude, |date| {
                client.fetch_timings(latitude, longitude, date)
            })
            .await;
    }

    /// Deletes expired cache entries in bulk.
    pub fn clear_expired_cache(&mut self) {
        self.cache.clear_expired();
    }

    /// Reports the cache's entry count and approximate footprint.
    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }
}
