//! Offline-tolerant prayer-times access
//!
//! Two cooperating pieces: an error classifier with a bounded
//! exponential-backoff retry loop ([`retry`], [`error`]), and a
//! location/date-keyed response cache with a 30-day TTL ([`cache`]).
//! The [`service`] module composes them around the AlAdhan API client
//! in [`client`]: cache hit first, retried fetch on miss, write-through
//! on success.

pub mod cache;
pub mod client;
pub mod error;
pub mod fallback;
pub mod retry;
pub mod service;

pub use cache::{CacheStats, FileStore, KeyValueStore, MemoryStore, PrayerTimesCache};
pub use client::{AladhanClient, PrayerApiError, PrayerTimes};
pub use error::{toast, ApiError, Classify, ErrorToast, Failure, ToastVariant};
pub use retry::{should_retry, with_retry, with_retry_notify, RetryPolicy};
pub use service::PrayerTimesService;
