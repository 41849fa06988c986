//! Injected TTL cache for trend data.
//!
//! One instance lives in the server's shared state and is passed into the
//! pipeline explicitly. Concurrent synthesis calls may race on population;
//! last-writer-wins is fine because recomputation is idempotent, merely
//! wasteful.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use videa_core::{Region, TrendSummary, TrendingVideo};

const DEFAULT_TTL: Duration = Duration::from_secs(3_600);

struct Timestamped<T> {
    stored_at: Instant,
    value: T,
}

/// Region-keyed trending snapshots and trend summaries with a shared TTL.
pub struct TrendCache {
    ttl: Duration,
    videos: Mutex<HashMap<Region, Timestamped<Vec<TrendingVideo>>>>,
    summaries: Mutex<HashMap<Region, Timestamped<TrendSummary>>>,
}

impl Default for TrendCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TrendCache {
    /// Creates a cache whose entries expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            videos: Mutex::new(HashMap::new()),
            summaries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached trending list for `region` if it is younger than
    /// the TTL.
    pub async fn fresh_videos(&self, region: Region) -> Option<Vec<TrendingVideo>> {
        let cache = self.videos.lock().await;
        cache
            .get(&region)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Stores the trending list for `region`, stamping it now.
    pub async fn store_videos(&self, region: Region, videos: Vec<TrendingVideo>) {
        let mut cache = self.videos.lock().await;
        cache.insert(
            region,
            Timestamped {
                stored_at: Instant::now(),
                value: videos,
            },
        );
    }

    /// Returns the cached summary for `region` if it is younger than the TTL.
    pub async fn fresh_summary(&self, region: Region) -> Option<TrendSummary> {
        let cache = self.summaries.lock().await;
        cache
            .get(&region)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Stores a summary for `region`, stamping it now.
    pub async fn store_summary(&self, region: Region, summary: TrendSummary) {
        let mut cache = self.summaries.lock().await;
        cache.insert(
            region,
            Timestamped {
                stored_at: Instant::now(),
                value: summary,
            },
        );
    }
}
