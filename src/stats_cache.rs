use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::models::stats::SubscriptionStats;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Last successful fetch. Replaced wholesale, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsCacheEntry {
    pub stats: SubscriptionStats,
    pub fetched_at: DateTime<Utc>,
}

/// What a `get` hands back: the snapshot served, when it was fetched, and
/// whether it is older than the TTL.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedStats {
    pub stats: SubscriptionStats,
    pub fetched_at: DateTime<Utc>,
    pub expired: bool,
}

impl CachedStats {
    fn from_entry(entry: &StatsCacheEntry, expired: bool) -> Self {
        Self {
            stats: entry.stats.clone(),
            fetched_at: entry.fetched_at,
            expired,
        }
    }
}

/// Process-wide single-slot TTL cache in front of the subscription stats.
///
/// The slot only ever holds the latest successful fetch. Fetches run outside
/// the lock, so concurrent misses may each hit the upstream; the last one to
/// finish wins.
pub struct StatsCache {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<Arc<StatsCacheEntry>>>,
}

impl StatsCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or_else(|_| {
                tracing::warn!("Stats cache TTL {ttl:?} is out of range, entries never expire");
                TimeDelta::MAX
            }),
            clock,
            entry: RwLock::new(None),
        }
    }

    pub async fn entry(&self) -> Option<Arc<StatsCacheEntry>> {
        self.entry.read().await.clone()
    }

    #[allow(dead_code)]
    pub async fn is_expired(&self) -> bool {
        match self.entry().await {
            Some(entry) => self.is_stale(&entry),
            None => true,
        }
    }

    fn is_stale(&self, entry: &StatsCacheEntry) -> bool {
        self.clock.now() - entry.fetched_at >= self.ttl
    }

    /// Serve from the slot or refresh it with `fetch`.
    ///
    /// * `force_refresh` always fetches, and a failure is returned as-is.
    /// * An empty slot always fetches, and a failure is returned as-is.
    /// * A stale slot fetches; on failure the stale snapshot is served with
    ///   `expired = true` and the slot is left untouched.
    pub async fn get<F, Fut, E>(&self, force_refresh: bool, fetch: F) -> Result<CachedStats, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SubscriptionStats, E>>,
        E: Display,
    {
        let current = if force_refresh {
            None
        } else {
            self.entry().await
        };

        match current {
            Some(entry) if !self.is_stale(&entry) => Ok(CachedStats::from_entry(&entry, false)),
            Some(stale) => match self.refresh(fetch).await {
                Ok(fresh) => Ok(fresh),
                Err(e) => {
                    tracing::warn!(
                        fetched_at = %stale.fetched_at,
                        "Stats refresh failed, serving stale snapshot: {e}"
                    );
                    Ok(CachedStats::from_entry(&stale, true))
                }
            },
            None => self.refresh(fetch).await,
        }
    }

    async fn refresh<F, Fut, E>(&self, fetch: F) -> Result<CachedStats, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SubscriptionStats, E>>,
    {
        let stats = fetch().await?;
        let entry = Arc::new(StatsCacheEntry {
            stats,
            fetched_at: self.clock.now(),
        });

        *self.entry.write().await = Some(entry.clone());

        Ok(CachedStats::from_entry(&entry, false))
    }
}
