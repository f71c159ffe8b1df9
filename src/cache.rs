use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::error::Result;
use crate::model::{LeaderboardEntry, RaidFactionKey};
use crate::source::LeaderboardSource;

#[derive(Debug, Clone)]
struct CachedTable {
    fetched_at: Instant,
    entries: Arc<Vec<LeaderboardEntry>>,
}

/// Keyed TTL cache in front of another [`LeaderboardSource`].
///
/// A zero TTL turns caching off and every call reaches the inner source.
/// Failed fetches are never cached.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    tables: DashMap<RaidFactionKey, CachedTable>,
}

impl<S: LeaderboardSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            tables: DashMap::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.tables.clear();
    }

    fn lookup(&self, key: RaidFactionKey, now: Instant) -> Option<Arc<Vec<LeaderboardEntry>>> {
        let cached = self.tables.get(&key)?;
        if now.duration_since(cached.fetched_at) < self.ttl {
            Some(Arc::clone(&cached.entries))
        } else {
            None
        }
    }
}

impl<S: LeaderboardSource> LeaderboardSource for CachedSource<S> {
    async fn fetch_leaderboard(&self, key: RaidFactionKey) -> Result<Vec<LeaderboardEntry>> {
        if !self.is_enabled() {
            return self.inner.fetch_leaderboard(key).await;
        }

        if let Some(entries) = self.lookup(key, Instant::now()) {
            debug!(?key, "leaderboard cache hit");
            return Ok(entries.as_ref().clone());
        }

        debug!(?key, "leaderboard cache miss");
        let entries = self.inner.fetch_leaderboard(key).await?;
        self.tables.insert(
            key,
            CachedTable {
                fetched_at: Instant::now(),
                entries: Arc::new(entries.clone()),
            },
        );
        Ok(entries)
    }
}
