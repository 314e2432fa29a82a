//! Time-bucketed memo of the last completed leaderboard

use std::{future::Future, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::Leaderboard;

/// Default bucket width, ten minutes
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

struct CachedBoard {
    bucket: i64,
    board: Arc<Leaderboard>,
}

/// Serves one leaderboard per time bucket
///
/// Time is cut into buckets of `ttl` seconds since the Unix epoch. A cached
/// board is served for as long as requests fall into the bucket it was
/// produced in. The slot lock is held while refreshing, so concurrent
/// callers in a new bucket wait for one refresh instead of each walking the
/// blog. Only successful refreshes are stored.
pub struct LeaderboardCache {
    ttl_secs: i64,
    slot: Mutex<Option<CachedBoard>>,
}

impl LeaderboardCache {
    /// A TTL under one second is rounded up to one second
    pub fn new(ttl: Duration) -> Self {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1);
        Self {
            ttl_secs,
            slot: Mutex::new(None),
        }
    }

    /// Bucket that `at` falls into
    pub fn bucket_for(&self, at: DateTime<Utc>) -> i64 {
        at.timestamp().div_euclid(self.ttl_secs)
    }

    /// The cached board, if it belongs to the bucket of `now`
    pub async fn cached(&self, now: DateTime<Utc>) -> Option<Arc<Leaderboard>> {
        let bucket = self.bucket_for(now);
        let slot = self.slot.lock().await;
        slot.as_ref()
            .filter(|cached| cached.bucket == bucket)
            .map(|cached| cached.board.clone())
    }

    /// Serve the board for `now`, running `refresh` if the bucket has none
    ///
    /// # Errors
    ///
    /// Whatever `refresh` returns; the previous board stays cached but is
    /// not served for the new bucket.
    pub async fn get_or_refresh<F, Fut, E>(
        &self,
        now: DateTime<Utc>,
        refresh: F,
    ) -> Result<Arc<Leaderboard>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Leaderboard, E>>,
    {
        let bucket = self.bucket_for(now);
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref()
            && cached.bucket == bucket
        {
            return Ok(cached.board.clone());
        }

        debug!(bucket, "leaderboard cache miss");
        let board = Arc::new(refresh().await?);
        *slot = Some(CachedBoard {
            bucket,
            board: board.clone(),
        });
        Ok(board)
    }

    /// Drop the cached board
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

impl Default for LeaderboardCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
