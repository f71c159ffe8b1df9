use std::future::Future;

use crate::error::Result;
use crate::model::{LeaderboardEntry, RaidFactionKey};

/// Anything that can produce the normalized leaderboard for a raid and faction.
///
/// [`LeaderboardClient`](crate::LeaderboardClient) fetches from the Blizzard
/// API; [`CachedSource`](crate::CachedSource) puts a TTL cache in front of
/// another source.
pub trait LeaderboardSource: Send + Sync {
    fn fetch_leaderboard(
        &self,
        key: RaidFactionKey,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>>> + Send;
}
