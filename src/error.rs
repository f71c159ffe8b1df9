/// All errors that can occur while fetching and normalizing leaderboards.
#[derive(thiserror::Error, Debug)]
pub enum LeaderboardError {
    /// The API rejected the client credentials or the access token.
    #[error("authentication rejected by {url} (status {status})")]
    Auth {
        url: String,
        status: reqwest::StatusCode,
    },

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// The response body is not the JSON shape we expect.
    #[error("malformed response from {url}: {source}")]
    Json {
        url: String,
        source: serde_json::Error,
    },

    /// The leaderboard response has no `entries` list.
    #[error("leaderboard response from {url} has no entries")]
    MissingEntries { url: String },

    #[error("unknown region code: {0}")]
    UnknownRegion(String),

    #[error("unknown faction type: {0}")]
    UnknownFaction(String),

    #[error("guild {guild} has no realm name")]
    MissingRealmName { guild: String },

    #[error("timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    #[error("rank must be a positive integer, got {0}")]
    InvalidRank(i64),

    #[error("rank {0} appears more than once")]
    DuplicateRank(u32),

    /// A required configuration variable is not set.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl LeaderboardError {
    /// Whether the upstream answered, but with data we could not normalize.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            LeaderboardError::Json { .. }
                | LeaderboardError::MissingEntries { .. }
                | LeaderboardError::UnknownRegion(_)
                | LeaderboardError::UnknownFaction(_)
                | LeaderboardError::MissingRealmName { .. }
                | LeaderboardError::InvalidTimestamp(_)
                | LeaderboardError::InvalidRank(_)
                | LeaderboardError::DuplicateRank(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
