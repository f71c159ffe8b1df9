use std::fmt;
use std::time::Duration;

use crate::error::{LeaderboardError, Result};

pub const DEFAULT_OAUTH_URL: &str = "https://oauth.battle.net/token";
pub const DEFAULT_API_URL: &str = "https://us.api.blizzard.com";

/// Leaderboards are always read from the US namespace.
pub const API_NAMESPACE: &str = "dynamic-us";

pub const DEFAULT_LEADERBOARD_CACHE_TTL_SECS: u64 = 0; // no caching
pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const DEFAULT_SERVER_PORT: u16 = 8050;

/// Refresh the access token this long before the API says it expires.
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

const CLIENT_ID_VAR: &str = "BLIZZARD_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "BLIZZARD_CLIENT_SECRET";

/// OAuth client credentials for the Blizzard API.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read `BLIZZARD_CLIENT_ID` and `BLIZZARD_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self> {
        let client_id = non_empty_var(CLIENT_ID_VAR)?;
        let client_secret = non_empty_var(CLIENT_SECRET_VAR)?;
        Ok(Self::new(client_id, client_secret))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

fn non_empty_var(name: &'static str) -> Result<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(LeaderboardError::MissingConfig(name))
}

pub fn oauth_url() -> String {
    std::env::var("BLIZZARD_OAUTH_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_OAUTH_URL.to_owned())
}

pub fn api_url() -> String {
    std::env::var("BLIZZARD_API_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
}

pub fn leaderboard_cache_ttl() -> Duration {
    let secs = std::env::var("LEADERBOARD_CACHE_TTL_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_LEADERBOARD_CACHE_TTL_SECS);
    Duration::from_secs(secs)
}

pub fn upstream_http_timeout() -> Duration {
    positive_secs(
        std::env::var("UPSTREAM_HTTP_TIMEOUT_SECS").ok().as_deref(),
        DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS,
    )
}

pub fn upstream_connect_timeout() -> Duration {
    positive_secs(
        std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS").ok().as_deref(),
        DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS,
    )
}

pub fn server_port() -> u16 {
    std::env::var("DASHBOARD_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

fn positive_secs(raw: Option<&str>, default: u64) -> Duration {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_secs_falls_back_on_garbage_and_zero() {
        assert_eq!(positive_secs(None, 10), Duration::from_secs(10));
        assert_eq!(positive_secs(Some("abc"), 10), Duration::from_secs(10));
        assert_eq!(positive_secs(Some("0"), 10), Duration::from_secs(10));
        assert_eq!(positive_secs(Some(" 25 "), 10), Duration::from_secs(25));
    }

    #[test]
    fn debug_output_hides_secret() {
        let credentials = Credentials::new("client", "hunter2");
        let printed = format!("{credentials:?}");
        assert!(printed.contains("client"));
        assert!(!printed.contains("hunter2"));
    }
}
