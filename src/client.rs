use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::api;
use crate::api::oauth::AccessToken;
use crate::config::{self, Credentials};
use crate::error::{LeaderboardError, Result};
use crate::model::*;
use crate::source::LeaderboardSource;

/// The main entry point for reading mythic raid leaderboards.
///
/// `LeaderboardClient` wraps a [`reqwest::Client`], holds the OAuth client
/// credentials and keeps the current access token until it is about to
/// expire.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> mythic_dashboard::Result<()> {
/// use mythic_dashboard::{Credentials, Faction, LeaderboardClient, Raid, RaidFactionKey};
///
/// let client = LeaderboardClient::new(Credentials::from_env()?);
/// let entries = client
///     .get_leaderboard(RaidFactionKey::new(Raid::Uldir, Faction::Alliance))
///     .await?;
/// println!("Found {} guilds", entries.len());
/// # Ok(())
/// # }
/// ```
pub struct LeaderboardClient {
    http: reqwest::Client,
    credentials: Credentials,
    oauth_url: String,
    api_url: String,
    token: Mutex<Option<AccessToken>>,
}

impl LeaderboardClient {
    /// Create a new client with default settings against the public endpoints.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_client(reqwest::Client::new(), credentials)
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            http: client,
            credentials,
            oauth_url: config::DEFAULT_OAUTH_URL.to_owned(),
            api_url: config::DEFAULT_API_URL.to_owned(),
            token: Mutex::new(None),
        }
    }

    /// Point the client at different token and API endpoints.
    pub fn with_endpoints(mut self, oauth_url: impl Into<String>, api_url: impl Into<String>) -> Self {
        self.oauth_url = oauth_url.into();
        self.api_url = api_url.into();
        self
    }

    /// Fetch the US mythic hall of fame for a raid and faction, in API order.
    #[instrument(skip(self))]
    pub async fn get_leaderboard(&self, key: RaidFactionKey) -> Result<Vec<LeaderboardEntry>> {
        let token = self.access_token().await?;
        let result = api::leaderboard::get_hall_of_fame(&self.http, &self.api_url, &token, key).await;
        if let Err(LeaderboardError::Auth { .. }) = &result {
            debug!("access token rejected, dropping it");
            *self.token.lock().await = None;
        }
        result
    }

    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        debug!("requesting new access token");
        let token =
            api::oauth::request_token(&self.http, &self.oauth_url, &self.credentials).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

impl LeaderboardSource for LeaderboardClient {
    async fn fetch_leaderboard(&self, key: RaidFactionKey) -> Result<Vec<LeaderboardEntry>> {
        self.get_leaderboard(key).await
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::Router;

    use super::*;
    use crate::api::leaderboard::tests::entry_json;

    /// Token endpoint issues `token-1`, `token-2`, ...; the leaderboard
    /// endpoint only accepts `token-{accepted_token}`.
    #[derive(Clone)]
    struct MockApi {
        token_requests: Arc<AtomicUsize>,
        accepted_token: Arc<AtomicUsize>,
        token_status: Option<StatusCode>,
        reject_status: Option<StatusCode>,
        body: Arc<String>,
    }

    impl MockApi {
        fn new(body: impl Into<String>) -> Self {
            Self {
                token_requests: Arc::new(AtomicUsize::new(0)),
                accepted_token: Arc::new(AtomicUsize::new(1)),
                token_status: None,
                reject_status: None,
                body: Arc::new(body.into()),
            }
        }
    }

    async fn token(State(mock): State<MockApi>, headers: HeaderMap) -> (StatusCode, String) {
        let issued = mock.token_requests.fetch_add(1, Ordering::SeqCst) + 1;
        let has_basic = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("Basic "));
        if !has_basic {
            return (StatusCode::UNAUTHORIZED, String::new());
        }
        if let Some(status) = mock.token_status {
            return (status, r#"{"error":"invalid_client"}"#.to_owned());
        }
        (
            StatusCode::OK,
            format!(r#"{{"access_token":"token-{issued}","token_type":"bearer","expires_in":86399}}"#),
        )
    }

    async fn hall_of_fame(State(mock): State<MockApi>, headers: HeaderMap) -> (StatusCode, String) {
        if let Some(status) = mock.reject_status {
            return (status, String::new());
        }
        let expected = format!(
            "Bearer token-{}",
            mock.accepted_token.load(Ordering::SeqCst)
        );
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some(expected.as_str());
        if !authorized {
            return (StatusCode::UNAUTHORIZED, String::new());
        }
        (StatusCode::OK, (*mock.body).clone())
    }

    async fn spawn_mock_api(mock: MockApi) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/token", post(token))
            .route(
                "/data/wow/leaderboard/hall-of-fame/{raid}/{faction}",
                get(hall_of_fame),
            )
            .with_state(mock);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock api");
        });
        (addr, handle)
    }

    fn client_for(addr: SocketAddr) -> LeaderboardClient {
        LeaderboardClient::new(Credentials::new("id", "secret"))
            .with_endpoints(format!("http://{addr}/token"), format!("http://{addr}"))
    }

    fn three_guilds() -> String {
        format!(
            r#"{{ "entries": [{}, {}, {}] }}"#,
            entry_json("Method", "Twisting Nether", "eu", 1, 1_536_624_000_000),
            entry_json("Limit", "Illidan", "us", 2, 1_536_710_400_000),
            entry_json("Exorsus", "Ravencrest", "eu", 3, 1_536_796_800_000),
        )
    }

    async fn fetch_error(mock: MockApi) -> LeaderboardError {
        let (addr, handle) = spawn_mock_api(mock).await;
        let err = client_for(addr)
            .get_leaderboard(RaidFactionKey::new(Raid::Uldir, Faction::Horde))
            .await
            .unwrap_err();
        handle.abort();
        err
    }

    #[tokio::test]
    async fn test_get_leaderboard_from_mock_api() {
        let mock = MockApi::new(three_guilds());
        let token_requests = Arc::clone(&mock.token_requests);
        let (addr, handle) = spawn_mock_api(mock).await;
        let client = client_for(addr);

        let key = RaidFactionKey::new(Raid::Uldir, Faction::Alliance);
        let entries = client.get_leaderboard(key).await.unwrap();
        assert_eq!(
            entries.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(entries[1].region, Region::Us);

        // Second fetch reuses the cached token.
        client.get_leaderboard(key).await.unwrap();
        assert_eq!(token_requests.load(Ordering::SeqCst), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_rejected_token_is_dropped_after_one_failure() {
        let mock = MockApi::new(three_guilds());
        let token_requests = Arc::clone(&mock.token_requests);
        let accepted_token = Arc::clone(&mock.accepted_token);
        let (addr, handle) = spawn_mock_api(mock).await;
        let client = client_for(addr);
        let key = RaidFactionKey::new(Raid::Uldir, Faction::Alliance);

        client.get_leaderboard(key).await.unwrap();

        // Upstream revokes token-1 and will only accept the next one issued.
        accepted_token.store(2, Ordering::SeqCst);
        let err = client.get_leaderboard(key).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::Auth { .. }), "{err}");

        client.get_leaderboard(key).await.unwrap();
        client.get_leaderboard(key).await.unwrap();
        assert_eq!(token_requests.load(Ordering::SeqCst), 2);

        handle.abort();
    }

    #[tokio::test]
    async fn test_select_view_over_mock_api() {
        let body = format!(
            r#"{{ "entries": [{}, {}, {}] }}"#,
            entry_json("Limit", "Illidan", "us", 1, 1_536_624_000_000),
            entry_json("Pieces", "Sargeras", "us", 2, 1_536_710_400_000),
            entry_json("Method", "Twisting Nether", "eu", 3, 1_536_796_800_000),
        );
        let (addr, handle) = spawn_mock_api(MockApi::new(body)).await;
        let client = client_for(addr);

        let outcome =
            crate::selector::select_view(&client, Some(Faction::Alliance), Some(Raid::Uldir))
                .await
                .unwrap();
        let ViewOutcome::Ready(view) = outcome else {
            panic!("expected a view");
        };
        assert_eq!(
            view.region_distribution.data,
            vec![CategoryCount::new("US", 2), CategoryCount::new("EU", 1)]
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_rejected_credentials_are_auth_errors() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::BAD_REQUEST] {
            let mock = MockApi {
                token_status: Some(status),
                ..MockApi::new(three_guilds())
            };
            let err = fetch_error(mock).await;
            assert!(
                matches!(err, LeaderboardError::Auth { status: s, .. } if s == status),
                "{err}"
            );
        }
    }

    #[tokio::test]
    async fn test_forbidden_leaderboard_is_auth_error() {
        let mock = MockApi {
            reject_status: Some(StatusCode::FORBIDDEN),
            ..MockApi::new(three_guilds())
        };
        let err = fetch_error(mock).await;
        assert!(matches!(err, LeaderboardError::Auth { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_server_error_is_unexpected_status() {
        let mock = MockApi {
            reject_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            ..MockApi::new(three_guilds())
        };
        let err = fetch_error(mock).await;
        assert!(
            matches!(
                err,
                LeaderboardError::UnexpectedStatus { status, .. }
                    if status == StatusCode::INTERNAL_SERVER_ERROR
            ),
            "{err}"
        );
        assert!(!err.is_malformed());
    }

    #[tokio::test]
    async fn test_missing_entries_is_malformed() {
        let err = fetch_error(MockApi::new(r#"{"_links":{}}"#)).await;
        assert!(matches!(err, LeaderboardError::MissingEntries { .. }));
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(addr);

        let err = client
            .get_leaderboard(RaidFactionKey::new(Raid::Uldir, Faction::Alliance))
            .await
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::Http { .. }));
    }
}
