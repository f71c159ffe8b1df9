use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::api;
use crate::config::{Credentials, TOKEN_EXPIRY_MARGIN_SECS};
use crate::error::{LeaderboardError, Result};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// A bearer token together with the instant it should stop being used.
#[derive(Debug, Clone)]
pub(crate) struct AccessToken {
    pub(crate) value: String,
    refresh_at: Instant,
}

impl AccessToken {
    fn from_response(response: TokenResponse, issued_at: Instant) -> Self {
        let lifetime = response.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        Self {
            value: response.access_token,
            refresh_at: issued_at + Duration::from_secs(lifetime),
        }
    }

    pub(crate) fn is_fresh(&self, now: Instant) -> bool {
        now < self.refresh_at
    }
}

/// Exchange client credentials for an access token.
#[instrument(skip(client, credentials), fields(client_id = %credentials.client_id))]
pub(crate) async fn request_token(
    client: &reqwest::Client,
    url: &str,
    credentials: &Credentials,
) -> Result<AccessToken> {
    let issued_at = Instant::now();
    let request = client
        .post(url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body("grant_type=client_credentials");

    // The token endpoint answers bad client credentials with 400 invalid_client.
    let response: TokenResponse = match api::get_json(request, url).await {
        Err(LeaderboardError::UnexpectedStatus { url, status })
            if status == reqwest::StatusCode::BAD_REQUEST =>
        {
            return Err(LeaderboardError::Auth { url, status });
        }
        other => other?,
    };

    debug!(expires_in = response.expires_in, "obtained access token");
    Ok(AccessToken::from_response(response, issued_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_refreshes_before_expiry() {
        let issued_at = Instant::now();
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".to_owned(),
                expires_in: 86_399,
            },
            issued_at,
        );
        assert!(token.is_fresh(issued_at));
        assert!(token.is_fresh(issued_at + Duration::from_secs(86_000)));
        assert!(!token.is_fresh(issued_at + Duration::from_secs(86_340)));
    }

    #[test]
    fn short_lived_token_is_never_fresh() {
        let issued_at = Instant::now();
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".to_owned(),
                expires_in: 30,
            },
            issued_at,
        );
        assert!(!token.is_fresh(issued_at));
    }
}
