pub(crate) mod leaderboard;
pub(crate) mod oauth;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{LeaderboardError, Result};

/// Send a prepared request and decode the JSON response body.
///
/// 401 and 403 become [`LeaderboardError::Auth`]; any other non-success
/// status is reported as [`LeaderboardError::UnexpectedStatus`].
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> Result<T> {
    debug!(url, "requesting");

    let response = request.send().await.map_err(|e| LeaderboardError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return Err(LeaderboardError::Auth {
            url: url.to_owned(),
            status,
        });
    }
    if !status.is_success() {
        return Err(LeaderboardError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| LeaderboardError::ResponseBody {
            url: url.to_owned(),
            source: e,
        })?;

    serde_json::from_str(&body).map_err(|e| LeaderboardError::Json {
        url: url.to_owned(),
        source: e,
    })
}
