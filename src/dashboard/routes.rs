use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::warn;

use super::AppState;
use crate::error::LeaderboardError;
use crate::model::{Banner, DashboardView, Raid, ViewOutcome, IDLE_MESSAGE};
use crate::selector::{self, Selection};
use crate::source::LeaderboardSource;

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub tab: Option<String>,
    pub raid: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ViewResponse {
    Idle {
        message: &'static str,
        banner: Banner,
    },
    Ready {
        banner: Banner,
        view: DashboardView,
    },
}

#[derive(Debug, Serialize)]
pub struct RaidOption {
    pub slug: &'static str,
    pub code: &'static str,
    pub name: String,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_raids() -> Json<Vec<RaidOption>> {
    Json(
        Raid::iter()
            .map(|raid| RaidOption {
                slug: raid.slug(),
                code: raid.code(),
                name: raid.to_string(),
            })
            .collect(),
    )
}

pub async fn get_view<S: LeaderboardSource + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<ViewQuery>,
) -> Response {
    let selection = Selection::from_raw(query.tab.as_deref(), query.raid.as_deref());
    let banner = selection.banner();

    match selector::select_view(state.source.as_ref(), selection.tab, selection.raid).await {
        Ok(ViewOutcome::Idle) => Json(ViewResponse::Idle {
            message: IDLE_MESSAGE,
            banner,
        })
        .into_response(),
        Ok(ViewOutcome::Ready(view)) => Json(ViewResponse::Ready { banner, view }).into_response(),
        Err(e) => {
            warn!(error = %e, ?selection, "failed to build dashboard view");
            (
                error_status(&e),
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

fn error_status(error: &LeaderboardError) -> StatusCode {
    match error {
        LeaderboardError::Auth { .. } => StatusCode::SERVICE_UNAVAILABLE,
        LeaderboardError::MissingConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}
