pub(crate) mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::source::LeaderboardSource;

/// Shared state handed to every dashboard request.
pub struct AppState<S> {
    pub source: Arc<S>,
}

impl<S> AppState<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

/// JSON routes the dashboard front end talks to.
pub fn build_app<S: LeaderboardSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/api/view", get(routes::get_view::<S>))
        .route("/api/raids", get(routes::get_raids))
        .route("/api/health", get(routes::health))
        .with_state(state)
}
