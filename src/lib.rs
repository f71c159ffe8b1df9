pub use cache::CachedSource;
pub use client::LeaderboardClient;
pub use config::Credentials;
pub use error::{LeaderboardError, Result};
pub use model::*;
pub use selector::{build_view, select_view, Selection};
pub use source::LeaderboardSource;

pub(crate) mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod selector;
pub mod source;
