use mythic_dashboard::config;
use mythic_dashboard::dashboard::{self, AppState};
use mythic_dashboard::{CachedSource, Credentials, LeaderboardClient};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(error = %e, "Blizzard API credentials are required");
            return;
        }
    };

    let http = match reqwest::Client::builder()
        .user_agent(concat!("mythic-dashboard/", env!("CARGO_PKG_VERSION")))
        .timeout(config::upstream_http_timeout())
        .connect_timeout(config::upstream_connect_timeout())
        .build()
    {
        Ok(http) => http,
        Err(e) => {
            tracing::error!(error = %e, "failed to build HTTP client");
            return;
        }
    };

    let client = LeaderboardClient::with_client(http, credentials)
        .with_endpoints(config::oauth_url(), config::api_url());
    let cache_ttl = config::leaderboard_cache_ttl();
    let source = CachedSource::new(client, cache_ttl);
    if source.is_enabled() {
        tracing::info!(ttl_secs = cache_ttl.as_secs(), "leaderboard cache enabled");
    }

    let app = dashboard::build_app(AppState::new(source));

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("Mythic dashboard listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
