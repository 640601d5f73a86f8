// =============================================================================
// Aurora TA — Main Entry Point
// =============================================================================
//
// Loads configuration, builds the shared state and serves the REST API until
// Ctrl-C.  Authenticated routes stay closed unless AURORA_API_TOKEN is set.
// =============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use aurora_ta::api;
use aurora_ta::app_state::{AppState, Secrets};
use aurora_ta::runtime_config::{RuntimeConfig, DEFAULT_CONFIG_PATH};

fn env_secret(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Aurora TA — Starting Up                           ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path = std::env::var("AURORA_TA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());

    info!(
        bind_addr = %config.bind_addr,
        watchlist = ?config.watchlist,
        personality = %config.default_personality,
        "Configuration ready"
    );

    // ── 2. Build shared state ────────────────────────────────────────────
    let secrets = Secrets {
        coingecko_api_key: env_secret("COINGECKO_API_KEY"),
        api_token: env_secret("AURORA_API_TOKEN"),
    };
    if secrets.api_token.is_none() {
        warn!("AURORA_API_TOKEN not set, only public endpoints are usable");
    }

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, config_path, secrets)?);

    // ── 3. Serve ─────────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await?;

    // ── 4. Persist config ────────────────────────────────────────────────
    if let Err(e) = state.save_config() {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!(
        analyses_served = state.analyses_served(),
        uptime_secs = state.uptime_secs(),
        "Aurora TA stopped"
    );
    Ok(())
}
