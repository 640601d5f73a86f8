// =============================================================================
// Central Application State — Aurora TA server
// =============================================================================
//
// Everything the HTTP handlers share: runtime configuration, the CoinGecko
// client, the token-id cache and a few counters for the health endpoint.
//
// Thread safety:
//   - Atomic counter for analyses served.
//   - parking_lot::RwLock around the runtime configuration.
//   - The token resolver manages its own interior mutability.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::RwLock;

use crate::analysis::{Analyzer, IndicatorParams};
use crate::error::AnalysisError;
use crate::market_data::{CoinGeckoClient, TokenResolver};
use crate::runtime_config::RuntimeConfig;

/// Secrets read from the environment at startup; never serialised.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub coingecko_api_key: Option<String>,
    pub api_token: Option<String>,
}

pub struct AppState {
    // ── Configuration ───────────────────────────────────────────────────
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub config_path: PathBuf,

    // ── Market Data ─────────────────────────────────────────────────────
    pub coingecko: CoinGeckoClient,
    pub tokens: TokenResolver,

    // ── Auth ────────────────────────────────────────────────────────────
    api_token: Option<String>,

    // ── Counters / Timing ───────────────────────────────────────────────
    analyses_served: AtomicU64,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, config_path: impl Into<PathBuf>, secrets: Secrets) -> Result<Self> {
        let coingecko = CoinGeckoClient::new(
            config.coingecko_base_url.clone(),
            secrets.coingecko_api_key.as_deref(),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            runtime_config: Arc::new(RwLock::new(config)),
            config_path: config_path.into(),
            coingecko,
            tokens: TokenResolver::new(),
            api_token: secrets.api_token.filter(|t| !t.is_empty()),
            analyses_served: AtomicU64::new(0),
            start_time: std::time::Instant::now(),
        })
    }

    /// Expected bearer token, `None` when authenticated routes are disabled.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }

    /// Analyzer for the configured default parameters, or for `overrides`.
    pub fn analyzer(&self, overrides: Option<IndicatorParams>) -> Result<Analyzer, AnalysisError> {
        let params = overrides.unwrap_or_else(|| self.runtime_config.read().indicator_params.clone());
        Analyzer::new(params)
    }

    pub fn record_analysis(&self) -> u64 {
        self.analyses_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn analyses_served(&self) -> u64 {
        self.analyses_served.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Persist the current runtime configuration.
    pub fn save_config(&self) -> Result<()> {
        let snapshot = self.runtime_config.read().clone();
        snapshot.save(&self.config_path)
    }
}
