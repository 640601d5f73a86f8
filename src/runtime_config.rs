// =============================================================================
// Runtime Configuration — server settings and default indicator parameters
// =============================================================================
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// Environment overrides (applied after load, see `apply_env`):
//   AURORA_BIND_ADDR   listen address
//   AURORA_WATCHLIST   comma-separated symbols for batch analysis
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::IndicatorParams;
use crate::market_data::coingecko::DEFAULT_BASE_URL;
use crate::personality::TraderPersonality;

pub const DEFAULT_CONFIG_PATH: &str = "aurora_ta.json";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_coingecko_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_days() -> u32 {
    30
}

fn default_watchlist() -> Vec<String> {
    vec!["btc".to_string(), "eth".to_string(), "sol".to_string()]
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_coingecko_base_url")]
    pub coingecko_base_url: String,

    /// Upstream request timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// History window fetched when a request does not specify one.
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Symbols analysed by a batch request without an explicit list.
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,

    #[serde(default)]
    pub default_personality: TraderPersonality,

    /// Parameters used when a request carries no overrides.
    #[serde(default)]
    pub indicator_params: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            coingecko_base_url: default_coingecko_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            default_days: default_days(),
            watchlist: default_watchlist(),
            default_personality: TraderPersonality::default(),
            indicator_params: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .indicator_params
            .validate()
            .with_context(|| format!("invalid indicator_params in {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            watchlist = ?config.watchlist,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Apply overrides from a variable lookup (`std::env::var` in production).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("AURORA_BIND_ADDR").filter(|a| !a.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(list) = lookup("AURORA_WATCHLIST") {
            let symbols: Vec<String> = list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !symbols.is_empty() {
                self.watchlist = symbols;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.request_timeout_secs, 15);
        assert_eq!(cfg.default_days, 30);
        assert_eq!(cfg.watchlist, vec!["btc", "eth", "sol"]);
        assert_eq!(cfg.default_personality, TraderPersonality::Analyst);
        assert_eq!(cfg.indicator_params.rsi_period, 14);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "default_days": 7, "indicator_params": { "rsi_period": 21 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.default_days, 7);
        assert_eq!(cfg.indicator_params.rsi_period, 21);
        assert_eq!(cfg.indicator_params.macd_slow, 26);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    fn env_overrides_replace_watchlist_and_addr() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env(|key| match key {
            "AURORA_BIND_ADDR" => Some("127.0.0.1:9000".to_string()),
            "AURORA_WATCHLIST" => Some(" BTC, doge ,,".to_string()),
            _ => None,
        });
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.watchlist, vec!["btc", "doge"]);
    }

    #[test]
    fn save_then_load_roundtrips_atomically() {
        let dir = std::env::temp_dir().join(format!("aurora-ta-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("aurora_ta.json");

        let mut cfg = RuntimeConfig::default();
        cfg.watchlist = vec!["ada".to_string()];
        cfg.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_rejects_invalid_params() {
        let dir = std::env::temp_dir().join(format!("aurora-ta-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, r#"{ "indicator_params": { "atr_period": 0 } }"#).unwrap();
        assert!(RuntimeConfig::load(&path).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
