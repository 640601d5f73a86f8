// =============================================================================
// CoinGecko REST API Client — candles, token metadata, search
// =============================================================================
//
// Candles come from two public endpoints:
//   GET /coins/{id}/ohlc?vs_currency=usd&days=N          [[ts, o, h, l, c], ...]
//   GET /coins/{id}/market_chart?vs_currency=usd&days=N  { total_volumes: [[ts, v]] }
// Each OHLC bar takes the latest volume sample at or before its timestamp.
//
// The result is sanitised so the engine's series invariants hold: bars with
// non-finite or negative values are dropped, out-of-order or duplicate
// timestamps are skipped, and high/low are widened to cover open and close.
//
// An optional demo API key is sent as `x-cg-demo-api-key`.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::market_data::Candle;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// The requested coin id does not exist upstream.
#[derive(Debug, Error)]
#[error("coin not found: {0}")]
pub struct CoinNotFound(pub String);

/// Token metadata used alongside the candles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub price_change_24h: Option<f64>,
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("accept", HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let val = HeaderValue::from_str(key).context("invalid CoinGecko API key header")?;
            default_headers.insert("x-cg-demo-api-key", val);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .user_agent(concat!("aurora-ta/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "CoinGeckoClient initialised");

        Ok(Self { base_url, client })
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    async fn get_json(&self, path: &str, query: &[(&str, &str)], id: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {path} request failed"))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CoinNotFound(id.to_string()).into());
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(status_error(path, status, &body));
        }

        resp.json()
            .await
            .with_context(|| format!("failed to parse {path} response"))
    }

    // -------------------------------------------------------------------------
    // Endpoints
    // -------------------------------------------------------------------------

    /// OHLC candles merged with volume for the last `days` days.
    #[instrument(skip(self), name = "coingecko::fetch_candles")]
    pub async fn fetch_candles(&self, id: &str, days: u32) -> Result<Vec<Candle>> {
        let days = days.to_string();
        let query = [("vs_currency", "usd"), ("days", days.as_str())];

        let ohlc = self
            .get_json(&format!("/coins/{id}/ohlc"), &query, id)
            .await?;
        let chart = self
            .get_json(&format!("/coins/{id}/market_chart"), &query, id)
            .await?;

        let bars = parse_ohlc(&ohlc)?;
        let volumes = parse_volumes(&chart)?;
        let candles = sanitize(merge_volumes(bars, &volumes));

        debug!(id, count = candles.len(), "candles fetched");
        Ok(candles)
    }

    #[instrument(skip(self), name = "coingecko::fetch_token_info")]
    pub async fn fetch_token_info(&self, id: &str) -> Result<TokenInfo> {
        let query = [
            ("localization", "false"),
            ("tickers", "false"),
            ("market_data", "true"),
            ("community_data", "false"),
            ("developer_data", "false"),
            ("sparkline", "false"),
        ];
        let body = self.get_json(&format!("/coins/{id}"), &query, id).await?;
        parse_token_info(&body)
    }

    /// Best coin id for a free-text query or ticker symbol, if any.
    #[instrument(skip(self), name = "coingecko::search_coin")]
    pub async fn search_coin(&self, query: &str) -> Result<Option<String>> {
        let body = self
            .get_json("/search", &[("query", query)], query)
            .await?;
        Ok(best_search_match(&body, query))
    }
}

// =============================================================================
// Response parsing
// =============================================================================

const ERROR_BODY_LIMIT: usize = 200;

/// Error message for a non-2xx reply; the body may be an HTML error page.
fn status_error(path: &str, status: StatusCode, body: &str) -> String {
    let mut snippet: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();
    if body.trim().chars().count() > ERROR_BODY_LIMIT {
        snippet.push_str("...");
    }
    format!("CoinGecko GET {path} returned {status}: {snippet}")
}

fn num(v: &Value) -> Option<f64> {
    v.as_f64()
}

/// `[[ts, open, high, low, close], ...]` => candles with zero volume.
pub fn parse_ohlc(body: &Value) -> Result<Vec<Candle>> {
    let raw = body.as_array().context("ohlc response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());
    for entry in raw {
        let arr = entry.as_array().context("ohlc entry is not an array")?;
        if arr.len() < 5 {
            warn!("skipping malformed ohlc entry with {} elements", arr.len());
            continue;
        }
        let parsed = (
            arr[0].as_i64().or_else(|| num(&arr[0]).map(|t| t as i64)),
            num(&arr[1]),
            num(&arr[2]),
            num(&arr[3]),
            num(&arr[4]),
        );
        match parsed {
            (Some(ts), Some(o), Some(h), Some(l), Some(c)) => {
                candles.push(Candle::new(ts, o, h, l, c, 0.0));
            }
            _ => warn!(entry = %entry, "skipping non-numeric ohlc entry"),
        }
    }
    Ok(candles)
}

/// `total_volumes` samples as `(timestamp, volume)`.
pub fn parse_volumes(body: &Value) -> Result<Vec<(i64, f64)>> {
    let raw = body
        .get("total_volumes")
        .and_then(Value::as_array)
        .context("market_chart response has no total_volumes array")?;

    Ok(raw
        .iter()
        .filter_map(|entry| {
            let arr = entry.as_array()?;
            let ts = arr.first()?.as_f64()? as i64;
            let vol = arr.get(1)?.as_f64()?;
            Some((ts, vol))
        })
        .collect())
}

/// Give each bar the latest volume sample at or before its timestamp.
/// Both inputs must be ordered oldest first.
pub fn merge_volumes(mut bars: Vec<Candle>, volumes: &[(i64, f64)]) -> Vec<Candle> {
    let mut j = 0;
    let mut current = None;
    for bar in &mut bars {
        while j < volumes.len() && volumes[j].0 <= bar.timestamp {
            current = Some(volumes[j].1);
            j += 1;
        }
        bar.volume = current.unwrap_or(0.0);
    }
    bars
}

/// Enforce the engine's candle invariants on upstream data.
pub fn sanitize(candles: Vec<Candle>) -> Vec<Candle> {
    let mut out: Vec<Candle> = Vec::with_capacity(candles.len());
    let mut dropped = 0usize;

    for mut c in candles {
        let values = [c.open, c.high, c.low, c.close, c.volume];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            dropped += 1;
            continue;
        }
        if out.last().is_some_and(|prev| c.timestamp <= prev.timestamp) {
            dropped += 1;
            continue;
        }
        c.high = c.high.max(c.open).max(c.close).max(c.low);
        c.low = c.low.min(c.open).min(c.close);
        out.push(c);
    }

    if dropped > 0 {
        warn!(dropped, kept = out.len(), "dropped invalid upstream candles");
    }
    out
}

pub fn parse_token_info(body: &Value) -> Result<TokenInfo> {
    let text = |key: &str| -> Result<String> {
        body.get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .with_context(|| format!("coin response has no {key}"))
    };
    let market = body.get("market_data");

    Ok(TokenInfo {
        id: text("id")?,
        symbol: text("symbol")?,
        name: text("name")?,
        current_price: market
            .and_then(|m| m.pointer("/current_price/usd"))
            .and_then(Value::as_f64),
        price_change_24h: market
            .and_then(|m| m.get("price_change_percentage_24h"))
            .and_then(Value::as_f64),
    })
}

/// Prefer an exact symbol match with the best market-cap rank, then the
/// first listed coin.
pub fn best_search_match(body: &Value, query: &str) -> Option<String> {
    let coins = body.get("coins")?.as_array()?;
    let id_of = |c: &Value| c.get("id").and_then(Value::as_str).map(str::to_string);

    let exact = coins
        .iter()
        .filter(|c| {
            c.get("symbol")
                .and_then(Value::as_str)
                .is_some_and(|s| s.eq_ignore_ascii_case(query))
        })
        .min_by_key(|c| {
            c.get("market_cap_rank")
                .and_then(Value::as_u64)
                .unwrap_or(u64::MAX)
        });

    exact.and_then(id_of).or_else(|| coins.first().and_then(id_of))
}
