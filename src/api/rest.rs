// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Health and the candle-in analysis
// endpoint are public; everything that reaches CoinGecko or changes the
// configuration requires a valid Bearer token checked via `AuthBearer`.
//
// Errors are JSON `{ "error": "..." }`:
//   422  malformed series / parameters
//   404  unknown token
//   502  upstream (CoinGecko) failure
//   403  authentication failure (from the extractor)
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{AnalysisResult, IndicatorParams};
use crate::api::auth::AuthBearer;
use crate::app_state::AppState;
use crate::error::AnalysisError;
use crate::market_data::{Candle, CoinNotFound};
use crate::personality::TraderPersonality;

/// Upper bound on symbols per batch request.
const MAX_BATCH_SYMBOLS: usize = 25;
/// CoinGecko serves at most a year of daily OHLC on the public tier.
const MAX_DAYS: u32 = 365;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (
        status,
        Json(serde_json::json!({ "error": message.to_string() })),
    )
}

fn invalid(e: AnalysisError) -> ApiError {
    api_error(StatusCode::UNPROCESSABLE_ENTITY, e)
}

/// Map a fetch/resolve failure to 404 (unknown coin), 422 (unusable data) or
/// 502 (anything else upstream).
fn upstream(symbol: &str, e: anyhow::Error) -> ApiError {
    if let Some(nf) = e.downcast_ref::<CoinNotFound>() {
        return api_error(StatusCode::NOT_FOUND, nf);
    }
    if let Some(ae) = e.downcast_ref::<AnalysisError>() {
        return api_error(StatusCode::UNPROCESSABLE_ENTITY, ae);
    }
    warn!(symbol, error = %e, "upstream request failed");
    api_error(StatusCode::BAD_GATEWAY, format!("market data unavailable: {e:#}"))
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Public ──────────────────────────────────────────────────
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze", post(analyze_candles))
        // ── Authenticated ───────────────────────────────────────────
        .route("/api/v1/tokens/:symbol/analysis", get(token_analysis))
        .route("/api/v1/batch", post(batch_analysis))
        .route("/api/v1/config/indicators", get(get_indicator_params))
        .route("/api/v1/config/indicators", post(set_indicator_params))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health (public)
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
    analyses_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime_secs(),
        analyses_served: state.analyses_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Analyze caller-supplied candles (public)
// =============================================================================

#[derive(Deserialize)]
struct AnalyzeRequest {
    candles: Vec<Candle>,
    #[serde(default)]
    params: Option<IndicatorParams>,
    #[serde(default)]
    price_change_24h: Option<f64>,
    #[serde(default)]
    personality: Option<TraderPersonality>,
    #[serde(default)]
    symbol: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    request_id: Uuid,
    symbol: Option<String>,
    analysis: AnalysisResult,
    narrative: String,
}

async fn analyze_candles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let analyzer = state.analyzer(req.params).map_err(invalid)?;
    let analysis = analyzer
        .analyze_with_change(&req.candles, req.price_change_24h)
        .map_err(invalid)?;
    state.record_analysis();

    let personality = req
        .personality
        .unwrap_or_else(|| state.runtime_config.read().default_personality);
    let label = req.symbol.as_deref().unwrap_or("this token");
    let narrative = personality.render(label, &analysis);

    Ok(Json(AnalyzeResponse {
        request_id: Uuid::new_v4(),
        symbol: req.symbol,
        analysis,
        narrative,
    }))
}

// =============================================================================
// Token analysis via CoinGecko (authenticated)
// =============================================================================

#[derive(Serialize)]
struct SymbolAnalysis {
    symbol: String,
    coin_id: String,
    name: String,
    days: u32,
    analysis: AnalysisResult,
    narrative: String,
}

async fn analyze_symbol(
    state: &AppState,
    symbol: &str,
    days: u32,
    personality: TraderPersonality,
) -> Result<SymbolAnalysis, ApiError> {
    let coin_id = state
        .tokens
        .resolve(symbol, &state.coingecko)
        .await
        .map_err(|e| upstream(symbol, e))?;

    let (candles, info) = tokio::try_join!(
        state.coingecko.fetch_candles(&coin_id, days),
        state.coingecko.fetch_token_info(&coin_id),
    )
    .map_err(|e| upstream(symbol, e))?;

    let analysis = state
        .analyzer(None)
        .and_then(|a| a.analyze_with_change(&candles, info.price_change_24h))
        .map_err(invalid)?;
    let served = state.record_analysis();

    info!(
        symbol,
        coin_id = %coin_id,
        candles = candles.len(),
        trend = %analysis.current_trend,
        sentiment = %analysis.sentiment,
        served,
        "token analysed"
    );

    Ok(SymbolAnalysis {
        narrative: personality.render(symbol, &analysis),
        symbol: symbol.to_lowercase(),
        coin_id,
        name: info.name,
        days,
        analysis,
    })
}

#[derive(Deserialize)]
struct TokenQuery {
    #[serde(default)]
    days: Option<u32>,
    #[serde(default)]
    personality: Option<TraderPersonality>,
}

fn resolve_days(state: &AppState, days: Option<u32>) -> u32 {
    days.unwrap_or_else(|| state.runtime_config.read().default_days)
        .clamp(1, MAX_DAYS)
}

async fn token_analysis(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<SymbolAnalysis>, ApiError> {
    let days = resolve_days(&state, query.days);
    let personality = query
        .personality
        .unwrap_or_else(|| state.runtime_config.read().default_personality);
    analyze_symbol(&state, &symbol, days, personality)
        .await
        .map(Json)
}

// =============================================================================
// Batch analysis (authenticated)
// =============================================================================

#[derive(Deserialize, Default)]
struct BatchRequest {
    #[serde(default)]
    symbols: Option<Vec<String>>,
    #[serde(default)]
    days: Option<u32>,
    #[serde(default)]
    personality: Option<TraderPersonality>,
}

#[derive(Serialize)]
struct BatchEntry {
    symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<SymbolAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchResponse {
    request_id: Uuid,
    succeeded: usize,
    failed: usize,
    results: Vec<BatchEntry>,
}

async fn batch_analysis(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, ApiError> {
    let symbols = req
        .symbols
        .unwrap_or_else(|| state.runtime_config.read().watchlist.clone());
    if symbols.is_empty() {
        return Err(api_error(StatusCode::UNPROCESSABLE_ENTITY, "no symbols requested"));
    }
    if symbols.len() > MAX_BATCH_SYMBOLS {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("at most {MAX_BATCH_SYMBOLS} symbols per batch, got {}", symbols.len()),
        ));
    }

    let days = resolve_days(&state, req.days);
    let personality = req
        .personality
        .unwrap_or_else(|| state.runtime_config.read().default_personality);

    let outcomes = join_all(
        symbols
            .iter()
            .map(|symbol| analyze_symbol(&state, symbol, days, personality)),
    )
    .await;

    let results: Vec<BatchEntry> = symbols
        .into_iter()
        .zip(outcomes)
        .map(|(symbol, outcome)| match outcome {
            Ok(analysis) => BatchEntry {
                symbol,
                result: Some(analysis),
                error: None,
            },
            Err((_, Json(body))) => BatchEntry {
                symbol,
                result: None,
                error: Some(
                    body.get("error")
                        .and_then(|e| e.as_str())
                        .unwrap_or("analysis failed")
                        .to_string(),
                ),
            },
        })
        .collect();

    let succeeded = results.iter().filter(|r| r.result.is_some()).count();
    let failed = results.len() - succeeded;
    info!(succeeded, failed, days, "batch analysis complete");

    Ok(Json(BatchResponse {
        request_id: Uuid::new_v4(),
        succeeded,
        failed,
        results,
    }))
}

// =============================================================================
// Indicator parameters (authenticated)
// =============================================================================

async fn get_indicator_params(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.runtime_config.read().indicator_params.clone())
}

async fn set_indicator_params(
    _auth: AuthBearer,
    State(state): State<Arc<AppState>>,
    Json(params): Json<IndicatorParams>,
) -> Result<Json<IndicatorParams>, ApiError> {
    params.validate().map_err(invalid)?;

    {
        let mut config = state.runtime_config.write();
        config.indicator_params = params.clone();
    }
    info!("default indicator parameters updated");

    // Save to disk (best-effort).
    if let Err(e) = state.save_config() {
        warn!(error = %e, "Failed to save indicator parameters to disk");
    }

    Ok(Json(params))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::Secrets;
    use crate::runtime_config::RuntimeConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    fn test_state() -> Arc<AppState> {
        let config = RuntimeConfig {
            // nothing listens here; upstream calls fail fast
            coingecko_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            ..Default::default()
        };
        let path = std::env::temp_dir().join(format!("aurora-ta-{}.json", Uuid::new_v4()));
        let secrets = Secrets {
            coingecko_api_key: None,
            api_token: Some(TOKEN.to_string()),
        };
        Arc::new(AppState::new(config, path, secrets).unwrap())
    }

    fn candles_json(n: usize) -> serde_json::Value {
        let candles: Vec<Candle> = (0..n)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.4).sin() * 5.0;
                Candle::new(i as i64 * 3_600_000, c, c + 1.0, c - 1.0, c, 500.0)
            })
            .collect();
        serde_json::to_value(candles).unwrap()
    }

    async fn send(
        state: Arc<AppState>,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };

        let resp = router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, body) = send(test_state(), "GET", "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["analyses_served"], 0);
    }

    #[tokio::test]
    async fn analyze_returns_result_and_narrative() {
        let state = test_state();
        let payload = serde_json::json!({
            "candles": candles_json(80),
            "symbol": "btc",
            "personality": "mentor",
        });
        let (status, body) = send(state.clone(), "POST", "/api/v1/analyze", None, Some(payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["analysis"]["sentiment"].is_string());
        assert!(body["analysis"]["indicators"]["rsi"]["value"].is_number());
        assert!(body["narrative"].as_str().unwrap().contains("BTC"));
        assert_eq!(state.analyses_served(), 1);
    }

    #[tokio::test]
    async fn malformed_series_is_422() {
        let payload = serde_json::json!({ "candles": candles_json(1) });
        let (status, body) = send(test_state(), "POST", "/api/v1/analyze", None, Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("at least 2"));
    }

    #[tokio::test]
    async fn invalid_override_params_are_422() {
        let payload = serde_json::json!({
            "candles": candles_json(30),
            "params": { "rsi_period": 0 },
        });
        let (status, _) = send(test_state(), "POST", "/api/v1/analyze", None, Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unbounded_lookback_is_422() {
        let payload = serde_json::json!({
            "candles": candles_json(30),
            "params": { "rsi_period": u64::MAX, "volume_profile_bins": 1_000_000 },
        });
        let (status, body) = send(test_state(), "POST", "/api/v1/analyze", None, Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("rsi_period"));
    }

    #[tokio::test]
    async fn authenticated_routes_reject_missing_or_wrong_token() {
        let state = test_state();
        let (status, _) = send(state.clone(), "POST", "/api/v1/batch", None, Some(serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(state, "GET", "/api/v1/config/indicators", Some("nope"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn indicator_params_can_be_read_and_replaced() {
        let state = test_state();
        let (status, body) =
            send(state.clone(), "GET", "/api/v1/config/indicators", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rsi_period"], 14);

        let (status, _) = send(
            state.clone(),
            "POST",
            "/api/v1/config/indicators",
            Some(TOKEN),
            Some(serde_json::json!({ "rsi_period": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            state.clone(),
            "POST",
            "/api/v1/config/indicators",
            Some(TOKEN),
            Some(serde_json::json!({ "rsi_period": 21 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rsi_period"], 21);
        assert_eq!(state.runtime_config.read().indicator_params.rsi_period, 21);
        let _ = std::fs::remove_file(&state.config_path);
    }

    #[tokio::test]
    async fn unreachable_upstream_is_502() {
        let (status, body) = send(
            test_state(),
            "GET",
            "/api/v1/tokens/btc/analysis?days=7",
            Some(TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].as_str().unwrap().contains("market data unavailable"));
    }

    #[tokio::test]
    async fn batch_isolates_per_symbol_failures() {
        let (status, body) = send(
            test_state(),
            "POST",
            "/api/v1/batch",
            Some(TOKEN),
            Some(serde_json::json!({ "symbols": ["btc", "eth"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["failed"], 2);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
        assert!(body["results"][0]["error"].is_string());
    }
}
