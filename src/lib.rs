// =============================================================================
// Aurora TA — technical analysis engine for the crypto chat agent
// =============================================================================
//
// `analysis::Analyzer` turns a candle series into an `AnalysisResult`; the
// rest of the crate feeds it (CoinGecko market data) and serves it (REST API,
// personality narratives).
// =============================================================================

pub mod analysis;
pub mod api;
pub mod app_state;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod personality;
pub mod runtime_config;
pub mod series;

pub use analysis::{analyze, AnalysisResult, Analyzer, IndicatorParams};
pub use error::AnalysisError;
pub use market_data::Candle;
pub use personality::TraderPersonality;
