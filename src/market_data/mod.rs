pub mod candle;
pub mod coingecko;
pub mod token_resolver;

// Re-export the Candle struct for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::Candle;
pub use coingecko::{CoinGeckoClient, CoinNotFound, TokenInfo};
pub use token_resolver::TokenResolver;
