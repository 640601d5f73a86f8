// =============================================================================
// Token Resolver — ticker symbol => CoinGecko coin id
// =============================================================================
//
// An explicit cache owned by whoever constructs it (the app state in the
// server), seeded with well-known tickers.  Misses fall through to
// CoinGecko's search endpoint and successful lookups are remembered.

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::coingecko::{CoinGeckoClient, CoinNotFound};

const WELL_KNOWN: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("sol", "solana"),
    ("bnb", "binancecoin"),
    ("xrp", "ripple"),
    ("ada", "cardano"),
    ("doge", "dogecoin"),
    ("avax", "avalanche-2"),
    ("dot", "polkadot"),
    ("link", "chainlink"),
    ("matic", "matic-network"),
    ("ltc", "litecoin"),
    ("usdt", "tether"),
    ("usdc", "usd-coin"),
];

pub struct TokenResolver {
    ids: RwLock<HashMap<String, String>>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    pub fn new() -> Self {
        let ids = WELL_KNOWN
            .iter()
            .map(|(sym, id)| (sym.to_string(), id.to_string()))
            .collect();
        Self {
            ids: RwLock::new(ids),
        }
    }

    fn key(symbol: &str) -> String {
        symbol.trim().to_lowercase()
    }

    pub fn cached(&self, symbol: &str) -> Option<String> {
        self.ids.read().get(&Self::key(symbol)).cloned()
    }

    pub fn insert(&self, symbol: &str, id: impl Into<String>) {
        self.ids.write().insert(Self::key(symbol), id.into());
    }

    pub fn len(&self) -> usize {
        self.ids.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.read().is_empty()
    }

    /// Cached id, else CoinGecko search (remembered on success).
    pub async fn resolve(&self, symbol: &str, client: &CoinGeckoClient) -> Result<String> {
        if let Some(id) = self.cached(symbol) {
            debug!(symbol, id = %id, "token resolved from cache");
            return Ok(id);
        }

        let key = Self::key(symbol);
        let id = client
            .search_coin(&key)
            .await?
            .ok_or_else(|| CoinNotFound(key.clone()))?;

        info!(symbol = %key, id = %id, "token resolved via search");
        self.insert(&key, id.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_symbols_resolve_case_insensitively() {
        let resolver = TokenResolver::new();
        assert_eq!(resolver.cached("BTC").as_deref(), Some("bitcoin"));
        assert_eq!(resolver.cached(" eth ").as_deref(), Some("ethereum"));
        assert_eq!(resolver.cached("pepe"), None);
    }

    #[test]
    fn insert_is_visible_to_later_lookups() {
        let resolver = TokenResolver::new();
        let before = resolver.len();
        resolver.insert("PEPE", "pepe");
        assert_eq!(resolver.cached("pepe").as_deref(), Some("pepe"));
        assert_eq!(resolver.len(), before + 1);
    }

    #[tokio::test]
    async fn cached_symbol_needs_no_network() {
        let resolver = TokenResolver::new();
        // unroutable base url: any request would fail
        let client = CoinGeckoClient::new(
            "http://127.0.0.1:9",
            None,
            std::time::Duration::from_millis(50),
        )
        .unwrap();
        assert_eq!(resolver.resolve("sol", &client).await.unwrap(), "solana");
    }

    #[test]
    fn separate_resolvers_do_not_share_state() {
        let a = TokenResolver::new();
        let b = TokenResolver::new();
        a.insert("wif", "dogwifcoin");
        assert!(b.cached("wif").is_none());
    }
}
