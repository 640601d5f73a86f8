// =============================================================================
// Series Preparation
// =============================================================================
//
// Validates a raw candle series and derives the auxiliary series every
// calculator works from.  This is the only place where the engine can fail:
// any structural problem aborts the whole analysis with `InvalidInput`.
//
// Derived series (one element per candle, oldest first):
//   closes, highs, lows, volumes
//   typical_prices  = (high + low + close) / 3
//   price_changes   = (close[i] - close[i-1]) / close[i-1] * 100,  [0] = 0
// =============================================================================

use crate::error::AnalysisError;
use crate::indicators::common::safe_divide;
use crate::market_data::Candle;

/// Minimum number of candles accepted by the engine.
pub const MIN_CANDLES: usize = 2;

#[derive(Debug, Clone)]
pub struct PreparedSeries<'a> {
    pub candles: &'a [Candle],
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub volumes: Vec<f64>,
    pub typical_prices: Vec<f64>,
    pub price_changes: Vec<f64>,
}

impl<'a> PreparedSeries<'a> {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close.
    pub fn last_close(&self) -> f64 {
        self.closes.last().copied().unwrap_or(0.0)
    }
}

/// Validate `candles` and derive the auxiliary series.
pub fn prepare(candles: &[Candle]) -> Result<PreparedSeries<'_>, AnalysisError> {
    validate(candles)?;

    let n = candles.len();
    let mut closes = Vec::with_capacity(n);
    let mut highs = Vec::with_capacity(n);
    let mut lows = Vec::with_capacity(n);
    let mut volumes = Vec::with_capacity(n);
    let mut typical_prices = Vec::with_capacity(n);

    for c in candles {
        closes.push(c.close);
        highs.push(c.high);
        lows.push(c.low);
        volumes.push(c.volume);
        typical_prices.push(c.typical_price());
    }

    let mut price_changes = Vec::with_capacity(n);
    price_changes.push(0.0);
    for w in closes.windows(2) {
        price_changes.push(safe_divide(w[1] - w[0], w[0], 0.0) * 100.0);
    }

    Ok(PreparedSeries {
        candles,
        closes,
        highs,
        lows,
        volumes,
        typical_prices,
        price_changes,
    })
}

/// Check every structural invariant of a candle series, naming the first
/// violation found.
pub fn validate(candles: &[Candle]) -> Result<(), AnalysisError> {
    if candles.is_empty() {
        return Err(AnalysisError::invalid("series is empty"));
    }
    if candles.len() < MIN_CANDLES {
        return Err(AnalysisError::invalid(format!(
            "series must contain at least {MIN_CANDLES} candles, got {}",
            candles.len()
        )));
    }

    for (i, c) in candles.iter().enumerate() {
        let fields = [
            ("open", c.open),
            ("high", c.high),
            ("low", c.low),
            ("close", c.close),
            ("volume", c.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::invalid(format!(
                    "candle {i}: {name} is not finite"
                )));
            }
            if value < 0.0 {
                return Err(AnalysisError::invalid(format!(
                    "candle {i}: {name} {value} is negative"
                )));
            }
        }

        if c.high < c.low {
            return Err(AnalysisError::invalid(format!(
                "candle {i}: high {} is below low {}",
                c.high, c.low
            )));
        }
        if c.high < c.open.max(c.close) {
            return Err(AnalysisError::invalid(format!(
                "candle {i}: high {} is below max(open, close)",
                c.high
            )));
        }
        if c.low > c.open.min(c.close) {
            return Err(AnalysisError::invalid(format!(
                "candle {i}: low {} is above min(open, close)",
                c.low
            )));
        }
        if i > 0 && c.timestamp <= candles[i - 1].timestamp {
            return Err(AnalysisError::invalid(format!(
                "candle {i}: timestamp {} is not after {}",
                c.timestamp,
                candles[i - 1].timestamp
            )));
        }
    }

    Ok(())
}
