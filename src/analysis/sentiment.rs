// =============================================================================
// Sentiment aggregation — bullish / bearish factor tally
// =============================================================================
//
// One point per directional signal:
//   RSI        < 30 bullish (oversold), > 70 bearish (overbought),
//              (50, 70] bullish, [30, 50) bearish, exactly 50 or
//              insufficient data contributes nothing
//   MACD       histogram sign
//   EMA        EMA9 vs EMA20 (seed-first)
//   24h change sign
//   trend      uptrend / downtrend label
//
// Verdict: bullish if bullish > bearish + 1, bearish if bearish > bullish + 1,
// neutral otherwise.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::trend::{EmaStack, Trend};
use crate::indicators::reading::{Reading, ScalarReading};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single signal counted toward the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentimentFactor {
    pub signal: &'static str,
    pub bias: Sentiment,
}

impl SentimentFactor {
    fn bullish(signal: &'static str) -> Self {
        Self {
            signal,
            bias: Sentiment::Bullish,
        }
    }

    fn bearish(signal: &'static str) -> Self {
        Self {
            signal,
            bias: Sentiment::Bearish,
        }
    }
}

/// Everything the tally looks at.
#[derive(Debug, Clone, Copy)]
pub struct SentimentInputs {
    pub rsi: ScalarReading,
    pub macd_histogram: f64,
    pub emas: Option<EmaStack>,
    pub price_change_24h: f64,
    pub trend: Trend,
}

pub fn collect_factors(inputs: &SentimentInputs) -> Vec<SentimentFactor> {
    let mut factors = Vec::with_capacity(5);

    if !inputs.rsi.is_insufficient() {
        let rsi = inputs.rsi.value;
        if rsi < 30.0 {
            factors.push(SentimentFactor::bullish("rsi oversold"));
        } else if rsi > 70.0 {
            factors.push(SentimentFactor::bearish("rsi overbought"));
        } else if rsi > 50.0 {
            factors.push(SentimentFactor::bullish("rsi above 50"));
        } else if rsi < 50.0 {
            factors.push(SentimentFactor::bearish("rsi below 50"));
        }
    }

    if inputs.macd_histogram > 0.0 {
        factors.push(SentimentFactor::bullish("macd histogram positive"));
    } else if inputs.macd_histogram < 0.0 {
        factors.push(SentimentFactor::bearish("macd histogram negative"));
    }

    if let Some(emas) = inputs.emas {
        if emas.ema9 > emas.ema20 {
            factors.push(SentimentFactor::bullish("ema9 above ema20"));
        } else if emas.ema9 < emas.ema20 {
            factors.push(SentimentFactor::bearish("ema9 below ema20"));
        }
    }

    if inputs.price_change_24h > 0.0 {
        factors.push(SentimentFactor::bullish("24h price change positive"));
    } else if inputs.price_change_24h < 0.0 {
        factors.push(SentimentFactor::bearish("24h price change negative"));
    }

    match inputs.trend {
        Trend::Uptrend => factors.push(SentimentFactor::bullish("uptrend")),
        Trend::Downtrend => factors.push(SentimentFactor::bearish("downtrend")),
        Trend::Sideways => {}
    }

    factors
}

pub fn verdict(factors: &[SentimentFactor]) -> Sentiment {
    let bullish = factors.iter().filter(|f| f.bias == Sentiment::Bullish).count();
    let bearish = factors.iter().filter(|f| f.bias == Sentiment::Bearish).count();

    if bullish > bearish + 1 {
        Sentiment::Bullish
    } else if bearish > bullish + 1 {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}
