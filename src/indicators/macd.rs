// =============================================================================
// MACD over percentage price changes
// =============================================================================
//
// Unlike the canonical MACD (EMAs of raw closes), this MACD runs over the
// percent-change series:
//
//   fast   = EmaSeedFirst(price_changes, fast_period)
//   slow   = EmaSeedFirst(price_changes, slow_period)
//   macd   = fast - slow
//   signal = EmaSeedFirst([macd], signal_period)      (== macd)
//   hist   = macd - signal
//
// The signal line is an EMA of a one-element series, so it collapses onto
// `macd` and the histogram is always zero.  All values are rounded to 8
// decimal places.
// =============================================================================

use serde::Serialize;

use super::common::round_to;
use super::ema::ema_seed_first;
use super::reading::Reading;

pub const LABELS: &[&str] = &[
    "bullish crossover",
    "bearish crossover",
    "bullish",
    "bearish",
    "neutral",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub interpretation: &'static str,
}

impl Reading for MacdReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("macd", self.macd),
            ("signal", self.signal),
            ("histogram", self.histogram),
        ]
    }
}

pub fn calculate(
    price_changes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdReading {
    let fast = ema_seed_first(price_changes, fast_period).unwrap_or(0.0);
    let slow = ema_seed_first(price_changes, slow_period).unwrap_or(0.0);
    let macd = round_to(fast - slow, 8);
    // TODO: keep a rolling buffer of historical MACD values so the signal line
    // smooths more than one sample.
    let signal = round_to(ema_seed_first(&[macd], signal_period).unwrap_or(macd), 8);
    let histogram = round_to(macd - signal, 8);

    MacdReading {
        macd,
        signal,
        histogram,
        interpretation: interpret(macd, histogram),
    }
}

fn interpret(macd: f64, histogram: f64) -> &'static str {
    if histogram > 0.0 {
        "bullish crossover"
    } else if histogram < 0.0 {
        "bearish crossover"
    } else if macd > 0.0 {
        "bullish"
    } else if macd < 0.0 {
        "bearish"
    } else {
        "neutral"
    }
}
