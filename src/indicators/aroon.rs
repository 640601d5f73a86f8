// =============================================================================
// Aroon Up / Down / Oscillator
// =============================================================================
//
// Within the last `period` candles:
//   up   = (period - bars_since_highest_high) / period * 100
//   down = (period - bars_since_lowest_low)   / period * 100
//   oscillator = up - down
//
// Ties resolve to the most recent extreme.  up/down lie in [0, 100].

use serde::Serialize;

use super::reading::{Reading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "strong uptrend",
    "strong downtrend",
    "bullish",
    "bearish",
    "consolidation",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AroonReading {
    pub up: f64,
    pub down: f64,
    pub oscillator: f64,
    pub interpretation: &'static str,
}

impl Reading for AroonReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("up", self.up),
            ("down", self.down),
            ("oscillator", self.oscillator),
        ]
    }
}

pub fn calculate(highs: &[f64], lows: &[f64], period: usize) -> AroonReading {
    if period == 0 || highs.len() < period {
        return AroonReading {
            up: 50.0,
            down: 50.0,
            oscillator: 0.0,
            interpretation: INSUFFICIENT_DATA,
        };
    }

    let start = highs.len() - period;
    let window_highs = &highs[start..];
    let window_lows = &lows[start..];

    let mut high_idx = 0;
    let mut low_idx = 0;
    for i in 0..period {
        if window_highs[i] >= window_highs[high_idx] {
            high_idx = i;
        }
        if window_lows[i] <= window_lows[low_idx] {
            low_idx = i;
        }
    }

    let period_f = period as f64;
    let since_high = (period - 1 - high_idx) as f64;
    let since_low = (period - 1 - low_idx) as f64;
    let up = (period_f - since_high) / period_f * 100.0;
    let down = (period_f - since_low) / period_f * 100.0;
    let oscillator = up - down;

    let interpretation = if up > 70.0 && down < 30.0 {
        "strong uptrend"
    } else if down > 70.0 && up < 30.0 {
        "strong downtrend"
    } else if oscillator > 0.0 {
        "bullish"
    } else if oscillator < 0.0 {
        "bearish"
    } else {
        "consolidation"
    };

    AroonReading {
        up,
        down,
        oscillator,
        interpretation,
    }
}
