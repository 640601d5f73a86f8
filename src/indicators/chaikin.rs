// =============================================================================
// Chaikin Money Flow (CMF)
// =============================================================================
//
//   multiplier = ((close - low) - (high - close)) / (high - low)
//   CMF        = Σ(multiplier * volume) / Σ volume     over `period` bars
//
// Bounded to [-1, 1].  Zero-range bars contribute a zero multiplier.

use super::common::safe_divide;
use super::reading::{ScalarReading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "strong buying pressure",
    "buying pressure",
    "strong selling pressure",
    "selling pressure",
    "neutral",
    INSUFFICIENT_DATA,
];

pub fn calculate(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
    period: usize,
) -> ScalarReading {
    let n = closes.len();
    if period == 0 || n < period {
        return ScalarReading::insufficient(0.0);
    }

    let mut flow = 0.0;
    let mut volume = 0.0;
    for i in (n - period)..n {
        let multiplier = safe_divide(
            (closes[i] - lows[i]) - (highs[i] - closes[i]),
            highs[i] - lows[i],
            0.0,
        );
        flow += multiplier * volumes[i];
        volume += volumes[i];
    }

    let value = safe_divide(flow, volume, 0.0).clamp(-1.0, 1.0);
    let interpretation = if value > 0.1 {
        "strong buying pressure"
    } else if value > 0.0 {
        "buying pressure"
    } else if value < -0.1 {
        "strong selling pressure"
    } else if value < 0.0 {
        "selling pressure"
    } else {
        "neutral"
    };

    ScalarReading::new(value, interpretation)
}
