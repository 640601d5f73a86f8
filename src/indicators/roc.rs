// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
// ROC measures the percentage change in price over a look-back period:
//   ROC = ((close - close_n) / close_n) * 100
//
// Positive ROC indicates upward momentum; negative indicates downward.

use super::common::safe_divide;
use super::reading::{ScalarReading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "strong bullish momentum",
    "bullish momentum",
    "strong bearish momentum",
    "bearish momentum",
    "neutral",
    INSUFFICIENT_DATA,
];

/// ROC series, one value per close starting at index `period`.
pub fn calculate_roc(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() <= period {
        return Vec::new();
    }

    (period..closes.len())
        .map(|i| {
            let prev = closes[i - period];
            safe_divide(closes[i] - prev, prev, 0.0) * 100.0
        })
        .collect()
}

pub fn calculate(closes: &[f64], period: usize) -> ScalarReading {
    let Some(&value) = calculate_roc(closes, period).last() else {
        return ScalarReading::insufficient(0.0);
    };

    let interpretation = if value > 5.0 {
        "strong bullish momentum"
    } else if value > 0.0 {
        "bullish momentum"
    } else if value < -5.0 {
        "strong bearish momentum"
    } else if value < 0.0 {
        "bearish momentum"
    } else {
        "neutral"
    };

    ScalarReading::new(value, interpretation)
}
