// =============================================================================
// Williams %R
// =============================================================================
//
//   %R = (highest_high(period) - close) / (highest_high - lowest_low) * -100
//
// Bounded to [-100, 0]; a flat window reads -50.

use super::common::{highest, lowest, safe_divide};
use super::reading::{ScalarReading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &["overbought", "oversold", "neutral", INSUFFICIENT_DATA];

pub fn calculate(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> ScalarReading {
    if period == 0 || closes.len() < period {
        return ScalarReading::insufficient(-50.0);
    }

    let close = closes[closes.len() - 1];
    let hh = highest(highs, period);
    let ll = lowest(lows, period);
    let value = (safe_divide(hh - close, hh - ll, 0.5) * -100.0).clamp(-100.0, 0.0);

    let interpretation = if value > -20.0 {
        "overbought"
    } else if value < -80.0 {
        "oversold"
    } else {
        "neutral"
    };

    ScalarReading::new(value, interpretation)
}
