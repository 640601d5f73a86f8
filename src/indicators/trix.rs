// =============================================================================
// TRIX — rate of change of a triple-smoothed EMA
// =============================================================================
//
//   ema3 = EmaSeedFirst(EmaSeedFirst(EmaSeedFirst(closes)))
//   TRIX = (ema3[t] - ema3[t-1]) / ema3[t-1] * 100
//
// Requires `period + 1` closes.

use super::common::safe_divide;
use super::ema::ema_seed_first_series;
use super::reading::{ScalarReading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &["bullish", "bearish", "neutral", INSUFFICIENT_DATA];

pub fn calculate(closes: &[f64], period: usize) -> ScalarReading {
    if period == 0 || closes.len() <= period {
        return ScalarReading::insufficient(0.0);
    }

    let single = ema_seed_first_series(closes, period);
    let double = ema_seed_first_series(&single, period);
    let triple = ema_seed_first_series(&double, period);

    let n = triple.len();
    let value = safe_divide(triple[n - 1] - triple[n - 2], triple[n - 2], 0.0) * 100.0;

    let interpretation = if value > 0.0 {
        "bullish"
    } else if value < 0.0 {
        "bearish"
    } else {
        "neutral"
    };

    ScalarReading::new(value, interpretation)
}
