// =============================================================================
// Volume Weighted Average Price (VWAP)
// =============================================================================
//
// Cumulative over the whole series (not a rolling window):
//   VWAP = Σ(typical_price * volume) / Σ volume
//
// With zero total volume the latest typical price is used.

use super::common::safe_divide;
use super::reading::ScalarReading;

pub const LABELS: &[&str] = &["price above vwap", "price below vwap", "price at vwap"];

pub fn calculate(typical_prices: &[f64], volumes: &[f64], last_close: f64) -> ScalarReading {
    let (pv, vol) = typical_prices
        .iter()
        .zip(volumes)
        .fold((0.0, 0.0), |(pv, vol), (&tp, &v)| (pv + tp * v, vol + v));

    let fallback = typical_prices.last().copied().unwrap_or(last_close);
    let vwap = safe_divide(pv, vol, fallback);

    let interpretation = if last_close > vwap {
        "price above vwap"
    } else if last_close < vwap {
        "price below vwap"
    } else {
        "price at vwap"
    };

    ScalarReading::new(vwap, interpretation)
}
