// =============================================================================
// Commodity Channel Index (CCI)
// =============================================================================
//
//   CCI = (tp - SMA(tp, period)) / (0.015 * mean_abs_deviation(period))
//
// A zero deviation window reads 0.

use super::common::{safe_divide, sma};
use super::reading::{ScalarReading, INSUFFICIENT_DATA};

const LAMBERT: f64 = 0.015;

pub const LABELS: &[&str] = &[
    "overbought",
    "oversold",
    "bullish",
    "bearish",
    "neutral",
    INSUFFICIENT_DATA,
];

pub fn calculate(typical_prices: &[f64], period: usize) -> ScalarReading {
    let Ok(mean) = sma(typical_prices, period) else {
        return ScalarReading::insufficient(0.0);
    };

    let window = &typical_prices[typical_prices.len() - period..];
    let mad = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
    let last = window[window.len() - 1];
    let value = safe_divide(last - mean, LAMBERT * mad, 0.0);

    let interpretation = if value > 100.0 {
        "overbought"
    } else if value < -100.0 {
        "oversold"
    } else if value > 0.0 {
        "bullish"
    } else if value < 0.0 {
        "bearish"
    } else {
        "neutral"
    };

    ScalarReading::new(value, interpretation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_value() {
        let tp = [1.0, 2.0, 3.0, 3.5];
        // mean 2.375, mad 0.875 => 1.125 / (0.015 * 0.875)
        let r = calculate(&tp, 4);
        assert!((r.value - 1.125 / 0.013125).abs() < 1e-9);
        assert_eq!(r.interpretation, "bullish");
    }

    #[test]
    fn spike_is_overbought() {
        let mut tp = vec![10.0; 19];
        tp.push(20.0);
        let r = calculate(&tp, 20);
        assert!(r.value > 100.0);
        assert_eq!(r.interpretation, "overbought");
    }

    #[test]
    fn flat_window_reads_zero() {
        let r = calculate(&[50.0; 25], 20);
        assert_eq!(r.value, 0.0);
        assert_eq!(r.interpretation, "neutral");
    }

    #[test]
    fn insufficient_data_default() {
        let r = calculate(&[1.0; 5], 20);
        assert_eq!(r.interpretation, INSUFFICIENT_DATA);
        assert_eq!(r.value, 0.0);
    }
}
