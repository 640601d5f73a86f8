// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
//   %K = (close - lowest_low(k)) / (highest_high(k) - lowest_low(k)) * 100
//   %D = mean of the latest `d` %K samples
//
// Only the latest %K is retained, so %D is the mean of a single sample and
// equals %K.  A flat window (highest == lowest) reads %K = 50.

use serde::Serialize;

use super::common::{highest, lowest, safe_divide, trailing_mean};
use super::reading::{Reading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "overbought",
    "oversold",
    "bullish crossover",
    "bearish crossover",
    "neutral",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochasticReading {
    pub k: f64,
    pub d: f64,
    pub interpretation: &'static str,
}

impl Reading for StochasticReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![("k", self.k), ("d", self.d)]
    }
}

pub fn calculate(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> StochasticReading {
    if k_period == 0 || closes.len() < k_period {
        return StochasticReading {
            k: 50.0,
            d: 50.0,
            interpretation: INSUFFICIENT_DATA,
        };
    }

    let close = closes[closes.len() - 1];
    let hh = highest(highs, k_period);
    let ll = lowest(lows, k_period);
    let k = (safe_divide(close - ll, hh - ll, 0.5) * 100.0).clamp(0.0, 100.0);
    let d = trailing_mean(&[k], d_period);

    StochasticReading {
        k,
        d,
        interpretation: interpret(k, d),
    }
}

fn interpret(k: f64, d: f64) -> &'static str {
    if k > 80.0 {
        "overbought"
    } else if k < 20.0 {
        "oversold"
    } else if k > d {
        "bullish crossover"
    } else if k < d {
        "bearish crossover"
    } else {
        "neutral"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_at_top_of_range_is_overbought() {
        let highs: Vec<f64> = (0..20).map(|i| 101.0 + i as f64).collect();
        let lows: Vec<f64> = (0..20).map(|i| 99.0 + i as f64).collect();
        let closes: Vec<f64> = highs.clone();
        let r = calculate(&highs, &lows, &closes, 14, 3);
        assert!((r.k - 100.0).abs() < 1e-12);
        assert_eq!(r.d, r.k);
        assert_eq!(r.interpretation, "overbought");
    }

    #[test]
    fn close_at_bottom_of_range_is_oversold() {
        let highs = vec![110.0; 14];
        let lows = vec![90.0; 14];
        let mut closes = vec![100.0; 14];
        closes[13] = 90.0;
        let r = calculate(&highs, &lows, &closes, 14, 3);
        assert_eq!(r.k, 0.0);
        assert_eq!(r.interpretation, "oversold");
    }

    #[test]
    fn flat_window_reads_fifty() {
        let flat = vec![100.0; 20];
        let r = calculate(&flat, &flat, &flat, 14, 3);
        assert_eq!(r.k, 50.0);
        assert_eq!(r.interpretation, "neutral");
    }

    #[test]
    fn insufficient_data_default() {
        let v = vec![1.0; 5];
        let r = calculate(&v, &v, &v, 14, 3);
        assert_eq!(r.interpretation, INSUFFICIENT_DATA);
        assert_eq!((r.k, r.d), (50.0, 50.0));
    }
}
