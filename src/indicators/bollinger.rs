// =============================================================================
// Bollinger Bands
// =============================================================================
//
//   middle    = SMA(period)
//   sd        = population standard deviation of the last `period` closes
//   upper     = max(middle + k*sd, middle * 1.001)
//   lower     = max(middle - k*sd, 0)
//   bandwidth = (upper - lower) / middle * 100
//   percent_b = (close - lower) / (upper - lower) * 100, reported in [0, 100]
//
// The upper band never collapses onto the middle band, and the lower band is
// floored at zero because prices never go negative.

use serde::Serialize;

use super::common::{population_std_dev, safe_divide, sma};
use super::reading::{Reading, INSUFFICIENT_DATA};

/// Bandwidth (%) below which the bands count as a squeeze.
const SQUEEZE_BANDWIDTH: f64 = 2.0;

pub const LABELS: &[&str] = &[
    "overbought",
    "oversold",
    "squeeze",
    "upper half",
    "lower half",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerReading {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub bandwidth: f64,
    pub percent_b: f64,
    pub interpretation: &'static str,
}

impl Reading for BollingerReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("upper", self.upper),
            ("middle", self.middle),
            ("lower", self.lower),
            ("bandwidth", self.bandwidth),
            ("percent_b", self.percent_b),
        ]
    }
}

pub fn calculate(closes: &[f64], period: usize, num_std: f64) -> BollingerReading {
    let last_close = closes.last().copied().unwrap_or(0.0);

    let Ok(middle) = sma(closes, period) else {
        let (upper, lower) = (last_close * 1.001, last_close);
        return BollingerReading {
            upper,
            middle: last_close,
            lower,
            bandwidth: safe_divide(upper - lower, last_close, 0.0) * 100.0,
            percent_b: 50.0,
            interpretation: INSUFFICIENT_DATA,
        };
    };

    let window = &closes[closes.len() - period..];
    let sd = population_std_dev(window, middle);

    let upper = (middle + num_std * sd).max(middle * 1.001);
    let lower = (middle - num_std * sd).max(0.0);
    let bandwidth = safe_divide(upper - lower, middle, 0.0) * 100.0;
    let raw_percent_b = safe_divide(last_close - lower, upper - lower, 0.5) * 100.0;

    BollingerReading {
        upper,
        middle,
        lower,
        bandwidth,
        percent_b: raw_percent_b.clamp(0.0, 100.0),
        interpretation: interpret(last_close, upper, lower, bandwidth, raw_percent_b),
    }
}

fn interpret(close: f64, upper: f64, lower: f64, bandwidth: f64, percent_b: f64) -> &'static str {
    if close > upper {
        "overbought"
    } else if close < lower {
        "oversold"
    } else if bandwidth < SQUEEZE_BANDWIDTH {
        "squeeze"
    } else if percent_b >= 50.0 {
        "upper half"
    } else {
        "lower half"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bb = calculate(&closes, 20, 2.0);
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert!(bb.bandwidth > 0.0);
        assert!((bb.middle - 10.5).abs() < 1e-12);
        assert_eq!(bb.interpretation, "upper half");
    }

    #[test]
    fn bollinger_flat_series() {
        let bb = calculate(&[100.0; 30], 20, 2.0);
        assert!((bb.middle - 100.0).abs() < 1e-12);
        assert!((bb.upper - 100.1).abs() < 1e-9);
        assert!((bb.lower - 100.0).abs() < 1e-12);
        assert!(bb.upper >= 100.1 - 1e-9);
        assert_eq!(bb.percent_b, 0.0);
        assert_eq!(bb.interpretation, "squeeze");
    }

    #[test]
    fn lower_band_floored_at_zero() {
        let mut closes = vec![0.01; 19];
        closes.push(100.0);
        let bb = calculate(&closes, 20, 2.0);
        assert_eq!(bb.lower, 0.0);
    }

    #[test]
    fn breakout_clamps_percent_b() {
        let mut closes = vec![100.0; 19];
        closes.push(130.0);
        let bb = calculate(&closes, 20, 2.0);
        assert_eq!(bb.interpretation, "overbought");
        assert_eq!(bb.percent_b, 100.0);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bb = calculate(&[1.0, 2.0, 3.0], 20, 2.0);
        assert_eq!(bb.interpretation, INSUFFICIENT_DATA);
        assert_eq!(bb.middle, 3.0);
        assert!(bb.values().iter().all(|(_, v)| v.is_finite()));
    }
}
