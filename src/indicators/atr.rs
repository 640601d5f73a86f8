// =============================================================================
// Average True Range (ATR)
// =============================================================================
//
// True Range for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR = EmaSeedFirst(TR series, period), read at the latest bar.
//
// Reported alongside ATR as a percentage of the latest close, which is what
// the volatility interpretation keys on.
// =============================================================================

use serde::Serialize;

use super::common::{safe_divide, true_ranges};
use super::ema::{ema_seed_first, ema_seed_first_series};
use super::reading::{Reading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "high volatility",
    "moderate volatility",
    "low volatility",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtrReading {
    pub value: f64,
    pub percent: f64,
    pub interpretation: &'static str,
}

impl Reading for AtrReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![("value", self.value), ("percent", self.percent)]
    }
}

/// Latest ATR, `None` with fewer than `period + 1` candles.
pub fn atr_value(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }
    ema_seed_first(&true_ranges(highs, lows, closes), period)
}

/// ATR series aligned with the candles: element `i` is the ATR after candle
/// `i`, element 0 is the first candle's own range.
pub fn atr_series(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    if closes.is_empty() {
        return Vec::new();
    }
    let mut tr = Vec::with_capacity(closes.len());
    tr.push(highs[0] - lows[0]);
    tr.extend(true_ranges(highs, lows, closes));
    ema_seed_first_series(&tr, period)
}

pub fn calculate(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> AtrReading {
    let Some(value) = atr_value(highs, lows, closes, period) else {
        return AtrReading {
            value: 0.0,
            percent: 0.0,
            interpretation: INSUFFICIENT_DATA,
        };
    };

    let last_close = closes.last().copied().unwrap_or(0.0);
    let percent = safe_divide(value, last_close, 0.0) * 100.0;

    AtrReading {
        value,
        percent,
        interpretation: interpret(percent),
    }
}

fn interpret(percent: f64) -> &'static str {
    if percent > 5.0 {
        "high volatility"
    } else if percent > 2.0 {
        "moderate volatility"
    } else {
        "low volatility"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ohlc(candles: &[(f64, f64, f64)]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            candles.iter().map(|c| c.0).collect(),
            candles.iter().map(|c| c.1).collect(),
            candles.iter().map(|c| c.2).collect(),
        )
    }

    #[test]
    fn atr_insufficient_data() {
        let (h, l, c) = ohlc(&[(105.0, 95.0, 102.0); 10]);
        let r = calculate(&h, &l, &c, 14);
        assert_eq!(r.interpretation, INSUFFICIENT_DATA);
        assert_eq!(r.value, 0.0);
    }

    #[test]
    fn atr_constant_range_converges() {
        let candles: Vec<(f64, f64, f64)> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.1;
                (base + 5.0, base - 5.0, base)
            })
            .collect();
        let (h, l, c) = ohlc(&candles);
        let r = calculate(&h, &l, &c, 14);
        assert!((r.value - 10.0).abs() < 1.0, "expected ATR near 10, got {}", r.value);
        assert_eq!(r.interpretation, "high volatility");
    }

    #[test]
    fn atr_seeds_from_first_true_range() {
        let (h, l, c) = ohlc(&[
            (105.0, 95.0, 95.0),
            (115.0, 108.0, 112.0),
            (118.0, 110.0, 115.0),
            (120.0, 113.0, 118.0),
        ]);
        // TRs: 20, 8, 7; k = 0.5
        let expected = ((7.0 - ((8.0 - 20.0) * 0.5 + 20.0)) * 0.5) + ((8.0 - 20.0) * 0.5 + 20.0);
        let value = atr_value(&h, &l, &c, 3).unwrap();
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn atr_low_volatility_label() {
        let (h, l, c) = ohlc(&[(100.5, 99.5, 100.0); 30]);
        let r = calculate(&h, &l, &c, 14);
        assert!((r.percent - 1.0).abs() < 1e-9);
        assert_eq!(r.interpretation, "low volatility");
    }

    #[test]
    fn atr_series_is_aligned_with_candles() {
        let (h, l, c) = ohlc(&[(105.0, 95.0, 100.0); 12]);
        let series = atr_series(&h, &l, &c, 5);
        assert_eq!(series.len(), 12);
        assert!(series.iter().all(|v| (v - 10.0).abs() < 1e-12));
    }
}
