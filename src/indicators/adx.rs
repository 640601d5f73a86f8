// =============================================================================
// Average Directional Index (ADX) — windowed, clamped
// =============================================================================
//
// Over the last `period` bar-to-bar transitions:
//
//   1. Accumulate +DM, -DM and True Range.
//   2. +DI = min(65, ΣDM+ / ΣTR * 100)
//      -DI = min(65, ΣDM- / ΣTR * 100)
//   3. ADX = clamp(|+DI - -DI| / (+DI + -DI) * 100, 15, 65)
//
// Both DIs are capped at 65 and ADX lives in [15, 65]; this is a bounded
// trend-strength score rather than Wilder's unbounded ADX.
//
// Interpretation:
//   ADX >= 25 => strong trend (direction from the dominant DI)
//   ADX >= 20 => developing trend
//   otherwise => weak trend
// =============================================================================

use serde::Serialize;

use super::common::safe_divide;
use super::reading::{Reading, INSUFFICIENT_DATA};

const DI_CAP: f64 = 65.0;
const ADX_FLOOR: f64 = 15.0;
const ADX_CAP: f64 = 65.0;

pub const LABELS: &[&str] = &[
    "strong uptrend",
    "strong downtrend",
    "developing trend",
    "weak trend",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdxReading {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub interpretation: &'static str,
}

impl Reading for AdxReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("adx", self.adx),
            ("plus_di", self.plus_di),
            ("minus_di", self.minus_di),
        ]
    }
}

/// Compute the ADX reading from the last `period` transitions.
///
/// Needs `period + 1` candles; otherwise returns the floor value with an
/// "insufficient data" interpretation.
pub fn calculate(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> AdxReading {
    let n = closes.len();
    if period == 0 || n <= period {
        return AdxReading {
            adx: ADX_FLOOR,
            plus_di: 0.0,
            minus_di: 0.0,
            interpretation: INSUFFICIENT_DATA,
        };
    }

    let mut sum_plus_dm = 0.0;
    let mut sum_minus_dm = 0.0;
    let mut sum_tr = 0.0;

    for i in (n - period)..n {
        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];

        if up_move > down_move && up_move > 0.0 {
            sum_plus_dm += up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            sum_minus_dm += down_move;
        }

        let prev_close = closes[i - 1];
        sum_tr += (highs[i] - lows[i])
            .max((highs[i] - prev_close).abs())
            .max((lows[i] - prev_close).abs());
    }

    let plus_di = (safe_divide(sum_plus_dm, sum_tr, 0.0) * 100.0).min(DI_CAP);
    let minus_di = (safe_divide(sum_minus_dm, sum_tr, 0.0) * 100.0).min(DI_CAP);

    let di_sum = plus_di + minus_di;
    let denominator = if di_sum == 0.0 { 1.0 } else { di_sum };
    let dx = safe_divide((plus_di - minus_di).abs(), denominator, 0.0) * 100.0;
    let adx = dx.max(ADX_FLOOR).min(ADX_CAP);

    AdxReading {
        adx,
        plus_di,
        minus_di,
        interpretation: interpret(adx, plus_di, minus_di),
    }
}

fn interpret(adx: f64, plus_di: f64, minus_di: f64) -> &'static str {
    if adx >= 25.0 {
        if plus_di >= minus_di {
            "strong uptrend"
        } else {
            "strong downtrend"
        }
    } else if adx >= 20.0 {
        "developing trend"
    } else {
        "weak trend"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(candles: &[(f64, f64, f64)]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            candles.iter().map(|c| c.0).collect(),
            candles.iter().map(|c| c.1).collect(),
            candles.iter().map(|c| c.2).collect(),
        )
    }

    #[test]
    fn adx_period_zero() {
        let (h, l, c) = split(&[(2.0, 0.5, 1.5); 50]);
        assert_eq!(calculate(&h, &l, &c, 0).interpretation, INSUFFICIENT_DATA);
    }

    #[test]
    fn adx_insufficient_data() {
        let (h, l, c) = split(&[(2.0, 0.5, 1.5); 10]);
        let r = calculate(&h, &l, &c, 14);
        assert_eq!(r.interpretation, INSUFFICIENT_DATA);
        assert_eq!(r.adx, ADX_FLOOR);
    }

    #[test]
    fn adx_strong_uptrend_is_capped() {
        let candles: Vec<(f64, f64, f64)> = (0..60)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                (base + 1.5, base - 0.5, base + 1.0)
            })
            .collect();
        let (h, l, c) = split(&candles);
        let r = calculate(&h, &l, &c, 14);
        assert!(r.plus_di <= DI_CAP);
        assert_eq!(r.minus_di, 0.0);
        assert_eq!(r.adx, ADX_CAP);
        assert_eq!(r.interpretation, "strong uptrend");
    }

    #[test]
    fn adx_flat_market_sits_on_floor() {
        let (h, l, c) = split(&[(101.0, 99.0, 100.0); 60]);
        let r = calculate(&h, &l, &c, 14);
        assert_eq!(r.adx, ADX_FLOOR);
        assert_eq!(r.interpretation, "weak trend");
    }

    #[test]
    fn adx_zero_range_does_not_divide_by_zero() {
        let (h, l, c) = split(&[(100.0, 100.0, 100.0); 30]);
        let r = calculate(&h, &l, &c, 14);
        assert!(r.values().iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn adx_result_range() {
        let candles: Vec<(f64, f64, f64)> = (0..100)
            .map(|i| {
                let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
                (base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        let (h, l, c) = split(&candles);
        let r = calculate(&h, &l, &c, 14);
        assert!((ADX_FLOOR..=ADX_CAP).contains(&r.adx));
        assert!(LABELS.contains(&r.interpretation));
    }
}
