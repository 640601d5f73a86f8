// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing, capped at 85
// =============================================================================
//
// Step 1 — Price deltas from consecutive closes.
// Step 2 — Seed average gain / loss with the mean of the first `period`
//          gains / losses.
// Step 3 — Wilder's smoothing over every later delta:
//            avg_gain = (avg_gain * (period - 1) + gain) / period
//            avg_loss = (avg_loss * (period - 1) + loss) / period
// Step 4 — RS = avg_gain / avg_loss, RSI = 100 - 100 / (1 + RS)
//
// The reported value is min(RSI, 85): the ceiling is 85, not 100.
// Requires period + 1 closes; otherwise the neutral default 50 is returned.
// =============================================================================

use super::reading::{ScalarReading, INSUFFICIENT_DATA};

/// Upper bound of every reported RSI value.
pub const RSI_CEILING: f64 = 85.0;

pub const LABELS: &[&str] = &[
    "overbought",
    "oversold",
    "bullish momentum",
    "bearish momentum",
    "neutral",
    INSUFFICIENT_DATA,
];

/// Latest RSI reading for `closes`.
pub fn calculate(closes: &[f64], period: usize) -> ScalarReading {
    match rsi_value(closes, period) {
        Some(value) => ScalarReading::new(value, interpret(value)),
        None => ScalarReading::insufficient(50.0),
    }
}

/// Latest capped RSI value, `None` when there are fewer than `period + 1`
/// closes or `period == 0`.
pub fn rsi_value(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    for &delta in &deltas[period..] {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
    }

    Some(rsi_from_averages(avg_gain, avg_loss).min(RSI_CEILING))
}

fn interpret(value: f64) -> &'static str {
    if value >= 70.0 {
        "overbought"
    } else if value <= 30.0 {
        "oversold"
    } else if value >= 55.0 {
        "bullish momentum"
    } else if value <= 45.0 {
        "bearish momentum"
    } else {
        "neutral"
    }
}

/// Uncapped RSI from smoothed averages.
///
/// - Both averages zero => 50 (no movement).
/// - Zero average loss => 100 (only gains). Dividing by 1 instead would drag a
///   steadily rising series back toward 50.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        let rsi = 100.0 - 100.0 / (1.0 + rs);
        if rsi.is_finite() {
            rsi
        } else {
            50.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_period_zero() {
        assert!(rsi_value(&[1.0, 2.0, 3.0], 0).is_none());
    }

    #[test]
    fn rsi_insufficient_data_returns_neutral_default() {
        let reading = calculate(&[100.0, 101.0, 102.0], 14);
        assert_eq!(reading.value, 50.0);
        assert!(reading.interpretation.contains("insufficient data"));
    }

    #[test]
    fn rsi_needs_period_plus_one_closes() {
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(rsi_value(&closes, 14).is_none());
        let closes: Vec<f64> = (1..=15).map(|x| x as f64).collect();
        assert!(rsi_value(&closes, 14).is_some());
    }

    #[test]
    fn rsi_all_gains_saturates_at_ceiling() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let reading = calculate(&closes, 14);
        assert_eq!(reading.value, RSI_CEILING);
        assert_eq!(reading.interpretation, "overbought");
    }

    #[test]
    fn rsi_small_steady_gains_stay_above_seventy() {
        let closes: Vec<f64> = (0..20).map(|x| 1.0 + x as f64 * 0.001).collect();
        let value = rsi_value(&closes, 14).unwrap();
        assert!(value > 70.0, "got {value}");
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let reading = calculate(&closes, 14);
        assert!(reading.value.abs() < 1e-10);
        assert_eq!(reading.interpretation, "oversold");
    }

    #[test]
    fn rsi_flat_market_is_fifty() {
        let reading = calculate(&[100.0; 30], 14);
        assert!((reading.value - 50.0).abs() < 1e-10);
        assert_eq!(reading.interpretation, "neutral");
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let value = rsi_value(&closes, 14).unwrap();
        assert!((0.0..=RSI_CEILING).contains(&value), "RSI {value} out of range");
        assert!(LABELS.contains(&calculate(&closes, 14).interpretation));
    }
}
