// =============================================================================
// Shared numeric primitives
// =============================================================================
//
// Every calculator that divides goes through `safe_divide`, so the zero-guard
// policy is auditable in one place: a zero (or non-finite) denominator, or a
// non-finite quotient, yields the caller-supplied fallback.

use crate::error::AnalysisError;

/// `numerator / denominator`, or `fallback` when the division is undefined.
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return fallback;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        fallback
    }
}

/// Round to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Simple moving average of the last `period` values.
///
/// Strict: fails with `InsufficientData` when fewer than `period` values exist
/// (or `period == 0`).
pub fn sma(values: &[f64], period: usize) -> Result<f64, AnalysisError> {
    if period == 0 || values.len() < period {
        return Err(AnalysisError::InsufficientData {
            needed: period.max(1),
            available: values.len(),
        });
    }
    let window = &values[values.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}

/// Mean of the last `period` values, or of all values when fewer exist.
///
/// This is the lenient average used for the single-sample smoothing lines
/// (Stochastic %D, OBV signal): over a one-element input it returns that
/// element.  Empty input yields 0.
pub fn trailing_mean(values: &[f64], period: usize) -> f64 {
    let take = period.max(1).min(values.len());
    if take == 0 {
        return 0.0;
    }
    let window = &values[values.len() - take..];
    safe_divide(window.iter().sum::<f64>(), take as f64, 0.0)
}

/// Population standard deviation of `window` around `mean`.
pub fn population_std_dev(window: &[f64], mean: f64) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / window.len() as f64;
    variance.sqrt()
}

/// Highest value among the last `period` elements (all elements when fewer).
pub fn highest(values: &[f64], period: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let start = values.len().saturating_sub(period);
    values[start..].iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Lowest value among the last `period` elements (all elements when fewer).
pub fn lowest(values: &[f64], period: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let start = values.len().saturating_sub(period);
    values[start..].iter().copied().fold(f64::INFINITY, f64::min)
}

/// True Range series; element `i` pairs candle `i + 1` with the close of
/// candle `i`, so the output has `len - 1` elements.
pub fn true_ranges(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    (1..closes.len())
        .map(|i| {
            let prev_close = closes[i - 1];
            (highs[i] - lows[i])
                .max((highs[i] - prev_close).abs())
                .max((lows[i] - prev_close).abs())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_divide_guards_zero_and_non_finite() {
        assert_eq!(safe_divide(1.0, 0.0, 7.0), 7.0);
        assert_eq!(safe_divide(1.0, f64::NAN, 7.0), 7.0);
        assert_eq!(safe_divide(f64::INFINITY, 1.0, 7.0), 7.0);
        assert_eq!(safe_divide(6.0, 3.0, 7.0), 2.0);
    }

    #[test]
    fn round_to_eight_places() {
        assert_eq!(round_to(0.123456789123, 8), 0.12345679);
        assert_eq!(round_to(-1.5, 0), -2.0);
    }

    #[test]
    fn sma_is_strict() {
        assert_eq!(
            sma(&[1.0, 2.0], 3),
            Err(AnalysisError::InsufficientData {
                needed: 3,
                available: 2
            })
        );
        assert!(sma(&[1.0], 0).is_err());
        assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 2), Ok(3.5));
    }

    #[test]
    fn trailing_mean_degenerates_to_single_value() {
        assert_eq!(trailing_mean(&[42.0], 3), 42.0);
        assert_eq!(trailing_mean(&[1.0, 2.0, 3.0, 4.0], 2), 3.5);
        assert_eq!(trailing_mean(&[], 3), 0.0);
    }

    #[test]
    fn std_dev_of_constant_window_is_zero() {
        assert_eq!(population_std_dev(&[5.0; 10], 5.0), 0.0);
        let sd = population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0);
        assert!((sd - 2.0).abs() < 1e-12);
    }

    #[test]
    fn highest_and_lowest_use_trailing_window() {
        let v = [9.0, 1.0, 5.0, 3.0, 4.0];
        assert_eq!(highest(&v, 3), 5.0);
        assert_eq!(lowest(&v, 3), 3.0);
        assert_eq!(highest(&v, 50), 9.0);
        assert_eq!(lowest(&v, 50), 1.0);
        assert_eq!(highest(&[], 3), 0.0);
        assert_eq!(lowest(&[], 3), 0.0);
    }

    #[test]
    fn true_ranges_skip_first_candle() {
        let highs = [105.0, 115.0];
        let lows = [95.0, 108.0];
        let closes = [95.0, 112.0];
        assert_eq!(true_ranges(&highs, &lows, &closes), vec![20.0]);
    }
}
