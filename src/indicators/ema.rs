// =============================================================================
// Exponential Moving Average (EMA) — two seeding rules
// =============================================================================
//
// multiplier k = 2 / (period + 1)
// EMA_t        = (price_t - EMA_{t-1}) * k + EMA_{t-1}
//
// The engine uses two distinct primitives and never mixes them:
//
//   EmaSeedFirst — seeded with the first data point and updated on every
//                  subsequent point, including those before `period` samples
//                  have accumulated.  Defined for any non-empty input, even
//                  when period > len.  Used by MACD, ATR, TRIX, Supertrend and
//                  trend classification.
//
//   EmaSeedSma   — seeded with the SMA of the first `period` values; needs at
//                  least `period` values.  Used by the multi-period moving
//                  average block, Keltner Channels and Elder Ray.
// =============================================================================

/// Full seed-first EMA series; one output per input value.
///
/// Empty input or `period == 0` => empty vec.
pub fn ema_seed_first_series(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&seed) = values.first() else {
        return Vec::new();
    };
    if period == 0 {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    let mut ema = seed;
    result.push(ema);
    for &price in &values[1..] {
        ema = (price - ema) * k + ema;
        result.push(ema);
    }
    result
}

/// Latest seed-first EMA value, `None` for empty input or `period == 0`.
pub fn ema_seed_first(values: &[f64], period: usize) -> Option<f64> {
    ema_seed_first_series(values, period).last().copied()
}

/// SMA-seeded EMA series.
///
/// Each output element corresponds to an input starting at index `period - 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `values.len() < period` => empty vec
/// - A non-finite intermediate value stops the series.
pub fn ema_seed_sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let sma: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !sma.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(sma);

    let mut prev_ema = sma;
    for &value in &values[period..] {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev_ema = ema;
    }

    result
}
