// =============================================================================
// Supertrend
// =============================================================================
//
// Bands around the bar midpoint, ATR from the seed-first EMA of True Range:
//   basic_upper = (H + L) / 2 + multiplier * ATR
//   basic_lower = (H + L) / 2 - multiplier * ATR
// Final bands only ratchet toward price (upper never rises while the previous
// close stays below it, lower never falls while the previous close stays
// above it).  A close above the final upper band turns the trend up, a close
// below the final lower band turns it down.  The reported value is the active
// band: lower in an uptrend, upper in a downtrend.

use super::atr::atr_series;
use super::reading::{Direction, DirectionalReading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "bullish reversal",
    "bearish reversal",
    "bullish",
    "bearish",
    INSUFFICIENT_DATA,
];

pub fn calculate(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    multiplier: f64,
) -> DirectionalReading {
    let len = closes.len();
    if period == 0 || len <= period {
        let last = closes.last().copied().unwrap_or(0.0);
        let prev = if len >= 2 { closes[len - 2] } else { last };
        return DirectionalReading {
            value: last,
            trend: if last >= prev { Direction::Up } else { Direction::Down },
            interpretation: INSUFFICIENT_DATA,
        };
    }

    let atr = atr_series(highs, lows, closes, period);

    let first = period;
    let hl2 = (highs[first] + lows[first]) / 2.0;
    let mut final_upper = hl2 + multiplier * atr[first];
    let mut final_lower = hl2 - multiplier * atr[first];
    let mut is_up = closes[first] >= hl2;
    let mut flipped = false;

    for i in (first + 1)..len {
        let hl2 = (highs[i] + lows[i]) / 2.0;
        let basic_upper = hl2 + multiplier * atr[i];
        let basic_lower = hl2 - multiplier * atr[i];

        final_upper = if basic_upper < final_upper || closes[i - 1] > final_upper {
            basic_upper
        } else {
            final_upper
        };
        final_lower = if basic_lower > final_lower || closes[i - 1] < final_lower {
            basic_lower
        } else {
            final_lower
        };

        flipped = false;
        if is_up && closes[i] < final_lower {
            is_up = false;
            flipped = true;
        } else if !is_up && closes[i] > final_upper {
            is_up = true;
            flipped = true;
        }
    }

    let value = if is_up { final_lower } else { final_upper };
    let (trend, interpretation) = match (is_up, flipped) {
        (true, true) => (Direction::Up, "bullish reversal"),
        (false, true) => (Direction::Down, "bearish reversal"),
        (true, false) => (Direction::Up, "bullish"),
        (false, false) => (Direction::Down, "bearish"),
    };

    DirectionalReading {
        value,
        trend,
        interpretation,
    }
}
