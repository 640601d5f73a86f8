// =============================================================================
// Parabolic SAR
// =============================================================================
//
// Wilder's stop-and-reverse:
//   SAR_t = SAR_{t-1} + AF * (EP - SAR_{t-1})
// In an uptrend the SAR may not rise above the two previous lows (downtrend:
// not below the two previous highs).  When price pierces the SAR the trend
// flips, SAR resets to the extreme point and AF resets to `step`.  AF grows
// by `step` on every new extreme, up to `max_step`.

use super::reading::{Direction, DirectionalReading};

pub const LABELS: &[&str] = &["bullish reversal", "bearish reversal", "bullish", "bearish"];

pub fn calculate(highs: &[f64], lows: &[f64], step: f64, max_step: f64) -> DirectionalReading {
    let len = highs.len();
    if len < 2 {
        let value = lows.first().copied().unwrap_or(0.0);
        return DirectionalReading {
            value,
            trend: Direction::Up,
            interpretation: "bullish",
        };
    }

    let mut is_long = highs[1] >= highs[0];
    let mut af = step;
    let mut ep = if is_long { highs[0] } else { lows[0] };
    let mut sar = if is_long { lows[0] } else { highs[0] };
    let mut flipped = false;

    for i in 1..len {
        flipped = false;
        sar += af * (ep - sar);

        if is_long {
            sar = sar.min(lows[i - 1]);
            if i >= 2 {
                sar = sar.min(lows[i - 2]);
            }

            if lows[i] < sar {
                is_long = false;
                flipped = true;
                sar = ep;
                ep = lows[i];
                af = step;
            } else if highs[i] > ep {
                ep = highs[i];
                af = (af + step).min(max_step);
            }
        } else {
            sar = sar.max(highs[i - 1]);
            if i >= 2 {
                sar = sar.max(highs[i - 2]);
            }

            if highs[i] > sar {
                is_long = true;
                flipped = true;
                sar = ep;
                ep = highs[i];
                af = step;
            } else if lows[i] < ep {
                ep = lows[i];
                af = (af + step).min(max_step);
            }
        }
    }

    let (trend, interpretation) = match (is_long, flipped) {
        (true, true) => (Direction::Up, "bullish reversal"),
        (false, true) => (Direction::Down, "bearish reversal"),
        (true, false) => (Direction::Up, "bullish"),
        (false, false) => (Direction::Down, "bearish"),
    };

    DirectionalReading {
        value: sar,
        trend,
        interpretation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptrend_keeps_sar_below_price() {
        let highs: Vec<f64> = (0..30).map(|i| 101.0 + i as f64).collect();
        let lows: Vec<f64> = (0..30).map(|i| 99.0 + i as f64).collect();
        let r = calculate(&highs, &lows, 0.02, 0.2);
        assert_eq!(r.trend, Direction::Up);
        assert_eq!(r.interpretation, "bullish");
        assert!(r.value < lows[29]);
    }

    #[test]
    fn downtrend_keeps_sar_above_price() {
        let highs: Vec<f64> = (0..30).map(|i| 131.0 - i as f64).collect();
        let lows: Vec<f64> = (0..30).map(|i| 129.0 - i as f64).collect();
        let r = calculate(&highs, &lows, 0.02, 0.2);
        assert_eq!(r.trend, Direction::Down);
        assert!(r.value > highs[29]);
    }

    #[test]
    fn crash_after_rally_flips_to_bearish_reversal() {
        let mut highs: Vec<f64> = (0..20).map(|i| 101.0 + i as f64).collect();
        let mut lows: Vec<f64> = (0..20).map(|i| 99.0 + i as f64).collect();
        highs.push(100.0);
        lows.push(80.0);
        let r = calculate(&highs, &lows, 0.02, 0.2);
        assert_eq!(r.trend, Direction::Down);
        assert_eq!(r.interpretation, "bearish reversal");
        // SAR resets to the prior extreme point (highest high)
        assert_eq!(r.value, 120.0);
    }
}
