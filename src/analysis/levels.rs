// =============================================================================
// Support / Resistance levels
// =============================================================================
//
// A candle's low is a support candidate when it is <= the lows of the two
// candles on each side; its high is a resistance candidate when it is >= the
// highs on each side.  Candidates are deduplicated, kept only if strictly
// below (supports) or above (resistances) the current price, sorted nearest
// first and truncated to MAX_LEVELS.
//
// When fewer than two levels survive on a side, that side is replaced by
// synthetic levels at fixed offsets from the current price.
// =============================================================================

use serde::Serialize;

use crate::indicators::common::round_to;

pub const MAX_LEVELS: usize = 3;

/// Neighbours required on each side of a swing point.
const SWING_WINDOW: usize = 2;

const SYNTHETIC_OFFSETS: [f64; 3] = [0.05, 0.10, 0.15];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Levels {
    /// Strictly below price, nearest first.
    pub supports: Vec<f64>,
    /// Strictly above price, nearest first.
    pub resistances: Vec<f64>,
}

pub fn find_levels(highs: &[f64], lows: &[f64], price: f64) -> Levels {
    let mut support_candidates = Vec::new();
    let mut resistance_candidates = Vec::new();

    let n = highs.len().min(lows.len());
    if n > 2 * SWING_WINDOW {
        for i in SWING_WINDOW..n - SWING_WINDOW {
            let window = i - SWING_WINDOW..=i + SWING_WINDOW;
            if window.clone().all(|j| lows[i] <= lows[j]) {
                support_candidates.push(lows[i]);
            }
            if window.clone().all(|j| highs[i] >= highs[j]) {
                resistance_candidates.push(highs[i]);
            }
        }
    }

    let mut supports = nearest(support_candidates, |l| l < price, |a, b| b.total_cmp(a));
    let mut resistances = nearest(resistance_candidates, |l| l > price, |a, b| a.total_cmp(b));

    if supports.len() < 2 {
        supports = synthetic(price, -1.0, |l| l < price);
    }
    if resistances.len() < 2 {
        resistances = synthetic(price, 1.0, |l| l > price);
    }

    Levels {
        supports,
        resistances,
    }
}

fn nearest(
    mut levels: Vec<f64>,
    keep: impl Fn(f64) -> bool,
    order: impl Fn(&f64, &f64) -> std::cmp::Ordering,
) -> Vec<f64> {
    levels.retain(|&l| keep(l));
    levels.sort_by(&order);
    levels.dedup_by(|a, b| round_to(*a, 8) == round_to(*b, 8));
    levels.truncate(MAX_LEVELS);
    levels
}

fn synthetic(price: f64, sign: f64, keep: impl Fn(f64) -> bool) -> Vec<f64> {
    SYNTHETIC_OFFSETS
        .iter()
        .map(|offset| price * (1.0 + sign * offset))
        .filter(|&l| keep(l))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Oscillating series with swing lows at 90/92/94/96 and swing highs at
    /// 110/108/106/104 (centre candles of each 5-bar leg).
    fn zigzag() -> (Vec<f64>, Vec<f64>) {
        let mut highs = Vec::new();
        let mut lows = Vec::new();
        for leg in 0..4 {
            let trough = 90.0 + 2.0 * leg as f64;
            let peak = 110.0 - 2.0 * leg as f64;
            for (h, l) in [
                (peak, 100.0),
                (102.0, 98.0),
                (101.0, trough),
                (102.0, 98.0),
                (101.0, 99.0),
            ] {
                highs.push(h);
                lows.push(l);
            }
        }
        (highs, lows)
    }

    #[test]
    fn swing_points_sorted_nearest_first() {
        let (highs, lows) = zigzag();
        let levels = find_levels(&highs, &lows, 100.0);
        assert_eq!(levels.supports, vec![96.0, 94.0, 92.0]);
        assert_eq!(levels.resistances, vec![104.0, 106.0, 108.0]);
    }

    #[test]
    fn flat_series_synthesises_offsets() {
        let flat = vec![100.0; 30];
        let levels = find_levels(&flat, &flat, 100.0);
        assert_eq!(levels.supports.len(), 3);
        assert!((levels.supports[0] - 95.0).abs() < 1e-9);
        assert!((levels.supports[2] - 85.0).abs() < 1e-9);
        assert!((levels.resistances[0] - 105.0).abs() < 1e-9);
        assert!((levels.resistances[2] - 115.0).abs() < 1e-9);
    }

    #[test]
    fn zero_price_yields_no_levels() {
        let zeros = vec![0.0; 10];
        let levels = find_levels(&zeros, &zeros, 0.0);
        assert!(levels.supports.is_empty());
        assert!(levels.resistances.is_empty());
    }

    #[test]
    fn levels_are_strictly_on_their_side() {
        let (highs, lows) = zigzag();
        let levels = find_levels(&highs, &lows, 95.0);
        assert!(levels.supports.iter().all(|&s| s < 95.0));
        assert!(levels.resistances.iter().all(|&r| r > 95.0));
        assert!(levels.supports.len() <= MAX_LEVELS);
    }
}
