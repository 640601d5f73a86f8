// =============================================================================
// Volume Profile & Market Profile
// =============================================================================
//
// Volume profile: the [lowest low, highest high] range is split into `bins`
// equal buckets and each candle's volume lands in the bucket holding its
// typical price.  The fullest bucket's midpoint is the high-volume node.
// Up-candles (close >= open) count as buying volume.
//
// Market profile: volume accumulated per price tick (typical price rounded to
// the tick grid).  The point of control (POC) is the tick with the most
// volume; the value area is the narrowest contiguous price span holding at
// least `value_area_pct` of the total volume.
//
// Tick size follows the price magnitude of the last close:
//   price >= 100  => 1.0
//   price >= 1    => 0.01
//   otherwise     => 10^(floor(log10(price)) - 2)

use std::collections::BTreeMap;

use serde::Serialize;

use super::common::safe_divide;
use super::reading::{Reading, INSUFFICIENT_DATA};

pub const VOLUME_LABELS: &[&str] = &["accumulation", "distribution", "balanced", INSUFFICIENT_DATA];

pub const MARKET_LABELS: &[&str] = &[
    "above value area",
    "below value area",
    "inside value area",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeProfileReading {
    pub high_volume_node: f64,
    pub buy_volume_pct: f64,
    pub total_volume: f64,
    pub interpretation: &'static str,
}

impl Reading for VolumeProfileReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("high_volume_node", self.high_volume_node),
            ("buy_volume_pct", self.buy_volume_pct),
            ("total_volume", self.total_volume),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketProfileReading {
    pub point_of_control: f64,
    pub value_area_high: f64,
    pub value_area_low: f64,
    pub tick_size: f64,
    pub interpretation: &'static str,
}

impl Reading for MarketProfileReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("point_of_control", self.point_of_control),
            ("value_area_high", self.value_area_high),
            ("value_area_low", self.value_area_low),
            ("tick_size", self.tick_size),
        ]
    }
}

pub fn volume_profile(
    highs: &[f64],
    lows: &[f64],
    opens: &[f64],
    closes: &[f64],
    volumes: &[f64],
    bins: usize,
) -> VolumeProfileReading {
    let price = closes.last().copied().unwrap_or(0.0);
    let total_volume: f64 = volumes.iter().sum();
    if bins == 0 || closes.is_empty() || total_volume <= 0.0 {
        return VolumeProfileReading {
            high_volume_node: price,
            buy_volume_pct: 50.0,
            total_volume: total_volume.max(0.0),
            interpretation: INSUFFICIENT_DATA,
        };
    }

    let low = lows.iter().copied().fold(f64::INFINITY, f64::min);
    let high = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_width = (high - low) / bins as f64;

    let mut buckets = vec![0.0; bins];
    let mut buy_volume = 0.0;
    for i in 0..closes.len() {
        let typical = (highs[i] + lows[i] + closes[i]) / 3.0;
        let idx = safe_divide(typical - low, bin_width, 0.0) as usize;
        buckets[idx.min(bins - 1)] += volumes[i];
        if closes[i] >= opens[i] {
            buy_volume += volumes[i];
        }
    }

    // First bucket wins ties.
    let mut node = 0;
    for (i, v) in buckets.iter().enumerate() {
        if *v > buckets[node] {
            node = i;
        }
    }

    let buy_volume_pct = safe_divide(buy_volume, total_volume, 0.5) * 100.0;
    let interpretation = if buy_volume_pct > 60.0 {
        "accumulation"
    } else if buy_volume_pct < 40.0 {
        "distribution"
    } else {
        "balanced"
    };

    VolumeProfileReading {
        high_volume_node: low + bin_width * (node as f64 + 0.5),
        buy_volume_pct,
        total_volume,
        interpretation,
    }
}

pub fn tick_size(price: f64) -> f64 {
    if price >= 100.0 {
        1.0
    } else if price >= 1.0 {
        0.01
    } else if price > 0.0 {
        10f64.powi(price.log10().floor() as i32 - 2)
    } else {
        0.01
    }
}

pub fn market_profile(
    typical_prices: &[f64],
    volumes: &[f64],
    last_close: f64,
    value_area_pct: f64,
) -> MarketProfileReading {
    let tick = tick_size(last_close);
    let insufficient = MarketProfileReading {
        point_of_control: last_close,
        value_area_high: last_close,
        value_area_low: last_close,
        tick_size: tick,
        interpretation: INSUFFICIENT_DATA,
    };

    let mut levels: BTreeMap<i64, f64> = BTreeMap::new();
    for (tp, v) in typical_prices.iter().zip(volumes) {
        if *v > 0.0 {
            *levels.entry((tp / tick).round() as i64).or_insert(0.0) += v;
        }
    }
    if levels.is_empty() {
        return insufficient;
    }

    let ladder: Vec<(i64, f64)> = levels.into_iter().collect();
    let total: f64 = ladder.iter().map(|(_, v)| v).sum();

    // Lowest price wins ties.
    let mut poc = ladder[0];
    for level in &ladder {
        if level.1 > poc.1 {
            poc = *level;
        }
    }

    let target = total * value_area_pct.clamp(0.0, 100.0) / 100.0;
    let (lo, hi) = narrowest_span(&ladder, target);

    let value_area_low = ladder[lo].0 as f64 * tick;
    let value_area_high = ladder[hi].0 as f64 * tick;
    let interpretation = if last_close > value_area_high {
        "above value area"
    } else if last_close < value_area_low {
        "below value area"
    } else {
        "inside value area"
    };

    MarketProfileReading {
        point_of_control: poc.0 as f64 * tick,
        value_area_high,
        value_area_low,
        tick_size: tick,
        interpretation,
    }
}

/// Two-pointer search for the narrowest run of ladder rungs whose volume
/// reaches `target`.  The full ladder always qualifies.
fn narrowest_span(ladder: &[(i64, f64)], target: f64) -> (usize, usize) {
    let mut best = (0, ladder.len() - 1);
    let mut sum = 0.0;
    let mut lo = 0;
    for hi in 0..ladder.len() {
        sum += ladder[hi].1;
        while lo < hi && sum - ladder[lo].1 >= target {
            sum -= ladder[lo].1;
            lo += 1;
        }
        if sum >= target && ladder[hi].0 - ladder[lo].0 < ladder[best.1].0 - ladder[best.0].0 {
            best = (lo, hi);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_follows_price_magnitude() {
        assert_eq!(tick_size(65_000.0), 1.0);
        assert_eq!(tick_size(2.5), 0.01);
        assert!((tick_size(0.05) - 0.0001).abs() < 1e-15);
        assert!((tick_size(0.000_012) - 1e-7).abs() < 1e-20);
    }

    #[test]
    fn poc_is_heaviest_level() {
        let tp = [100.0, 101.0, 102.0, 101.0, 103.0];
        let vol = [10.0, 50.0, 10.0, 40.0, 5.0];
        let r = market_profile(&tp, &vol, 101.0, 70.0);
        assert_eq!(r.point_of_control, 101.0);
        assert_eq!(r.interpretation, "inside value area");
    }

    #[test]
    fn value_area_is_narrowest_qualifying_span() {
        // total 200; 70% = 140 fits in 110..111 (150) rather than spreading out
        let tp = [100.0, 110.0, 111.0, 120.0];
        let vol = [25.0, 80.0, 70.0, 25.0];
        let r = market_profile(&tp, &vol, 125.0, 70.0);
        assert_eq!(r.value_area_low, 110.0);
        assert_eq!(r.value_area_high, 111.0);
        assert_eq!(r.interpretation, "above value area");
    }

    #[test]
    fn zero_volume_is_insufficient() {
        let r = market_profile(&[100.0, 101.0], &[0.0, 0.0], 101.0, 70.0);
        assert_eq!(r.interpretation, INSUFFICIENT_DATA);
        assert_eq!(r.point_of_control, 101.0);
    }

    #[test]
    fn up_candles_dominate_as_accumulation() {
        let opens = [10.0, 11.0, 12.0, 13.0];
        let closes = [11.0, 12.0, 13.0, 12.5];
        let highs = [11.5, 12.5, 13.5, 13.5];
        let lows = [9.5, 10.5, 11.5, 12.0];
        let vols = [100.0, 100.0, 100.0, 50.0];
        let r = volume_profile(&highs, &lows, &opens, &closes, &vols, 12);
        assert!((r.buy_volume_pct - 300.0 / 350.0 * 100.0).abs() < 1e-9);
        assert_eq!(r.interpretation, "accumulation");
        assert!(r.high_volume_node >= 9.5 && r.high_volume_node <= 13.5);
    }

    #[test]
    fn flat_range_collapses_into_first_bin() {
        let flat = [100.0; 5];
        let r = volume_profile(&flat, &flat, &flat, &flat, &[10.0; 5], 12);
        assert_eq!(r.high_volume_node, 100.0);
        assert_eq!(r.interpretation, "accumulation");
    }
}
