// =============================================================================
// Price channels — Keltner and Donchian
// =============================================================================
//
// Keltner:  middle = EmaSeedSma(closes, period)
//           upper  = middle + multiplier * ATR(period)
//           lower  = max(middle - multiplier * ATR(period), 0)
//
// Donchian: upper  = highest_high(period)
//           lower  = lowest_low(period)
//           middle = (upper + lower) / 2
//
// width = (upper - lower) / middle * 100 for both.

use serde::Serialize;

use super::atr::atr_value;
use super::common::{highest, lowest, safe_divide};
use super::ema::ema_seed_sma;
use super::reading::{Reading, INSUFFICIENT_DATA};

pub const KELTNER_LABELS: &[&str] = &[
    "breakout above channel",
    "breakdown below channel",
    "upper half",
    "lower half",
    INSUFFICIENT_DATA,
];

pub const DONCHIAN_LABELS: &[&str] = &[
    "at upper channel",
    "at lower channel",
    "upper half",
    "lower half",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelReading {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
    pub interpretation: &'static str,
}

impl ChannelReading {
    fn insufficient(price: f64) -> Self {
        Self {
            upper: price,
            middle: price,
            lower: price,
            width: 0.0,
            interpretation: INSUFFICIENT_DATA,
        }
    }
}

impl Reading for ChannelReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("upper", self.upper),
            ("middle", self.middle),
            ("lower", self.lower),
            ("width", self.width),
        ]
    }
}

pub fn keltner(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
    multiplier: f64,
) -> ChannelReading {
    let price = closes.last().copied().unwrap_or(0.0);
    let (Some(&middle), Some(atr)) = (
        ema_seed_sma(closes, period).last(),
        atr_value(highs, lows, closes, period),
    ) else {
        return ChannelReading::insufficient(price);
    };

    let upper = middle + multiplier * atr;
    let lower = (middle - multiplier * atr).max(0.0);

    let interpretation = if price > upper {
        "breakout above channel"
    } else if price < lower {
        "breakdown below channel"
    } else if price >= middle {
        "upper half"
    } else {
        "lower half"
    };

    ChannelReading {
        upper,
        middle,
        lower,
        width: safe_divide(upper - lower, middle, 0.0) * 100.0,
        interpretation,
    }
}

pub fn donchian(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> ChannelReading {
    let price = closes.last().copied().unwrap_or(0.0);
    if period == 0 || closes.len() < period {
        return ChannelReading::insufficient(price);
    }

    let upper = highest(highs, period);
    let lower = lowest(lows, period);
    let middle = (upper + lower) / 2.0;

    let interpretation = if price >= upper {
        "at upper channel"
    } else if price <= lower {
        "at lower channel"
    } else if price >= middle {
        "upper half"
    } else {
        "lower half"
    };

    ChannelReading {
        upper,
        middle,
        lower,
        width: safe_divide(upper - lower, middle, 0.0) * 100.0,
        interpretation,
    }
}
