// =============================================================================
// Elder Ray Index
// =============================================================================
//
//   ema        = EmaSeedSma(closes, period)
//   bull_power = high - ema
//   bear_power = low  - ema
//
// Both powers positive: bulls dominate; both negative: bears dominate;
// otherwise the larger magnitude is in control.

use serde::Serialize;

use super::ema::ema_seed_sma;
use super::reading::{Reading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "bulls dominant",
    "bears dominant",
    "bulls in control",
    "bears in control",
    "neutral",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElderRayReading {
    pub ema: f64,
    pub bull_power: f64,
    pub bear_power: f64,
    pub interpretation: &'static str,
}

impl Reading for ElderRayReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("ema", self.ema),
            ("bull_power", self.bull_power),
            ("bear_power", self.bear_power),
        ]
    }
}

pub fn calculate(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> ElderRayReading {
    let Some(&ema) = ema_seed_sma(closes, period).last() else {
        let price = closes.last().copied().unwrap_or(0.0);
        return ElderRayReading {
            ema: price,
            bull_power: 0.0,
            bear_power: 0.0,
            interpretation: INSUFFICIENT_DATA,
        };
    };

    let high = highs.last().copied().unwrap_or(ema);
    let low = lows.last().copied().unwrap_or(ema);
    let bull_power = high - ema;
    let bear_power = low - ema;

    let interpretation = if bull_power > 0.0 && bear_power > 0.0 {
        "bulls dominant"
    } else if bull_power < 0.0 && bear_power < 0.0 {
        "bears dominant"
    } else if bull_power > bear_power.abs() {
        "bulls in control"
    } else if bear_power.abs() > bull_power {
        "bears in control"
    } else {
        "neutral"
    };

    ElderRayReading {
        ema,
        bull_power,
        bear_power,
        interpretation,
    }
}
