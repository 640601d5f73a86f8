// =============================================================================
// Multi-period moving averages
// =============================================================================
//
// For each configured period (default 9/20/50/100/200) report the SMA and the
// SMA-seeded EMA of the closes.  Periods longer than the series are omitted.
//
// Interpretation (first match wins):
//   price above every average => "bullish alignment"
//   price below every average => "bearish alignment"
//   SMA50 vs SMA200 available  => "golden cross" / "death cross"
//   otherwise                  => "mixed"

use serde::Serialize;

use super::common::sma;
use super::ema::ema_seed_sma;
use super::reading::{Reading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "bullish alignment",
    "bearish alignment",
    "golden cross",
    "death cross",
    "mixed",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MovingAverage {
    pub period: usize,
    pub sma: f64,
    pub ema: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAveragesReading {
    pub averages: Vec<MovingAverage>,
    pub interpretation: &'static str,
}

impl MovingAveragesReading {
    pub fn get(&self, period: usize) -> Option<&MovingAverage> {
        self.averages.iter().find(|ma| ma.period == period)
    }
}

impl Reading for MovingAveragesReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        self.averages
            .iter()
            .flat_map(|ma| [("sma", ma.sma), ("ema", ma.ema)])
            .collect()
    }
}

pub fn calculate(closes: &[f64], periods: &[usize]) -> MovingAveragesReading {
    let averages: Vec<MovingAverage> = periods
        .iter()
        .filter_map(|&period| {
            let sma = sma(closes, period).ok()?;
            let ema = *ema_seed_sma(closes, period).last()?;
            Some(MovingAverage { period, sma, ema })
        })
        .collect();

    if averages.is_empty() {
        return MovingAveragesReading {
            averages,
            interpretation: INSUFFICIENT_DATA,
        };
    }

    let price = closes.last().copied().unwrap_or(0.0);
    let above_all = averages.iter().all(|ma| price > ma.sma && price > ma.ema);
    let below_all = averages.iter().all(|ma| price < ma.sma && price < ma.ema);

    let find_sma = |p: usize| averages.iter().find(|ma| ma.period == p).map(|ma| ma.sma);

    let interpretation = if above_all {
        "bullish alignment"
    } else if below_all {
        "bearish alignment"
    } else if let (Some(fast), Some(slow)) = (find_sma(50), find_sma(200)) {
        if fast > slow {
            "golden cross"
        } else {
            "death cross"
        }
    } else {
        "mixed"
    };

    MovingAveragesReading {
        averages,
        interpretation,
    }
}
