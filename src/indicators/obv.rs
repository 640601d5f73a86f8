// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// Running sum starting at 0: +volume on an up-close, -volume on a down-close,
// unchanged on an equal close.  The signal is the SMA of the OBV series over
// `signal_period`; with fewer OBV points than that it is the mean of the
// latest single value, so OBV and signal coincide and the reading is flat.

use serde::Serialize;

use super::common::{sma, trailing_mean};
use super::reading::Reading;

pub const LABELS: &[&str] = &["accumulation", "distribution", "flat"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObvReading {
    pub value: f64,
    pub signal: f64,
    pub interpretation: &'static str,
}

impl Reading for ObvReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![("value", self.value), ("signal", self.signal)]
    }
}

pub fn obv_series(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let mut result = Vec::with_capacity(closes.len());
    let mut running = 0.0;
    for (i, &close) in closes.iter().enumerate() {
        if i > 0 {
            let prev = closes[i - 1];
            if close > prev {
                running += volumes[i];
            } else if close < prev {
                running -= volumes[i];
            }
        }
        result.push(running);
    }
    result
}

pub fn calculate(closes: &[f64], volumes: &[f64], signal_period: usize) -> ObvReading {
    let series = obv_series(closes, volumes);
    let value = series.last().copied().unwrap_or(0.0);
    let signal = sma(&series, signal_period)
        .unwrap_or_else(|_| trailing_mean(&series[series.len().saturating_sub(1)..], signal_period));

    let interpretation = if value > signal {
        "accumulation"
    } else if value < signal {
        "distribution"
    } else {
        "flat"
    };

    ObvReading {
        value,
        signal,
        interpretation,
    }
}
