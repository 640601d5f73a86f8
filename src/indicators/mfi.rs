// =============================================================================
// Money Flow Index (MFI)
// =============================================================================
//
// Raw money flow = typical_price * volume.  A bar whose typical price rises
// over the previous bar contributes positive flow, a falling bar negative
// flow.  Flows are summed over the full series (the period only gates the
// minimum amount of data):
//
//   MFI = 100 - 100 / (1 + Σpositive / Σnegative)
//
// No negative flow reads 100 (50 when there is no flow at all).

use super::common::safe_divide;
use super::reading::{ScalarReading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "overbought",
    "oversold",
    "buying pressure",
    "selling pressure",
    "neutral",
    INSUFFICIENT_DATA,
];

pub fn calculate(typical_prices: &[f64], volumes: &[f64], period: usize) -> ScalarReading {
    if period == 0 || typical_prices.len() <= period {
        return ScalarReading::insufficient(50.0);
    }

    let mut positive = 0.0;
    let mut negative = 0.0;
    for i in 1..typical_prices.len() {
        let flow = typical_prices[i] * volumes[i];
        if typical_prices[i] > typical_prices[i - 1] {
            positive += flow;
        } else if typical_prices[i] < typical_prices[i - 1] {
            negative += flow;
        }
    }

    let value = if positive == 0.0 && negative == 0.0 {
        50.0
    } else if negative == 0.0 {
        100.0
    } else {
        let ratio = safe_divide(positive, negative, 1.0);
        100.0 - safe_divide(100.0, 1.0 + ratio, 50.0)
    };

    ScalarReading::new(value, interpret(value))
}

fn interpret(value: f64) -> &'static str {
    if value >= 80.0 {
        "overbought"
    } else if value <= 20.0 {
        "oversold"
    } else if value > 50.0 {
        "buying pressure"
    } else if value < 50.0 {
        "selling pressure"
    } else {
        "neutral"
    }
}
