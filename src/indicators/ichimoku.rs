// =============================================================================
// Ichimoku Cloud
// =============================================================================
//
//   conversion = (highest_high(9)  + lowest_low(9))  / 2
//   base       = (highest_high(26) + lowest_low(26)) / 2
//   span_a     = (conversion + base) / 2
//   span_b     = (highest_high(52) + lowest_low(52)) / 2
//   lagging    = close[N - 1 - displacement], or the latest close when that
//                index does not exist
//
// Cloud colour is green when span_a > span_b, red otherwise.  The
// interpretation places the latest close relative to the cloud.

use serde::Serialize;

use super::common::{highest, lowest};
use super::reading::{Reading, INSUFFICIENT_DATA};

pub const LABELS: &[&str] = &[
    "price above cloud",
    "price below cloud",
    "price inside cloud",
    INSUFFICIENT_DATA,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudColor {
    Green,
    Red,
}

#[derive(Debug, Clone, Copy)]
pub struct IchimokuParams {
    pub conversion: usize,
    pub base: usize,
    pub span_b: usize,
    pub displacement: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IchimokuReading {
    pub conversion_line: f64,
    pub base_line: f64,
    pub span_a: f64,
    pub span_b: f64,
    pub lagging_span: f64,
    pub cloud: CloudColor,
    pub interpretation: &'static str,
}

impl Reading for IchimokuReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("conversion_line", self.conversion_line),
            ("base_line", self.base_line),
            ("span_a", self.span_a),
            ("span_b", self.span_b),
            ("lagging_span", self.lagging_span),
        ]
    }
}

pub fn calculate(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    params: IchimokuParams,
) -> IchimokuReading {
    let n = closes.len();
    let last_close = closes.last().copied().unwrap_or(0.0);
    let longest = params.conversion.max(params.base).max(params.span_b);

    if n < longest || params.conversion == 0 || params.base == 0 || params.span_b == 0 {
        return IchimokuReading {
            conversion_line: last_close,
            base_line: last_close,
            span_a: last_close,
            span_b: last_close,
            lagging_span: last_close,
            cloud: CloudColor::Red,
            interpretation: INSUFFICIENT_DATA,
        };
    }

    let midpoint = |period: usize| (highest(highs, period) + lowest(lows, period)) / 2.0;

    let conversion_line = midpoint(params.conversion);
    let base_line = midpoint(params.base);
    let span_a = (conversion_line + base_line) / 2.0;
    let span_b = midpoint(params.span_b);

    let lagging_span = (n - 1)
        .checked_sub(params.displacement)
        .map(|i| closes[i])
        .unwrap_or(last_close);

    let cloud = if span_a > span_b {
        CloudColor::Green
    } else {
        CloudColor::Red
    };

    let cloud_top = span_a.max(span_b);
    let cloud_bottom = span_a.min(span_b);
    let interpretation = if last_close > cloud_top {
        "price above cloud"
    } else if last_close < cloud_bottom {
        "price below cloud"
    } else {
        "price inside cloud"
    };

    IchimokuReading {
        conversion_line,
        base_line,
        span_a,
        span_b,
        lagging_span,
        cloud,
        interpretation,
    }
}
