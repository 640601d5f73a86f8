// =============================================================================
// Trend & price-action pattern classification
// =============================================================================
//
// Trend:   EMA9 > EMA20 > EMA50 => uptrend, EMA9 < EMA20 < EMA50 => downtrend
//          (seed-first EMAs), otherwise the majority sign of the last three
//          price changes, sideways on a tie.
//
// Pattern: the last ten closes are split into two halves and each half's
//          percentage move is compared against a ±3% threshold.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::common::safe_divide;
use crate::indicators::ema::ema_seed_first;

const PATTERN_WINDOW: usize = 10;
const PATTERN_THRESHOLD_PCT: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uptrend => "uptrend",
            Self::Downtrend => "downtrend",
            Self::Sideways => "sideways",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricePattern {
    #[serde(rename = "reversal (bullish)")]
    BullishReversal,
    #[serde(rename = "reversal (bearish)")]
    BearishReversal,
    #[serde(rename = "uptrend continuation")]
    UptrendContinuation,
    #[serde(rename = "downtrend continuation")]
    DowntrendContinuation,
    #[serde(rename = "breakout")]
    Breakout,
    #[serde(rename = "consolidation")]
    Consolidation,
    #[serde(rename = "no clear pattern")]
    NoClearPattern,
}

impl PricePattern {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BullishReversal => "reversal (bullish)",
            Self::BearishReversal => "reversal (bearish)",
            Self::UptrendContinuation => "uptrend continuation",
            Self::DowntrendContinuation => "downtrend continuation",
            Self::Breakout => "breakout",
            Self::Consolidation => "consolidation",
            Self::NoClearPattern => "no clear pattern",
        }
    }
}

impl std::fmt::Display for PricePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seed-first EMA9 / EMA20 / EMA50 of the closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaStack {
    pub ema9: f64,
    pub ema20: f64,
    pub ema50: f64,
}

impl EmaStack {
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        Some(Self {
            ema9: ema_seed_first(closes, 9)?,
            ema20: ema_seed_first(closes, 20)?,
            ema50: ema_seed_first(closes, 50)?,
        })
    }
}

pub fn classify_trend(closes: &[f64], price_changes: &[f64]) -> Trend {
    if let Some(stack) = EmaStack::from_closes(closes) {
        if stack.ema9 > stack.ema20 && stack.ema20 > stack.ema50 {
            return Trend::Uptrend;
        }
        if stack.ema9 < stack.ema20 && stack.ema20 < stack.ema50 {
            return Trend::Downtrend;
        }
    }

    let recent = &price_changes[price_changes.len().saturating_sub(3)..];
    let ups = recent.iter().filter(|&&c| c > 0.0).count();
    let downs = recent.iter().filter(|&&c| c < 0.0).count();
    match ups.cmp(&downs) {
        std::cmp::Ordering::Greater => Trend::Uptrend,
        std::cmp::Ordering::Less => Trend::Downtrend,
        std::cmp::Ordering::Equal => Trend::Sideways,
    }
}

pub fn detect_pattern(closes: &[f64]) -> PricePattern {
    let window = &closes[closes.len().saturating_sub(PATTERN_WINDOW)..];
    if window.len() < 4 {
        return PricePattern::NoClearPattern;
    }

    let (first, second) = window.split_at(window.len() / 2);
    let first_move = half_move(first);
    let second_move = half_move(second);
    let t = PATTERN_THRESHOLD_PCT;

    if first_move < -t && second_move > t {
        PricePattern::BullishReversal
    } else if first_move > t && second_move < -t {
        PricePattern::BearishReversal
    } else if first_move > t && second_move > t {
        PricePattern::UptrendContinuation
    } else if first_move < -t && second_move < -t {
        PricePattern::DowntrendContinuation
    } else if first_move.abs() <= t && second_move.abs() > t {
        PricePattern::Breakout
    } else if first_move.abs() <= t && second_move.abs() <= t {
        PricePattern::Consolidation
    } else {
        PricePattern::NoClearPattern
    }
}

/// Percentage move from the first to the last close of `half`.
fn half_move(half: &[f64]) -> f64 {
    match (half.first(), half.last()) {
        (Some(&start), Some(&end)) => safe_divide(end - start, start, 0.0) * 100.0,
        _ => 0.0,
    }
}
