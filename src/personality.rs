// =============================================================================
// Trader personalities — templated prose over an AnalysisResult
// =============================================================================
//
// Rendering only reads documented fields (labels and numbers), never
// calculator internals, so output is deterministic for a given result.
// =============================================================================

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, Sentiment, Trend};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraderPersonality {
    /// Measured, numbers first.
    #[default]
    Analyst,
    /// Hype, short sentences.
    Degen,
    /// Explains what each signal means.
    Mentor,
}

impl std::fmt::Display for TraderPersonality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analyst => write!(f, "analyst"),
            Self::Degen => write!(f, "degen"),
            Self::Mentor => write!(f, "mentor"),
        }
    }
}

impl std::str::FromStr for TraderPersonality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analyst" => Ok(Self::Analyst),
            "degen" => Ok(Self::Degen),
            "mentor" => Ok(Self::Mentor),
            other => Err(format!(
                "unknown personality '{other}' (expected analyst, degen or mentor)"
            )),
        }
    }
}

/// Two decimals for prices of at least 1, otherwise enough to show the
/// leading significant digits.
pub fn format_price(price: f64) -> String {
    if price >= 1.0 || price <= 0.0 {
        format!("${price:.2}")
    } else {
        let decimals = (-price.log10()).ceil() as usize + 3;
        format!("${price:.decimals$}")
    }
}

fn format_levels(levels: &[f64]) -> String {
    if levels.is_empty() {
        return "none nearby".to_string();
    }
    levels
        .iter()
        .map(|&l| format_price(l))
        .collect::<Vec<_>>()
        .join(", ")
}

impl TraderPersonality {
    pub fn render(self, symbol: &str, result: &AnalysisResult) -> String {
        let symbol = symbol.to_uppercase();
        match self {
            Self::Analyst => render_analyst(&symbol, result),
            Self::Degen => render_degen(&symbol, result),
            Self::Mentor => render_mentor(&symbol, result),
        }
    }
}

fn render_analyst(symbol: &str, r: &AnalysisResult) -> String {
    let ind = &r.indicators;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{symbol} at {} ({:+.2}% 24h). Trend: {}, pattern: {}. Overall sentiment: {}.",
        format_price(r.current_price),
        r.price_change_24h,
        r.current_trend,
        r.price_action_pattern,
        r.sentiment
    );
    let _ = writeln!(
        out,
        "RSI {:.1} ({}), MACD {:.4} ({}), Bollinger {:.0}%B ({}), ADX {:.1} ({}).",
        ind.rsi.value,
        ind.rsi.interpretation,
        ind.macd.macd,
        ind.macd.interpretation,
        ind.bollinger_bands.percent_b,
        ind.bollinger_bands.interpretation,
        ind.adx.adx,
        ind.adx.interpretation
    );
    let _ = write!(
        out,
        "Support: {}. Resistance: {}.",
        format_levels(&r.supports),
        format_levels(&r.resistances)
    );
    out
}

fn render_degen(symbol: &str, r: &AnalysisResult) -> String {
    let mood = match r.sentiment {
        Sentiment::Bullish => "looking ready to send",
        Sentiment::Bearish => "getting absolutely rekt",
        Sentiment::Neutral => "chopping sideways, no clear play",
    };
    let rsi = &r.indicators.rsi;
    let mut out = format!("{symbol} is {mood}. ");
    let _ = write!(
        out,
        "Sitting at {} with RSI {:.0} ({}). ",
        format_price(r.current_price),
        rsi.value,
        rsi.interpretation
    );
    match (r.supports.first(), r.resistances.first()) {
        (Some(s), Some(res)) => {
            let _ = write!(
                out,
                "Floor {} / ceiling {}. ",
                format_price(*s),
                format_price(*res)
            );
        }
        (Some(s), None) => {
            let _ = write!(out, "Floor {}. ", format_price(*s));
        }
        (None, Some(res)) => {
            let _ = write!(out, "Ceiling {}. ", format_price(*res));
        }
        (None, None) => {}
    }
    out.push_str("Not financial advice.");
    out
}

fn render_mentor(symbol: &str, r: &AnalysisResult) -> String {
    let ind = &r.indicators;
    let trend_note = match r.current_trend {
        Trend::Uptrend => "the short moving averages sit above the longer ones, so buyers have had the upper hand",
        Trend::Downtrend => "the short moving averages sit below the longer ones, so sellers have been in control",
        Trend::Sideways => "the moving averages are tangled, which usually means the market is undecided",
    };

    let mut out = String::new();
    let _ = writeln!(out, "Let's walk through {symbol} together.");
    let _ = writeln!(out, "Right now {trend_note}.");
    let _ = writeln!(
        out,
        "RSI measures momentum on a 0-100 scale; at {:.1} it reads {}.",
        ind.rsi.value, ind.rsi.interpretation
    );
    let _ = writeln!(
        out,
        "Bollinger Bands show where price sits inside its recent range: {}.",
        ind.bollinger_bands.interpretation
    );
    let _ = writeln!(
        out,
        "Volatility (ATR) is {:.2}% of price: {}.",
        ind.atr.percent, ind.atr.interpretation
    );
    if !r.sentiment_factors.is_empty() {
        let signals: Vec<String> = r
            .sentiment_factors
            .iter()
            .map(|f| format!("{} ({})", f.signal, f.bias))
            .collect();
        let _ = writeln!(out, "Signals I counted: {}.", signals.join(", "));
    }
    let _ = write!(
        out,
        "Taken together the picture is {}. Watch {} below and {} above.",
        r.sentiment,
        format_levels(&r.supports),
        format_levels(&r.resistances)
    );
    out
}
