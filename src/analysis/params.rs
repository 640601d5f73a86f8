// =============================================================================
// Indicator parameters — per-indicator lookbacks and multipliers
// =============================================================================
//
// Every field carries a serde default so a partial JSON override (from the
// config file or a request body) fills in the rest.  `validate` rejects
// parameter sets the calculators cannot use.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::indicators::ichimoku::IchimokuParams;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_period_14() -> usize {
    14
}

fn default_period_20() -> usize {
    20
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_two() -> f64 {
    2.0
}

fn default_stoch_d() -> usize {
    3
}

fn default_aroon_period() -> usize {
    25
}

fn default_trix_period() -> usize {
    15
}

fn default_psar_step() -> f64 {
    0.02
}

fn default_psar_max_step() -> f64 {
    0.2
}

fn default_supertrend_period() -> usize {
    10
}

fn default_supertrend_multiplier() -> f64 {
    3.0
}

fn default_ichimoku_conversion() -> usize {
    9
}

fn default_ichimoku_base() -> usize {
    26
}

fn default_ichimoku_span_b() -> usize {
    52
}

fn default_ichimoku_displacement() -> usize {
    26
}

fn default_elder_period() -> usize {
    13
}

fn default_ma_periods() -> Vec<usize> {
    vec![9, 20, 50, 100, 200]
}

fn default_volume_profile_bins() -> usize {
    12
}

fn default_value_area_pct() -> f64 {
    70.0
}

// =============================================================================
// IndicatorParams
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_period_14")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_period_20")]
    pub bollinger_period: usize,
    /// Band width in standard deviations.
    #[serde(default = "default_two")]
    pub bollinger_std_dev: f64,

    #[serde(default = "default_period_14")]
    pub stochastic_k: usize,
    #[serde(default = "default_stoch_d")]
    pub stochastic_d: usize,

    #[serde(default = "default_period_14")]
    pub adx_period: usize,
    #[serde(default = "default_period_14")]
    pub atr_period: usize,
    #[serde(default = "default_period_14")]
    pub mfi_period: usize,
    #[serde(default = "default_period_20")]
    pub cci_period: usize,
    #[serde(default = "default_period_14")]
    pub williams_period: usize,
    #[serde(default = "default_aroon_period")]
    pub aroon_period: usize,
    #[serde(default = "default_trix_period")]
    pub trix_period: usize,
    #[serde(default = "default_period_14")]
    pub roc_period: usize,

    /// Parabolic SAR acceleration factor step and ceiling.
    #[serde(default = "default_psar_step")]
    pub psar_step: f64,
    #[serde(default = "default_psar_max_step")]
    pub psar_max_step: f64,

    #[serde(default = "default_supertrend_period")]
    pub supertrend_period: usize,
    #[serde(default = "default_supertrend_multiplier")]
    pub supertrend_multiplier: f64,

    #[serde(default = "default_ichimoku_conversion")]
    pub ichimoku_conversion: usize,
    #[serde(default = "default_ichimoku_base")]
    pub ichimoku_base: usize,
    #[serde(default = "default_ichimoku_span_b")]
    pub ichimoku_span_b: usize,
    #[serde(default = "default_ichimoku_displacement")]
    pub ichimoku_displacement: usize,

    #[serde(default = "default_period_20")]
    pub keltner_period: usize,
    #[serde(default = "default_two")]
    pub keltner_multiplier: f64,
    #[serde(default = "default_period_20")]
    pub donchian_period: usize,
    #[serde(default = "default_period_20")]
    pub cmf_period: usize,
    #[serde(default = "default_elder_period")]
    pub elder_ray_period: usize,
    #[serde(default = "default_period_20")]
    pub obv_signal_period: usize,

    /// Periods reported by the moving-average block.
    #[serde(default = "default_ma_periods")]
    pub ma_periods: Vec<usize>,

    #[serde(default = "default_volume_profile_bins")]
    pub volume_profile_bins: usize,
    /// Share of total volume (percent) the market-profile value area holds.
    #[serde(default = "default_value_area_pct")]
    pub value_area_pct: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_period_14(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bollinger_period: default_period_20(),
            bollinger_std_dev: default_two(),
            stochastic_k: default_period_14(),
            stochastic_d: default_stoch_d(),
            adx_period: default_period_14(),
            atr_period: default_period_14(),
            mfi_period: default_period_14(),
            cci_period: default_period_20(),
            williams_period: default_period_14(),
            aroon_period: default_aroon_period(),
            trix_period: default_trix_period(),
            roc_period: default_period_14(),
            psar_step: default_psar_step(),
            psar_max_step: default_psar_max_step(),
            supertrend_period: default_supertrend_period(),
            supertrend_multiplier: default_supertrend_multiplier(),
            ichimoku_conversion: default_ichimoku_conversion(),
            ichimoku_base: default_ichimoku_base(),
            ichimoku_span_b: default_ichimoku_span_b(),
            ichimoku_displacement: default_ichimoku_displacement(),
            keltner_period: default_period_20(),
            keltner_multiplier: default_two(),
            donchian_period: default_period_20(),
            cmf_period: default_period_20(),
            elder_ray_period: default_elder_period(),
            obv_signal_period: default_period_20(),
            ma_periods: default_ma_periods(),
            volume_profile_bins: default_volume_profile_bins(),
            value_area_pct: default_value_area_pct(),
        }
    }
}

/// Longest accepted lookback for any calculator.
pub const MAX_PERIOD: usize = 10_000;
pub const MAX_PROFILE_BINS: usize = 1_000;
pub const MAX_MA_PERIODS: usize = 16;

fn check_range(name: &str, value: usize, max: usize) -> Result<(), AnalysisError> {
    if value == 0 {
        return Err(AnalysisError::invalid(format!("{name} must be at least 1")));
    }
    if value > max {
        return Err(AnalysisError::invalid(format!(
            "{name} must be at most {max}, got {value}"
        )));
    }
    Ok(())
}

impl IndicatorParams {
    pub fn ichimoku(&self) -> IchimokuParams {
        IchimokuParams {
            conversion: self.ichimoku_conversion,
            base: self.ichimoku_base,
            span_b: self.ichimoku_span_b,
            displacement: self.ichimoku_displacement,
        }
    }

    /// Reject zero or oversized lookbacks, non-positive multipliers and
    /// inverted ranges.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
            ("stochastic_k", self.stochastic_k),
            ("stochastic_d", self.stochastic_d),
            ("adx_period", self.adx_period),
            ("atr_period", self.atr_period),
            ("mfi_period", self.mfi_period),
            ("cci_period", self.cci_period),
            ("williams_period", self.williams_period),
            ("aroon_period", self.aroon_period),
            ("trix_period", self.trix_period),
            ("roc_period", self.roc_period),
            ("supertrend_period", self.supertrend_period),
            ("ichimoku_conversion", self.ichimoku_conversion),
            ("ichimoku_base", self.ichimoku_base),
            ("ichimoku_span_b", self.ichimoku_span_b),
            ("keltner_period", self.keltner_period),
            ("donchian_period", self.donchian_period),
            ("cmf_period", self.cmf_period),
            ("elder_ray_period", self.elder_ray_period),
            ("obv_signal_period", self.obv_signal_period),
        ];
        for (name, value) in periods {
            check_range(name, value, MAX_PERIOD)?;
        }
        check_range("volume_profile_bins", self.volume_profile_bins, MAX_PROFILE_BINS)?;
        if self.ichimoku_displacement > MAX_PERIOD {
            return Err(AnalysisError::invalid(format!(
                "ichimoku_displacement must be at most {MAX_PERIOD}, got {}",
                self.ichimoku_displacement
            )));
        }
        if self.ma_periods.len() > MAX_MA_PERIODS {
            return Err(AnalysisError::invalid(format!(
                "ma_periods holds at most {MAX_MA_PERIODS} entries, got {}",
                self.ma_periods.len()
            )));
        }
        for (pos, &period) in self.ma_periods.iter().enumerate() {
            check_range(&format!("ma_periods[{pos}]"), period, MAX_PERIOD)?;
        }

        let multipliers = [
            ("bollinger_std_dev", self.bollinger_std_dev),
            ("psar_step", self.psar_step),
            ("psar_max_step", self.psar_max_step),
            ("supertrend_multiplier", self.supertrend_multiplier),
            ("keltner_multiplier", self.keltner_multiplier),
        ];
        for (name, value) in multipliers {
            if !value.is_finite() || value <= 0.0 {
                return Err(AnalysisError::invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.macd_fast >= self.macd_slow {
            return Err(AnalysisError::invalid(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                self.macd_fast, self.macd_slow
            )));
        }
        if self.psar_step > self.psar_max_step {
            return Err(AnalysisError::invalid(format!(
                "psar_step ({}) exceeds psar_max_step ({})",
                self.psar_step, self.psar_max_step
            )));
        }
        if !(self.value_area_pct > 0.0 && self.value_area_pct <= 100.0) {
            return Err(AnalysisError::invalid(format!(
                "value_area_pct must be in (0, 100], got {}",
                self.value_area_pct
            )));
        }
        Ok(())
    }
}
