// =============================================================================
// Analysis Engine — series in, AnalysisResult out
// =============================================================================
//
// raw candles -> prepared series -> per-indicator readings
//             -> support/resistance, trend, pattern, sentiment
//
// Pure and synchronous: no I/O, no shared state, nothing retained after the
// call.  Malformed input aborts with `InvalidInput`; a calculator that lacks
// data falls back to its own neutral default and the rest proceed.
// =============================================================================

pub mod levels;
pub mod params;
pub mod result;
pub mod sentiment;
pub mod trend;

use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::indicators::{
    adx, aroon, atr, bollinger, cci, chaikin, channels, elder_ray, ichimoku, macd, mfi,
    moving_averages, obv, psar, roc, rsi, stochastic, supertrend, trix, volume_profile, vwap,
    williams_r,
};
use crate::indicators::common::safe_divide;
use crate::market_data::Candle;
use crate::series::{prepare, PreparedSeries};

pub use levels::Levels;
pub use params::IndicatorParams;
pub use result::{AnalysisResult, IndicatorSet};
pub use sentiment::{Sentiment, SentimentFactor};
pub use trend::{PricePattern, Trend};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Analyse `candles` with the default indicator parameters.
pub fn analyze(candles: &[Candle]) -> Result<AnalysisResult, AnalysisError> {
    Analyzer::default().analyze(candles)
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    params: IndicatorParams,
}

impl Analyzer {
    pub fn new(params: IndicatorParams) -> Result<Self, AnalysisError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn analyze(&self, candles: &[Candle]) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_with_change(candles, None)
    }

    /// Like `analyze`, but an externally sourced 24h change (token metadata)
    /// replaces the one derived from the candles.
    pub fn analyze_with_change(
        &self,
        candles: &[Candle],
        price_change_24h: Option<f64>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let series = prepare(candles).inspect_err(|e| {
            warn!(candles = candles.len(), error = %e, "rejecting candle series");
        })?;

        let indicators = self.indicators(&series);
        let current_price = series.last_close();
        let price_change_24h = price_change_24h
            .filter(|c| c.is_finite())
            .unwrap_or_else(|| derived_change_24h(candles));

        let Levels {
            supports,
            resistances,
        } = levels::find_levels(&series.highs, &series.lows, current_price);
        let current_trend = trend::classify_trend(&series.closes, &series.price_changes);
        let price_action_pattern = trend::detect_pattern(&series.closes);

        let sentiment_factors = sentiment::collect_factors(&sentiment::SentimentInputs {
            rsi: indicators.rsi,
            macd_histogram: indicators.macd.histogram,
            emas: trend::EmaStack::from_closes(&series.closes),
            price_change_24h,
            trend: current_trend,
        });
        let sentiment = sentiment::verdict(&sentiment_factors);

        debug!(
            candles = series.len(),
            price = current_price,
            trend = %current_trend,
            pattern = %price_action_pattern,
            sentiment = %sentiment,
            factors = sentiment_factors.len(),
            supports = supports.len(),
            resistances = resistances.len(),
            "analysis complete"
        );

        Ok(AnalysisResult {
            indicators,
            supports,
            resistances,
            current_trend,
            price_action_pattern,
            sentiment,
            sentiment_factors,
            current_price,
            price_change_24h,
        })
    }

    fn indicators(&self, s: &PreparedSeries<'_>) -> IndicatorSet {
        let p = &self.params;
        let (h, l, c, v, tp) = (&s.highs, &s.lows, &s.closes, &s.volumes, &s.typical_prices);
        let opens: Vec<f64> = s.candles.iter().map(|candle| candle.open).collect();
        let price = s.last_close();

        IndicatorSet {
            rsi: rsi::calculate(c, p.rsi_period),
            macd: macd::calculate(&s.price_changes, p.macd_fast, p.macd_slow, p.macd_signal),
            bollinger_bands: bollinger::calculate(c, p.bollinger_period, p.bollinger_std_dev),
            stochastic: stochastic::calculate(h, l, c, p.stochastic_k, p.stochastic_d),
            adx: adx::calculate(h, l, c, p.adx_period),
            atr: atr::calculate(h, l, c, p.atr_period),
            vwap: vwap::calculate(tp, v, price),
            ichimoku: ichimoku::calculate(h, l, c, p.ichimoku()),
            obv: obv::calculate(c, v, p.obv_signal_period),
            mfi: mfi::calculate(tp, v, p.mfi_period),
            cci: cci::calculate(tp, p.cci_period),
            williams_r: williams_r::calculate(h, l, c, p.williams_period),
            aroon: aroon::calculate(h, l, p.aroon_period),
            trix: trix::calculate(c, p.trix_period),
            roc: roc::calculate(c, p.roc_period),
            psar: psar::calculate(h, l, p.psar_step, p.psar_max_step),
            supertrend: supertrend::calculate(h, l, c, p.supertrend_period, p.supertrend_multiplier),
            moving_averages: moving_averages::calculate(c, &p.ma_periods),
            keltner_channels: channels::keltner(h, l, c, p.keltner_period, p.keltner_multiplier),
            donchian_channels: channels::donchian(h, l, c, p.donchian_period),
            chaikin_money_flow: chaikin::calculate(h, l, c, v, p.cmf_period),
            elder_ray: elder_ray::calculate(h, l, c, p.elder_ray_period),
            volume_profile: volume_profile::volume_profile(
                h,
                l,
                &opens,
                c,
                v,
                p.volume_profile_bins,
            ),
            market_profile: volume_profile::market_profile(tp, v, price, p.value_area_pct),
        }
    }
}

/// Percent change from the close of the latest candle at least 24h older
/// than the last one (the first candle when the series spans less than a day).
pub fn derived_change_24h(candles: &[Candle]) -> f64 {
    let Some(last) = candles.last() else {
        return 0.0;
    };
    let cutoff = last.timestamp - DAY_MS;
    let reference = candles
        .iter()
        .rev()
        .find(|c| c.timestamp <= cutoff)
        .or_else(|| candles.first())
        .map_or(last.close, |c| c.close);

    safe_divide(last.close - reference, reference, 0.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{Reading, INSUFFICIENT_DATA};

    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn candle(i: usize, open: f64, close: f64, spread: f64, volume: f64) -> Candle {
        Candle::new(
            1_700_000_000_000 + i as i64 * HOUR_MS,
            open,
            open.max(close) + spread,
            (open.min(close) - spread).max(0.0),
            close,
            volume,
        )
    }

    /// Deterministic choppy random walk.
    fn walk(len: usize) -> Vec<Candle> {
        let mut price = 100.0;
        (0..len)
            .map(|i| {
                let x = i as f64;
                let open = price;
                price = (price * (1.0 + 0.02 * (x * 0.37).sin() + 0.01 * (x * 1.3).cos())).max(1.0);
                candle(i, open, price, price * 0.005, 1000.0 + 400.0 * (x * 0.5).sin())
            })
            .collect()
    }

    fn from_closes(closes: &[f64]) -> Vec<Candle> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let open = if i == 0 { c } else { closes[i - 1] };
                candle(i, open, c, 0.0, 1000.0)
            })
            .collect()
    }

    fn labels_for(name: &str) -> &'static [&'static str] {
        match name {
            "rsi" => rsi::LABELS,
            "macd" => macd::LABELS,
            "bollinger_bands" => bollinger::LABELS,
            "stochastic" => stochastic::LABELS,
            "adx" => adx::LABELS,
            "atr" => atr::LABELS,
            "vwap" => vwap::LABELS,
            "ichimoku" => ichimoku::LABELS,
            "obv" => obv::LABELS,
            "mfi" => mfi::LABELS,
            "cci" => cci::LABELS,
            "williams_r" => williams_r::LABELS,
            "aroon" => aroon::LABELS,
            "trix" => trix::LABELS,
            "roc" => roc::LABELS,
            "psar" => psar::LABELS,
            "supertrend" => supertrend::LABELS,
            "moving_averages" => moving_averages::LABELS,
            "keltner_channels" => channels::KELTNER_LABELS,
            "donchian_channels" => channels::DONCHIAN_LABELS,
            "chaikin_money_flow" => chaikin::LABELS,
            "elder_ray" => elder_ray::LABELS,
            "volume_profile" => volume_profile::VOLUME_LABELS,
            "market_profile" => volume_profile::MARKET_LABELS,
            other => panic!("no label set for {other}"),
        }
    }

    fn assert_well_formed(result: &AnalysisResult) {
        for (name, reading) in result.indicators.readings() {
            let label = reading.interpretation();
            assert!(
                labels_for(name).contains(&label),
                "{name}: {label:?} not in its label set"
            );
            for (field, value) in reading.values() {
                assert!(value.is_finite(), "{name}.{field} = {value}");
            }
        }
    }

    #[test]
    fn long_series_is_finite_and_labelled() {
        let candles = walk(240);
        let result = analyze(&candles).unwrap();
        assert_well_formed(&result);
        assert_eq!(result.indicators.moving_averages.averages.len(), 5);
        assert!(!result.indicators.rsi.is_insufficient());
    }

    #[test]
    fn bounded_indicators_stay_in_range() {
        for len in [30, 120, 240] {
            let r = analyze(&walk(len)).unwrap();
            let ind = &r.indicators;
            assert!((0.0..=rsi::RSI_CEILING).contains(&ind.rsi.value));
            assert!((0.0..=100.0).contains(&ind.bollinger_bands.percent_b));
            assert!((0.0..=100.0).contains(&ind.mfi.value));
            assert!((-100.0..=0.0).contains(&ind.williams_r.value));
            assert!((0.0..=100.0).contains(&ind.aroon.up));
            assert!((0.0..=100.0).contains(&ind.aroon.down));
            assert!((-1.0..=1.0).contains(&ind.chaikin_money_flow.value));
        }
    }

    #[test]
    fn levels_sit_on_the_correct_side() {
        let r = analyze(&walk(240)).unwrap();
        assert!(r.supports.len() <= 3 && r.resistances.len() <= 3);
        assert!(r.supports.iter().all(|&s| s < r.current_price));
        assert!(r.resistances.iter().all(|&x| x > r.current_price));
        assert!(r.supports.windows(2).all(|w| w[0] > w[1]));
        assert!(r.resistances.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn analysis_is_idempotent() {
        let candles = walk(210);
        let first = analyze(&candles).unwrap();
        let second = analyze(&candles).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn rising_closes_push_rsi_to_ceiling() {
        let closes: Vec<f64> = (1..=40).map(|x| 100.0 + x as f64).collect();
        let r = analyze(&from_closes(&closes)).unwrap();
        assert!(r.indicators.rsi.value > 70.0);
        assert_eq!(r.indicators.rsi.value, rsi::RSI_CEILING);
        assert_eq!(r.current_trend, Trend::Uptrend);
    }

    #[test]
    fn flat_series_scenario() {
        let candles: Vec<Candle> = (0..30).map(|i| candle(i, 100.0, 100.0, 0.0, 1000.0)).collect();
        let r = analyze(&candles).unwrap();
        assert_well_formed(&r);
        assert_eq!(r.indicators.rsi.value, 50.0);
        let bb = &r.indicators.bollinger_bands;
        assert_eq!(bb.middle, 100.0);
        assert!((bb.upper - 100.1).abs() < 1e-9);
        assert_eq!(bb.lower, 100.0);
        assert_eq!(r.current_trend, Trend::Sideways);
        assert_eq!(r.price_action_pattern, PricePattern::Consolidation);
        assert_eq!(r.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn three_candles_degrade_without_failing() {
        let r = analyze(&from_closes(&[100.0, 101.0, 102.0])).unwrap();
        assert_eq!(r.indicators.rsi.value, 50.0);
        assert!(r.indicators.rsi.interpretation.contains(INSUFFICIENT_DATA));
        assert_well_formed(&r);
    }

    #[test]
    fn down_gap_reads_downtrend_with_bearish_change() {
        let mut closes = vec![100.0; 60];
        closes.extend(vec![50.0; 12]);
        let r = analyze(&from_closes(&closes)).unwrap();
        assert_eq!(r.current_trend, Trend::Downtrend);
        assert!(r.price_change_24h < 0.0);
        assert!(r
            .sentiment_factors
            .iter()
            .any(|f| f.signal == "24h price change negative" && f.bias == Sentiment::Bearish));
    }

    #[test]
    fn external_change_overrides_derived() {
        let closes = vec![100.0; 40];
        let r = Analyzer::default()
            .analyze_with_change(&from_closes(&closes), Some(4.2))
            .unwrap();
        assert_eq!(r.price_change_24h, 4.2);
    }

    #[test]
    fn malformed_series_aborts() {
        let mut candles = walk(20);
        candles[5].low = candles[5].high + 1.0;
        let err = analyze(&candles).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(analyze(&[]).unwrap_err().is_invalid_input());
    }

    #[test]
    fn change_24h_uses_candle_a_day_back() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let candles = from_closes(&closes);
        // last candle i=29, a day back is i=5 (close 105)
        let expected = (129.0 - 105.0) / 105.0 * 100.0;
        assert!((derived_change_24h(&candles) - expected).abs() < 1e-9);
        // shorter than a day: reference is the first candle
        let short = from_closes(&[10.0, 11.0]);
        assert!((derived_change_24h(&short) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn custom_params_are_validated() {
        let params = IndicatorParams {
            rsi_period: 0,
            ..Default::default()
        };
        assert!(Analyzer::new(params).is_err());

        let params = IndicatorParams {
            rsi_period: 5,
            ..Default::default()
        };
        let analyzer = Analyzer::new(params).unwrap();
        let r = analyzer.analyze(&from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 5.0])).unwrap();
        assert!(!r.indicators.rsi.is_insufficient());
    }

    #[test]
    fn oversized_params_are_rejected_before_analysis() {
        let cases = [
            IndicatorParams {
                rsi_period: usize::MAX,
                ..Default::default()
            },
            IndicatorParams {
                volume_profile_bins: usize::MAX,
                ..Default::default()
            },
            IndicatorParams {
                ma_periods: vec![20, usize::MAX],
                ..Default::default()
            },
        ];
        for params in cases {
            let err = Analyzer::new(params).unwrap_err();
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn huge_lookbacks_fall_back_to_insufficient() {
        let candles = walk(30);
        let s = prepare(&candles).unwrap();
        let (h, l, c, tp) = (&s.highs, &s.lows, &s.closes, &s.typical_prices);
        let huge = usize::MAX;
        assert!(rsi::calculate(c, huge).is_insufficient());
        assert!(adx::calculate(h, l, c, huge).is_insufficient());
        assert!(atr::calculate(h, l, c, huge).is_insufficient());
        assert!(mfi::calculate(tp, &s.volumes, huge).is_insufficient());
        assert!(supertrend::calculate(h, l, c, huge, 3.0).is_insufficient());
        assert!(trix::calculate(c, huge).is_insufficient());
    }
}
