// =============================================================================
// Analysis result model
// =============================================================================

use serde::Serialize;

use super::sentiment::{Sentiment, SentimentFactor};
use super::trend::{PricePattern, Trend};
use crate::indicators::adx::AdxReading;
use crate::indicators::aroon::AroonReading;
use crate::indicators::atr::AtrReading;
use crate::indicators::bollinger::BollingerReading;
use crate::indicators::channels::ChannelReading;
use crate::indicators::elder_ray::ElderRayReading;
use crate::indicators::ichimoku::IchimokuReading;
use crate::indicators::macd::MacdReading;
use crate::indicators::moving_averages::MovingAveragesReading;
use crate::indicators::obv::ObvReading;
use crate::indicators::reading::{DirectionalReading, Reading, ScalarReading};
use crate::indicators::stochastic::StochasticReading;
use crate::indicators::volume_profile::{MarketProfileReading, VolumeProfileReading};

/// One reading per calculator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub rsi: ScalarReading,
    pub macd: MacdReading,
    pub bollinger_bands: BollingerReading,
    pub stochastic: StochasticReading,
    pub adx: AdxReading,
    pub atr: AtrReading,
    pub vwap: ScalarReading,
    pub ichimoku: IchimokuReading,
    pub obv: ObvReading,
    pub mfi: ScalarReading,
    pub cci: ScalarReading,
    pub williams_r: ScalarReading,
    pub aroon: AroonReading,
    pub trix: ScalarReading,
    pub roc: ScalarReading,
    pub psar: DirectionalReading,
    pub supertrend: DirectionalReading,
    pub moving_averages: MovingAveragesReading,
    pub keltner_channels: ChannelReading,
    pub donchian_channels: ChannelReading,
    pub chaikin_money_flow: ScalarReading,
    pub elder_ray: ElderRayReading,
    pub volume_profile: VolumeProfileReading,
    pub market_profile: MarketProfileReading,
}

impl IndicatorSet {
    /// Every reading by indicator name, in a stable order.
    pub fn readings(&self) -> Vec<(&'static str, &dyn Reading)> {
        let readings: [(&'static str, &dyn Reading); 24] = [
            ("rsi", &self.rsi),
            ("macd", &self.macd),
            ("bollinger_bands", &self.bollinger_bands),
            ("stochastic", &self.stochastic),
            ("adx", &self.adx),
            ("atr", &self.atr),
            ("vwap", &self.vwap),
            ("ichimoku", &self.ichimoku),
            ("obv", &self.obv),
            ("mfi", &self.mfi),
            ("cci", &self.cci),
            ("williams_r", &self.williams_r),
            ("aroon", &self.aroon),
            ("trix", &self.trix),
            ("roc", &self.roc),
            ("psar", &self.psar),
            ("supertrend", &self.supertrend),
            ("moving_averages", &self.moving_averages),
            ("keltner_channels", &self.keltner_channels),
            ("donchian_channels", &self.donchian_channels),
            ("chaikin_money_flow", &self.chaikin_money_flow),
            ("elder_ray", &self.elder_ray),
            ("volume_profile", &self.volume_profile),
            ("market_profile", &self.market_profile),
        ];
        readings.to_vec()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub indicators: IndicatorSet,
    /// Strictly below `current_price`, nearest first, at most three.
    pub supports: Vec<f64>,
    /// Strictly above `current_price`, nearest first, at most three.
    pub resistances: Vec<f64>,
    pub current_trend: Trend,
    pub price_action_pattern: PricePattern,
    pub sentiment: Sentiment,
    pub sentiment_factors: Vec<SentimentFactor>,
    pub current_price: f64,
    pub price_change_24h: f64,
}
