// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free calculators.  Each takes the prepared series it needs
// plus its lookback/multiplier and returns a reading whose interpretation is
// drawn from the module's `LABELS` set.  Insufficient data never errors: it
// resolves to a neutral default labelled "insufficient data".

pub mod common;
pub mod reading;

pub mod ema;
pub mod moving_averages;

// momentum
pub mod rsi;
pub mod macd;
pub mod stochastic;
pub mod cci;
pub mod williams_r;
pub mod trix;
pub mod roc;
pub mod mfi;

// trend
pub mod adx;
pub mod aroon;
pub mod psar;
pub mod supertrend;
pub mod ichimoku;
pub mod elder_ray;

// volatility / bands
pub mod atr;
pub mod bollinger;
pub mod channels;

// volume
pub mod vwap;
pub mod obv;
pub mod chaikin;
pub mod volume_profile;

pub use reading::{Direction, DirectionalReading, Reading, ScalarReading, INSUFFICIENT_DATA};
