// =============================================================================
// Engine Errors
// =============================================================================
//
// Only two failure kinds exist inside the indicator engine:
//
//   InvalidInput      — the candle series violates a structural invariant.
//                       Aborts the whole analysis.
//   InsufficientData  — a strict primitive (SMA) was asked for more samples
//                       than the series holds.  Calculators resolve this to
//                       their neutral default; it never escapes `analyze`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: usize, available: usize },
}

impl AnalysisError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
