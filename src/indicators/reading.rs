// =============================================================================
// Indicator readings
// =============================================================================
//
// Every calculator returns a reading: numeric fields plus an interpretation
// drawn from that calculator's closed `LABELS` set.  The `Reading` trait gives
// the aggregation and formatting layers a uniform view over them.

use serde::{Deserialize, Serialize};

/// Interpretation shared by every calculator's neutral default.
pub const INSUFFICIENT_DATA: &str = "insufficient data";

pub trait Reading {
    /// Label from the calculator's closed label set.
    fn interpretation(&self) -> &'static str;

    /// Every numeric field, by name.
    fn values(&self) -> Vec<(&'static str, f64)>;

    fn is_insufficient(&self) -> bool {
        self.interpretation() == INSUFFICIENT_DATA
    }
}

/// A single value plus interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalarReading {
    pub value: f64,
    pub interpretation: &'static str,
}

impl ScalarReading {
    pub fn new(value: f64, interpretation: &'static str) -> Self {
        Self {
            value,
            interpretation,
        }
    }

    pub fn insufficient(default_value: f64) -> Self {
        Self::new(default_value, INSUFFICIENT_DATA)
    }
}

impl Reading for ScalarReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![("value", self.value)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// A value with a trend direction (PSAR, Supertrend).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DirectionalReading {
    pub value: f64,
    pub trend: Direction,
    pub interpretation: &'static str,
}

impl Reading for DirectionalReading {
    fn interpretation(&self) -> &'static str {
        self.interpretation
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![("value", self.value)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_scalar_is_flagged() {
        let r = ScalarReading::insufficient(50.0);
        assert!(r.is_insufficient());
        assert_eq!(r.values(), vec![("value", 50.0)]);
    }

    #[test]
    fn direction_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Up).unwrap(), "\"up\"");
        assert_eq!(Direction::Down.to_string(), "down");
    }
}
