//! Stock health classification.

use serde::{Deserialize, Serialize};

/// Health of an item's stock relative to its reorder threshold.
///
/// Ordered by urgency: `Critical` sorts before `Warning`, which sorts before
/// `Healthy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// At or below half of the minimum stock.
    Critical,
    /// At or below the minimum stock.
    Warning,
    /// Above the minimum stock.
    Healthy,
}

impl StockLevel {
    /// Classify a quantity against its reorder threshold.
    ///
    /// `Critical` when `current <= minimum * 0.5`, `Warning` when
    /// `current <= minimum`, otherwise `Healthy`.
    #[must_use]
    pub fn classify(current: u32, minimum: u32) -> Self {
        // current <= minimum / 2, kept exact in integers
        if u64::from(current) * 2 <= u64::from(minimum) {
            Self::Critical
        } else if current <= minimum {
            Self::Warning
        } else {
            Self::Healthy
        }
    }

    /// Whether the item needs reordering.
    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, Self::Critical | Self::Warning)
    }

    /// Stable lowercase label, as shown to the shop owner and the model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Healthy => "healthy",
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(StockLevel::classify(10, 20), StockLevel::Critical);
        assert_eq!(StockLevel::classify(11, 20), StockLevel::Warning);
        assert_eq!(StockLevel::classify(20, 20), StockLevel::Warning);
        assert_eq!(StockLevel::classify(21, 20), StockLevel::Healthy);
    }

    #[test]
    fn test_classify_odd_minimum() {
        // 5 * 0.5 = 2.5
        assert_eq!(StockLevel::classify(2, 5), StockLevel::Critical);
        assert_eq!(StockLevel::classify(3, 5), StockLevel::Warning);
    }

    #[test]
    fn test_classify_zero_minimum() {
        assert_eq!(StockLevel::classify(0, 0), StockLevel::Critical);
        assert_eq!(StockLevel::classify(1, 0), StockLevel::Healthy);
    }

    #[test]
    fn test_urgency_ordering() {
        assert!(StockLevel::Critical < StockLevel::Warning);
        assert!(StockLevel::Warning < StockLevel::Healthy);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&StockLevel::Critical).expect("serialize");
        assert_eq!(json, "\"critical\"");
    }

    proptest! {
        #[test]
        fn prop_classify_matches_float_thresholds(current in 0u32..10_000, minimum in 0u32..10_000) {
            let level = StockLevel::classify(current, minimum);
            let half = f64::from(minimum) * 0.5;
            let expected = if f64::from(current) <= half {
                StockLevel::Critical
            } else if current <= minimum {
                StockLevel::Warning
            } else {
                StockLevel::Healthy
            };
            prop_assert_eq!(level, expected);
            prop_assert_eq!(level.is_low(), current <= minimum);
        }
    }
}
