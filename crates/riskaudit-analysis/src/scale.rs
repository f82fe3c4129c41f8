use std::ops::RangeInclusive;

use serde::Serialize;

use crate::{dataset::Outcome, error::AnalysisError};

/// Bounds of the integer risk score.
///
/// A record whose outcome occurred is expected to carry the highest score,
/// one whose outcome did not occur the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskScale {
    low: i32,
    high: i32,
}

impl Default for RiskScale {
    fn default() -> Self {
        Self::DECILE
    }
}

impl RiskScale {
    /// The `1..=10` decile scale.
    pub const DECILE: Self = Self { low: 1, high: 10 };

    /// Creates a scale, rejecting empty or inverted ranges.
    pub fn new(low: i32, high: i32) -> Result<Self, AnalysisError> {
        if low >= high {
            return Err(AnalysisError::InvalidScale {
                reason: format!("lowest score {low} must be below highest score {high}"),
            });
        }
        Ok(Self { low, high })
    }

    #[must_use]
    pub fn low(&self) -> i32 {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> i32 {
        self.high
    }

    #[must_use]
    pub fn contains(&self, score: i32) -> bool {
        (self.low..=self.high).contains(&score)
    }

    /// Score an ideal model would have assigned given the observed outcome.
    #[must_use]
    pub fn expected_score(&self, outcome: Outcome) -> i32 {
        match outcome {
            Outcome::Event => self.high,
            Outcome::NoEvent => self.low,
        }
    }

    /// Every integer threshold that splits the scale into two non-empty halves.
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_analysis::scale::RiskScale;
    /// assert_eq!(RiskScale::DECILE.default_thresholds(), 1..=9);
    /// ```
    #[must_use]
    pub fn default_thresholds(&self) -> RangeInclusive<i32> {
        self.low..=self.high - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_scale() {
        assert!(matches!(
            RiskScale::new(5, 5),
            Err(AnalysisError::InvalidScale { .. })
        ));
        assert!(RiskScale::new(10, 1).is_err());
    }

    #[test]
    fn test_expected_score() {
        let scale = RiskScale::new(0, 4).unwrap();
        assert_eq!(scale.expected_score(Outcome::Event), 4);
        assert_eq!(scale.expected_score(Outcome::NoEvent), 0);
        assert!(scale.contains(0));
        assert!(!scale.contains(5));
    }
}
