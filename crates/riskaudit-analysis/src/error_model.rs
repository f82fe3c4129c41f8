//! Per-record error models
//!
//! An error model judges one score against the record's observed outcome.
//! All models produce a signed error whose sign follows the same convention:
//! positive means the score over-predicted risk, negative means it
//! under-predicted it.
//!
//! | model            | signed error                              | grouped by       |
//! |------------------|-------------------------------------------|------------------|
//! | `Linear`         | `score - expected`                        | trait            |
//! | `Rms`            | `score - expected` (aggregated as RMS)    | trait            |
//! | `BucketedLinear` | `score - expected`                        | (trait, score)   |
//! | `Threshold`      | `+1` false positive, `-1` false negative  | trait            |
//!
//! `expected` is the highest score of the [`RiskScale`] when the event
//! occurred and the lowest one otherwise.

use std::fmt;

use serde::Serialize;

use crate::{dataset::Outcome, scale::RiskScale};

/// Decision threshold used when none is given: scores above it are "high risk".
pub const DEFAULT_THRESHOLD: i32 = 4;

/// Strategy turning a `(outcome, score)` pair into a signed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorModel {
    Linear,
    Rms,
    BucketedLinear,
    Threshold { threshold: i32 },
}

impl ErrorModel {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ErrorModel::Linear => "linear",
            ErrorModel::Rms => "rms",
            ErrorModel::BucketedLinear => "bucketed",
            ErrorModel::Threshold { .. } => "threshold",
        }
    }

    /// Whether statistics are kept per `(trait, raw score)` instead of per trait.
    #[must_use]
    pub fn is_bucketed(&self) -> bool {
        matches!(self, ErrorModel::BucketedLinear)
    }

    /// Signed error of one record.
    ///
    /// `score` is fractional once a correction has been applied.
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_analysis::{dataset::Outcome, error_model::ErrorModel, scale::RiskScale};
    /// let scale = RiskScale::DECILE;
    /// assert_eq!(ErrorModel::Linear.signed_error(scale, Outcome::Event, 7.0), -3.0);
    /// assert_eq!(ErrorModel::Linear.signed_error(scale, Outcome::NoEvent, 7.0), 6.0);
    ///
    /// let threshold = ErrorModel::Threshold { threshold: 4 };
    /// assert_eq!(threshold.signed_error(scale, Outcome::NoEvent, 7.0), 1.0);
    /// assert_eq!(threshold.signed_error(scale, Outcome::Event, 7.0), 0.0);
    /// ```
    #[must_use]
    pub fn signed_error(&self, scale: RiskScale, outcome: Outcome, score: f64) -> f64 {
        match self {
            ErrorModel::Linear | ErrorModel::Rms | ErrorModel::BucketedLinear => {
                score - f64::from(scale.expected_score(outcome))
            }
            ErrorModel::Threshold { threshold } => {
                Classification::classify(outcome, score, *threshold).signed_error()
            }
        }
    }

    /// Threshold classification of one record, `None` for the continuous models.
    #[must_use]
    pub fn classify(&self, outcome: Outcome, score: f64) -> Option<Classification> {
        match self {
            ErrorModel::Threshold { threshold } => {
                Some(Classification::classify(outcome, score, *threshold))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorModel::Threshold { threshold } => write!(f, "threshold({threshold})"),
            _ => f.write_str(self.name()),
        }
    }
}

/// Outcome of a binary high/low risk decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Correct,
    /// Classified high risk, but the event did not occur.
    FalsePositive,
    /// Classified low risk, but the event occurred.
    FalseNegative,
}

impl Classification {
    /// Classifies a score against `threshold`: above it is high risk.
    #[must_use]
    pub fn classify(outcome: Outcome, score: f64, threshold: i32) -> Self {
        let high_risk = score > f64::from(threshold);
        match (outcome, high_risk) {
            (Outcome::Event, false) => Classification::FalseNegative,
            (Outcome::NoEvent, true) => Classification::FalsePositive,
            _ => Classification::Correct,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        !matches!(self, Classification::Correct)
    }

    /// `+1` false positive, `-1` false negative, `0` correct.
    #[must_use]
    pub fn signed_error(self) -> f64 {
        match self {
            Classification::Correct => 0.0,
            Classification::FalsePositive => 1.0,
            Classification::FalseNegative => -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_scenario_at_four() {
        let model = ErrorModel::Threshold { threshold: 4 };
        let cases = [
            (Outcome::Event, 3.0, Classification::FalseNegative),
            (Outcome::NoEvent, 7.0, Classification::FalsePositive),
            (Outcome::Event, 5.0, Classification::Correct),
            (Outcome::NoEvent, 2.0, Classification::Correct),
        ];
        for (outcome, score, expected) in cases {
            assert_eq!(model.classify(outcome, score), Some(expected));
            assert_eq!(
                model.signed_error(RiskScale::DECILE, outcome, score),
                expected.signed_error()
            );
        }
    }

    #[test]
    fn test_threshold_boundary_is_low_risk() {
        assert_eq!(
            Classification::classify(Outcome::Event, 4.0, 4),
            Classification::FalseNegative
        );
        assert_eq!(
            Classification::classify(Outcome::NoEvent, 4.0, 4),
            Classification::Correct
        );
        assert_eq!(
            Classification::classify(Outcome::NoEvent, 4.5, 4),
            Classification::FalsePositive
        );
    }

    #[test]
    fn test_linear_models_share_error() {
        let scale = RiskScale::DECILE;
        for model in [ErrorModel::Linear, ErrorModel::Rms, ErrorModel::BucketedLinear] {
            assert_eq!(model.signed_error(scale, Outcome::Event, 10.0), 0.0);
            assert_eq!(model.signed_error(scale, Outcome::NoEvent, 1.0), 0.0);
            assert_eq!(model.signed_error(scale, Outcome::Event, 1.0), -9.0);
            assert_eq!(model.classify(Outcome::Event, 1.0), None);
        }
    }

    #[test]
    fn test_serialized_form() {
        assert_eq!(
            serde_json::to_string(&ErrorModel::Threshold { threshold: 4 }).unwrap(),
            r#"{"kind":"threshold","threshold":4}"#
        );
        assert_eq!(
            serde_json::to_string(&ErrorModel::BucketedLinear).unwrap(),
            r#"{"kind":"bucketed_linear"}"#
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorModel::Rms.to_string(), "rms");
        assert_eq!(
            ErrorModel::Threshold { threshold: 6 }.to_string(),
            "threshold(6)"
        );
    }
}
