use riskaudit_stats::residual::ResidualSummary;
use serde::Serialize;

use crate::{
    dataset::Outcome,
    error::AnalysisError,
    error_model::{Classification, ErrorModel},
    scale::RiskScale,
};

/// False positive and false negative tallies of a threshold classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Misclassification {
    pub false_positive_count: usize,
    pub false_negative_count: usize,
}

impl Misclassification {
    fn record(&mut self, classification: Classification) {
        match classification {
            Classification::FalsePositive => self.false_positive_count += 1,
            Classification::FalseNegative => self.false_negative_count += 1,
            Classification::Correct => {}
        }
    }

    /// Total number of misclassified records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.false_positive_count + self.false_negative_count
    }
}

/// Error and bias of one group under one error model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStatistics {
    /// Trait (or `trait_score` bucket) the statistics describe
    pub group_id: String,
    /// Number of records in the group
    pub count: usize,
    /// Sum of absolute per-record errors
    ///
    /// Under the threshold model this is the number of misclassified records.
    pub total_absolute_error: f64,
    /// Mean signed error; positive means the group is over-scored
    pub mean_signed_bias: f64,
    /// Population root-mean-square of the per-record errors
    pub rms_error: f64,
    /// Threshold model only
    pub misclassification: Option<Misclassification>,
}

impl GroupStatistics {
    /// Estimates error and bias of a group in one pass over its `(outcome, score)` pairs.
    ///
    /// Fails with [`AnalysisError::EmptyGroup`] when the group has no member.
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_analysis::{bias::GroupStatistics, dataset::Outcome, error_model::ErrorModel, scale::RiskScale};
    /// let scores = [(Outcome::Event, 1.0), (Outcome::NoEvent, 10.0)];
    /// let stats = GroupStatistics::estimate("B", scores, ErrorModel::Linear, RiskScale::DECILE).unwrap();
    /// assert_eq!(stats.mean_signed_bias, 0.0);
    /// assert_eq!(stats.total_absolute_error, 18.0);
    /// ```
    pub fn estimate<I>(
        group_id: impl Into<String>,
        scores: I,
        model: ErrorModel,
        scale: RiskScale,
    ) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = (Outcome, f64)>,
    {
        let group_id = group_id.into();
        let mut residuals = ResidualSummary::new();
        let mut misclassification = matches!(model, ErrorModel::Threshold { .. })
            .then(Misclassification::default);

        for (outcome, score) in scores {
            residuals.push(model.signed_error(scale, outcome, score));
            if let (Some(tally), Some(classification)) =
                (misclassification.as_mut(), model.classify(outcome, score))
            {
                tally.record(classification);
            }
        }

        let (Some(mean_signed_bias), Some(rms_error)) = (residuals.mean(), residuals.rms()) else {
            return Err(AnalysisError::empty_group(group_id));
        };

        Ok(Self {
            group_id,
            count: residuals.count(),
            total_absolute_error: residuals.sum_abs(),
            mean_signed_bias,
            rms_error,
            misclassification,
        })
    }

    /// Mean absolute error; the misclassification rate under the threshold model.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_absolute_error(&self) -> f64 {
        self.total_absolute_error / self.count as f64
    }
}
