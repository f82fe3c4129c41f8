use serde::Serialize;

use crate::{
    bias::GroupStatistics, dataset::ScoredRecord, error::AnalysisError,
    error_model::ErrorModel, scale::RiskScale,
};

/// Classification quality of a population at one decision threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdPoint {
    pub threshold: i32,
    pub false_positive_count: usize,
    pub false_negative_count: usize,
    /// Misclassification rate
    pub error: f64,
    /// Signed misclassification rate (`(FP - FN) / n`)
    pub bias: f64,
}

impl ThresholdPoint {
    fn from_statistics(threshold: i32, stats: &GroupStatistics) -> Self {
        let tally = stats.misclassification.unwrap_or_default();
        Self {
            threshold,
            false_positive_count: tally.false_positive_count,
            false_negative_count: tally.false_negative_count,
            error: stats.mean_absolute_error(),
            bias: stats.mean_signed_bias,
        }
    }

    #[must_use]
    pub fn misclassified(&self) -> usize {
        self.false_positive_count + self.false_negative_count
    }
}

/// False positive / false negative trade-off over a range of thresholds.
#[derive(Debug, Clone)]
pub struct ThresholdSweep {
    population: String,
    points: Vec<ThresholdPoint>,
}

impl ThresholdSweep {
    /// Classifies `records` at every threshold in iteration order.
    ///
    /// `population` names the swept records in logs and errors (a trait, or `ALL`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_analysis::{dataset::{Outcome, ScoredRecord}, scale::RiskScale, threshold::ThresholdSweep};
    /// let records = [
    ///     ScoredRecord::new("A", Outcome::Event, 8),
    ///     ScoredRecord::new("A", Outcome::NoEvent, 3),
    /// ];
    /// let scale = RiskScale::DECILE;
    /// let sweep = ThresholdSweep::run("A", &records, scale, scale.default_thresholds()).unwrap();
    /// assert_eq!(sweep.points().len(), 9);
    /// assert_eq!(sweep.best().unwrap().threshold, 3);
    /// ```
    pub fn run<'a, R, T>(
        population: &str,
        records: R,
        scale: RiskScale,
        thresholds: T,
    ) -> Result<Self, AnalysisError>
    where
        R: IntoIterator<Item = &'a ScoredRecord>,
        T: IntoIterator<Item = i32>,
    {
        let records = records.into_iter().collect::<Vec<_>>();
        if records.is_empty() {
            return Err(AnalysisError::empty_group(population));
        }

        let points = thresholds
            .into_iter()
            .map(|threshold| {
                let stats = GroupStatistics::estimate(
                    population,
                    records.iter().map(|r| (r.outcome, f64::from(r.score))),
                    ErrorModel::Threshold { threshold },
                    scale,
                )?;
                Ok::<_, AnalysisError>(ThresholdPoint::from_statistics(threshold, &stats))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sweep = Self {
            population: population.to_owned(),
            points,
        };
        if let Some(best) = sweep.best() {
            log::debug!(
                "{population}: best threshold {} with {} misclassified of {}",
                best.threshold,
                best.misclassified(),
                records.len()
            );
        }
        Ok(sweep)
    }

    #[must_use]
    pub fn population(&self) -> &str {
        &self.population
    }

    /// Points in sweep order.
    #[must_use]
    pub fn points(&self) -> &[ThresholdPoint] {
        &self.points
    }

    /// Point with the fewest misclassifications; the earliest one on ties.
    #[must_use]
    pub fn best(&self) -> Option<&ThresholdPoint> {
        self.points.iter().reduce(|best, point| {
            if point.misclassified() < best.misclassified() {
                point
            } else {
                best
            }
        })
    }

    #[must_use]
    pub fn point(&self, threshold: i32) -> Option<&ThresholdPoint> {
        self.points.iter().find(|p| p.threshold == threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Outcome;

    fn records(pairs: &[(u8, i32)]) -> Vec<ScoredRecord> {
        pairs
            .iter()
            .map(|&(outcome, score)| ScoredRecord::new("G", Outcome::from(outcome == 1), score))
            .collect()
    }

    fn sweep(pairs: &[(u8, i32)]) -> ThresholdSweep {
        let scale = RiskScale::DECILE;
        ThresholdSweep::run("G", &records(pairs), scale, scale.default_thresholds()).unwrap()
    }

    #[test]
    fn test_counts_are_monotonic() {
        let sweep = sweep(&[
            (1, 2),
            (1, 5),
            (1, 9),
            (0, 1),
            (0, 4),
            (0, 6),
            (0, 8),
            (1, 7),
        ]);
        for pair in sweep.points().windows(2) {
            let (lower, higher) = (&pair[0], &pair[1]);
            assert!(lower.threshold < higher.threshold);
            assert!(lower.false_positive_count >= higher.false_positive_count);
            assert!(lower.false_negative_count <= higher.false_negative_count);
        }
    }

    #[test]
    fn test_point_statistics() {
        let sweep = sweep(&[(1, 3), (0, 7), (1, 5), (0, 2)]);
        let point = sweep.point(4).unwrap();
        assert_eq!(point.false_negative_count, 1);
        assert_eq!(point.false_positive_count, 1);
        assert_eq!(point.error, 0.5);
        assert_eq!(point.bias, 0.0);
        assert!(sweep.point(10).is_none());
    }

    #[test]
    fn test_best_prefers_lowest_threshold_on_ties() {
        // perfectly separated anywhere in 3..=6
        let sweep = sweep(&[(0, 3), (1, 7)]);
        let best = sweep.best().unwrap();
        assert_eq!(best.threshold, 3);
        assert_eq!(best.misclassified(), 0);
        assert_eq!(sweep.point(6).unwrap().misclassified(), 0);
    }

    #[test]
    fn test_empty_population_fails() {
        let err = ThresholdSweep::run("ALL", &[], RiskScale::DECILE, 1..=9).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EmptyGroup {
                trait_name: "ALL".to_owned()
            }
        );
    }

    #[test]
    fn test_empty_threshold_range_has_no_best() {
        let sweep = ThresholdSweep::run("G", &records(&[(1, 5)]), RiskScale::DECILE, 5..5).unwrap();
        assert!(sweep.points().is_empty());
        assert!(sweep.best().is_none());
        assert_eq!(sweep.population(), "G");
    }
}
