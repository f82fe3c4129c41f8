use riskaudit_analysis::{
    bias::GroupStatistics,
    correction::{AdjustedScore, CorrectionOutcome, GroupKey},
    error_model::ErrorModel,
    scale::RiskScale,
    threshold::{ThresholdPoint, ThresholdSweep},
};
use serde::Serialize;

/// Machine-readable result of a `correct-for` run
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionReport<'a> {
    /// Score column that was corrected
    pub score_column: &'a str,
    /// Attribute the records were grouped by
    pub group_column: &'a str,
    pub scale: RiskScale,
    pub model: ErrorModel,
    /// Baseline over every analyzed record (threshold model only)
    pub population: Option<&'a GroupStatistics>,
    /// One entry per group (or per trait and score for the bucketed model), in key order
    pub groups: Vec<GroupReport<'a>>,
}

/// Baseline and corrected statistics of one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport<'a> {
    pub key: &'a GroupKey,
    pub baseline: &'a GroupStatistics,
    pub corrected: &'a GroupStatistics,
    pub adjusted_scores: &'a [AdjustedScore],
}

impl<'a> CorrectionReport<'a> {
    pub fn new(
        score_column: &'a str,
        group_column: &'a str,
        scale: RiskScale,
        outcome: &'a CorrectionOutcome,
    ) -> Self {
        let groups = outcome
            .baseline
            .iter()
            .filter_map(|(key, baseline)| {
                Some(GroupReport {
                    key,
                    baseline,
                    corrected: outcome.corrected.get(key)?,
                    adjusted_scores: outcome
                        .adjusted
                        .get(key)
                        .map(Vec::as_slice)
                        .unwrap_or_default(),
                })
            })
            .collect();
        Self {
            score_column,
            group_column,
            scale,
            model: outcome.model,
            population: outcome.population.as_ref(),
            groups,
        }
    }
}

/// Machine-readable result of a threshold sweep
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdReport<'a> {
    pub population: &'a str,
    pub best: Option<&'a ThresholdPoint>,
    pub points: &'a [ThresholdPoint],
}

impl<'a> ThresholdReport<'a> {
    pub fn new(sweep: &'a ThresholdSweep) -> Self {
        Self {
            population: sweep.population(),
            best: sweep.best(),
            points: sweep.points(),
        }
    }
}

#[cfg(test)]
mod tests {
    use riskaudit_analysis::{
        correction::Corrector,
        dataset::{Outcome, ScoredRecord},
        partition::{GroupPartition, TraitSelection},
    };

    use super::*;

    #[test]
    fn test_bucketed_report_keys_serialize_as_objects() {
        let partition = GroupPartition::from_records(
            [
                ScoredRecord::new("A", Outcome::Event, 4),
                ScoredRecord::new("A", Outcome::NoEvent, 4),
            ],
            &TraitSelection::All,
        )
        .unwrap();
        let outcome = Corrector::new(ErrorModel::BucketedLinear, RiskScale::DECILE)
            .correct(&partition)
            .unwrap();
        let report = CorrectionReport::new("decile_score", "race", RiskScale::DECILE, &outcome);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["model"]["kind"], "bucketed_linear");
        assert_eq!(json["groups"][0]["key"]["trait_name"], "A");
        assert_eq!(json["groups"][0]["key"]["raw_score"], 4);
        assert_eq!(json["groups"][0]["adjusted_scores"].as_array().unwrap().len(), 2);
        assert!(json["population"].is_null());
    }
}
