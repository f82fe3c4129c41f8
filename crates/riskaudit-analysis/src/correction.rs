//! Mean-shift bias correction
//!
//! The corrector measures the bias of every group, shifts each member's score
//! to cancel it, and measures the shifted scores again with the same error
//! model.
//!
//! # Adjustment Rules
//!
//! - **Linear / Rms**: `adjusted = raw - group_bias`
//! - **BucketedLinear**: `adjusted = raw - bucket_bias`, with one bias per
//!   `(trait, raw score)` bucket
//! - **Threshold**: with `bias` the group's signed misclassification rate,
//!   false negatives become `raw + bias * HIGH`, false positives
//!   `raw - bias * HIGH`, correctly classified records keep their score; the
//!   result is re-classified at the same threshold
//!
//! A mean shift cancels the group's mean signed error by construction, but it
//! does not minimize absolute or RMS error: members far from the group mean
//! can end up with a larger error than before.
//!
//! The threshold rule scales the bias by `HIGH` and pushes false negatives up
//! by a positive bias (and down by a negative one). Its sign convention is the
//! opposite of the linear rule; it is kept as-is.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{
    bias::GroupStatistics,
    dataset::{Outcome, ScoredRecord},
    error::AnalysisError,
    error_model::{Classification, ErrorModel},
    partition::GroupPartition,
    scale::RiskScale,
};

/// `(trait, raw score)` bucket of the bucketed linear model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BucketKey {
    pub trait_name: String,
    pub raw_score: i32,
}

/// Key of a statistics table: a trait, or a bucket for the bucketed model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Trait(String),
    Bucket(BucketKey),
}

impl GroupKey {
    #[must_use]
    pub fn trait_name(&self) -> &str {
        match self {
            GroupKey::Trait(name) => name,
            GroupKey::Bucket(bucket) => &bucket.trait_name,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Trait(name) => f.write_str(name),
            GroupKey::Bucket(BucketKey {
                trait_name,
                raw_score,
            }) => write!(f, "{trait_name}_{raw_score}"),
        }
    }
}

/// A record's score before and after correction. The source record is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdjustedScore {
    pub outcome: Outcome,
    pub raw_score: i32,
    pub adjusted_score: f64,
}

/// Baseline and corrected statistics of every group of one correction run.
#[derive(Debug, Clone)]
pub struct CorrectionOutcome {
    pub model: ErrorModel,
    pub baseline: BTreeMap<GroupKey, GroupStatistics>,
    pub corrected: BTreeMap<GroupKey, GroupStatistics>,
    pub adjusted: BTreeMap<GroupKey, Vec<AdjustedScore>>,
    /// Baseline over all partitioned records (threshold model only)
    pub population: Option<GroupStatistics>,
}

/// Applies the mean-shift correction of one error model.
#[derive(Debug, Clone, Copy)]
pub struct Corrector {
    model: ErrorModel,
    scale: RiskScale,
}

impl Corrector {
    #[must_use]
    pub fn new(model: ErrorModel, scale: RiskScale) -> Self {
        Self { model, scale }
    }

    #[must_use]
    pub fn model(&self) -> ErrorModel {
        self.model
    }

    /// Adjusted score of one record given the bias of its group.
    #[must_use]
    pub fn adjust(&self, record: &ScoredRecord, group_bias: f64) -> f64 {
        let raw = f64::from(record.score);
        let Some(classification) = self.model.classify(record.outcome, raw) else {
            return raw - group_bias;
        };
        let shift = group_bias * f64::from(self.scale.high());
        match classification {
            Classification::FalseNegative => raw + shift,
            Classification::FalsePositive => raw - shift,
            Classification::Correct => raw,
        }
    }

    /// Measures the bias of one group.
    pub fn baseline(
        &self,
        group_id: &str,
        records: &[&ScoredRecord],
    ) -> Result<GroupStatistics, AnalysisError> {
        GroupStatistics::estimate(
            group_id,
            records.iter().map(|r| (r.outcome, f64::from(r.score))),
            self.model,
            self.scale,
        )
    }

    /// Shifts every member of a group by `group_bias` and re-measures it.
    pub fn correct_group(
        &self,
        group_id: &str,
        records: &[&ScoredRecord],
        group_bias: f64,
    ) -> Result<(Vec<AdjustedScore>, GroupStatistics), AnalysisError> {
        let adjusted = records
            .iter()
            .map(|record| AdjustedScore {
                outcome: record.outcome,
                raw_score: record.score,
                adjusted_score: self.adjust(record, group_bias),
            })
            .collect::<Vec<_>>();
        let stats = GroupStatistics::estimate(
            group_id,
            adjusted.iter().map(|a| (a.outcome, a.adjusted_score)),
            self.model,
            self.scale,
        )?;
        Ok((adjusted, stats))
    }

    /// Measures, corrects and re-measures every group of a partition.
    ///
    /// Groups are keyed by trait, or by `(trait, raw score)` for the bucketed
    /// model. The first failing group aborts the run. The threshold model's
    /// population statistics cover the same partition; see
    /// [`Corrector::correct_against`] to measure them on a wider one.
    pub fn correct(&self, partition: &GroupPartition) -> Result<CorrectionOutcome, AnalysisError> {
        self.correct_against(partition, partition)
    }

    /// Like [`Corrector::correct`], with the threshold model's population
    /// statistics measured over every record of `population` (usually the
    /// partition of all traits) instead of the selected groups only.
    pub fn correct_against(
        &self,
        partition: &GroupPartition,
        population: &GroupPartition,
    ) -> Result<CorrectionOutcome, AnalysisError> {
        let groups = self.keyed_groups(partition);

        let mut baseline = BTreeMap::new();
        let mut corrected = BTreeMap::new();
        let mut adjusted = BTreeMap::new();
        for (key, records) in groups {
            let group_id = key.to_string();
            let before = self.baseline(&group_id, &records)?;
            let (scores, after) =
                self.correct_group(&group_id, &records, before.mean_signed_bias)?;
            log::debug!(
                "{group_id}: n={} bias {:.3} -> {:.3}, abs error {:.3} -> {:.3}",
                before.count,
                before.mean_signed_bias,
                after.mean_signed_bias,
                before.total_absolute_error,
                after.total_absolute_error,
            );
            baseline.insert(key.clone(), before);
            corrected.insert(key.clone(), after);
            adjusted.insert(key, scores);
        }

        let population = match self.model {
            ErrorModel::Threshold { .. } => {
                let records = population.population().collect::<Vec<_>>();
                Some(self.baseline("ALL", &records)?)
            }
            _ => None,
        };

        Ok(CorrectionOutcome {
            model: self.model,
            baseline,
            corrected,
            adjusted,
            population,
        })
    }

    fn keyed_groups<'a>(
        &self,
        partition: &'a GroupPartition,
    ) -> BTreeMap<GroupKey, Vec<&'a ScoredRecord>> {
        let mut groups = BTreeMap::<GroupKey, Vec<&ScoredRecord>>::new();
        for (trait_name, records) in partition.groups() {
            for record in records {
                let key = if self.model.is_bucketed() {
                    GroupKey::Bucket(BucketKey {
                        trait_name: trait_name.clone(),
                        raw_score: record.score,
                    })
                } else {
                    GroupKey::Trait(trait_name.clone())
                };
                groups.entry(key).or_default().push(record);
            }
        }
        groups
    }
}
