//! Bias measurement and correction for risk scores across groups
//!
//! This crate audits an integer risk score (e.g. a recidivism decile) for
//! systematic over- or under-scoring of the groups defined by one categorical
//! attribute, and produces a bias-adjusted version of the score.
//!
//! # Overview
//!
//! ## Correction Workflow
//!
//! 1. **Load Rows** ([`dataset::Dataset`]): Header plus string cells, e.g. read from CSV
//! 2. **Partition** ([`partition::GroupPartition`]): Split records by trait, rejecting empty groups
//! 3. **Measure** ([`bias::GroupStatistics`]): Per-group absolute error and signed bias
//!    under an [`error_model::ErrorModel`]
//! 4. **Correct** ([`correction::Corrector`]): Shift each score by its group's bias
//!    and measure again
//!
//! ## Threshold Workflow
//!
//! 1. **Partition** ([`partition::GroupPartition`]): As above
//! 2. **Sweep** ([`threshold::ThresholdSweep`]): False positives and false negatives
//!    at every integer threshold, and the threshold with the fewest misclassifications
//!
//! ## Exploration
//!
//! - **Breakdown** ([`breakdown::TraitBreakdown`]): Counts and shares of each trait of a column
//!
//! # Examples
//!
//! ```
//! use riskaudit_analysis::{
//!     correction::{Corrector, GroupKey},
//!     dataset::{Dataset, ScoreColumns},
//!     error_model::ErrorModel,
//!     partition::{GroupPartition, TraitSelection},
//!     scale::RiskScale,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let row = |cells: [&str; 3]| cells.map(str::to_owned).to_vec();
//! let dataset = Dataset::new(
//!     row(["race", "two_year_recid", "decile_score"]),
//!     vec![
//!         row(["A", "1", "10"]),
//!         row(["A", "0", "1"]),
//!         row(["B", "1", "1"]),
//!         row(["B", "0", "10"]),
//!     ],
//! )?;
//!
//! let columns = ScoreColumns::new("race", "two_year_recid", "decile_score");
//! let scale = RiskScale::DECILE;
//! let partition = GroupPartition::from_dataset(&dataset, &columns, &TraitSelection::All, scale)?;
//!
//! let outcome = Corrector::new(ErrorModel::Linear, scale).correct(&partition)?;
//! let b = &outcome.baseline[&GroupKey::Trait("B".to_owned())];
//! assert_eq!(b.mean_signed_bias, 0.0);
//! assert_eq!(b.total_absolute_error, 18.0);
//! # Ok(())
//! # }
//! ```

pub mod bias;
pub mod breakdown;
pub mod correction;
pub mod dataset;
pub mod error;
pub mod error_model;
pub mod partition;
pub mod scale;
pub mod threshold;

pub use self::error::AnalysisError;
