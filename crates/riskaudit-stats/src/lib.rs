//! Statistical helpers for the riskaudit project.
//!
//! This crate provides small, domain-free building blocks used by the bias
//! analysis engine:
//!
//! - **Residual summaries**: Accumulate signed residuals into mean, mean absolute and RMS values
//! - **Frequency tables**: Count occurrences of distinct values and express them as fractions
//! - **Cross tabulations**: Count co-occurrences of two categorical values
//!
//! # Modules
//!
//! - [`residual`]: Single-pass residual accumulation
//! - [`frequency`]: Value counts with fractions and count-ordered listing
//! - [`crosstab`]: Two-way contingency tables
//!
//! # Examples
//!
//! ## Summarizing residuals
//!
//! ```
//! use riskaudit_stats::residual::ResidualSummary;
//!
//! let summary = ResidualSummary::from_residuals([3.0, -3.0, 4.0, -4.0]);
//! assert_eq!(summary.count(), 4);
//! assert_eq!(summary.mean(), Some(0.0));
//! assert_eq!(summary.mean_absolute(), Some(3.5));
//! ```
//!
//! ## Counting values
//!
//! ```
//! use riskaudit_stats::frequency::FrequencyTable;
//!
//! let table = FrequencyTable::from_values(["a", "b", "a", "a"]);
//! assert_eq!(table.count(&"a"), 3);
//! assert_eq!(table.fraction(&"b"), Some(0.25));
//! ```
//!
//! ## Cross tabulating
//!
//! ```
//! use riskaudit_stats::crosstab::CrossTab;
//!
//! let table = CrossTab::from_pairs([(1, true), (1, false), (2, true)]);
//! assert_eq!(table.get(&1, &true), 1);
//! assert_eq!(table.row_total(&1), 2);
//! ```

pub mod crosstab;
pub mod frequency;
pub mod residual;
