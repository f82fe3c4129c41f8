//! Tabular input data
//!
//! A [`Dataset`] is a header row plus string-valued rows, as produced by a CSV
//! reader. Analysis code never works on the raw strings directly: the three
//! columns it needs (grouping attribute, outcome, score) are named by a
//! [`ScoreColumns`] and parsed into [`ScoredRecord`]s.
//!
//! # Data Structure
//!
//! ```text
//! Dataset
//! ├─ headers: ["id", "race", "two_year_recid", "decile_score", ...]
//! └─ rows
//!     ├─ ["1", "Caucasian", "0", "3", ...]
//!     └─ ["2", "",          "1", "9", ...]   <- no trait, excluded from groups
//! ```

use serde::Serialize;

use crate::{
    error::{AnalysisError, FieldLocation},
    scale::RiskScale,
};

/// Column name of the observed outcome in the reference recidivism dataset.
pub const DEFAULT_OUTCOME_COLUMN: &str = "two_year_recid";

/// A table of string cells with named columns.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Creates a dataset, checking that every row is as wide as the header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, AnalysisError> {
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(AnalysisError::DatasetShape {
                row: i + 1,
                expected: headers.len(),
                found: row.len(),
            });
        }
        Ok(Self { headers, rows })
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the named column in the header.
    pub fn column_index(&self, field: &str) -> Result<usize, AnalysisError> {
        self.headers
            .iter()
            .position(|header| header == field)
            .ok_or_else(|| AnalysisError::missing_field(field, FieldLocation::Header))
    }

    /// Trimmed values of one column, `None` for empty cells.
    pub fn column(&self, field: &str) -> Result<impl Iterator<Item = Option<&str>>, AnalysisError> {
        let index = self.column_index(field)?;
        Ok(self.rows.iter().map(move |row| non_empty(&row[index])))
    }

    /// Iterates rows with their 1-based row numbers.
    pub(crate) fn numbered_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i + 1, row.as_slice()))
    }
}

fn non_empty(cell: &str) -> Option<&str> {
    let cell = cell.trim();
    (!cell.is_empty()).then_some(cell)
}

/// Names of the columns an analysis reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreColumns {
    /// Categorical attribute records are grouped by (e.g. `race`)
    pub group: String,
    /// Binary outcome column (`1` = the event occurred)
    pub outcome: String,
    /// Integer risk score column (e.g. `decile_score`)
    pub score: String,
}

impl ScoreColumns {
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        outcome: impl Into<String>,
        score: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            outcome: outcome.into(),
            score: score.into(),
        }
    }

    pub(crate) fn resolve(&self, dataset: &Dataset) -> Result<ColumnIndexes, AnalysisError> {
        Ok(ColumnIndexes {
            group: dataset.column_index(&self.group)?,
            outcome: dataset.column_index(&self.outcome)?,
            score: dataset.column_index(&self.score)?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnIndexes {
    pub(crate) group: usize,
    outcome: usize,
    score: usize,
}

/// Observed ground truth for one individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Outcome {
    /// The event did not occur (`0`).
    NoEvent,
    /// The event occurred (`1`).
    Event,
}

impl Outcome {
    /// Parses `0`/`1` (also `0.0`/`1.0` and `false`/`true`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" | "1.0" | "true" | "True" => Some(Outcome::Event),
            "0" | "0.0" | "false" | "False" => Some(Outcome::NoEvent),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_event(self) -> bool {
        matches!(self, Outcome::Event)
    }

    /// `1` for [`Outcome::Event`], `0` otherwise.
    #[must_use]
    pub fn as_indicator(self) -> u8 {
        u8::from(self.is_event())
    }
}

impl From<bool> for Outcome {
    fn from(occurred: bool) -> Self {
        if occurred {
            Outcome::Event
        } else {
            Outcome::NoEvent
        }
    }
}

/// One individual: grouping trait, observed outcome and assigned score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredRecord {
    pub trait_name: String,
    pub outcome: Outcome,
    pub score: i32,
}

impl ScoredRecord {
    #[must_use]
    pub fn new(trait_name: impl Into<String>, outcome: Outcome, score: i32) -> Self {
        Self {
            trait_name: trait_name.into(),
            outcome,
            score,
        }
    }

    /// Reads the trait of a row, `None` when the cell is empty.
    pub(crate) fn trait_of<'a>(row: &'a [String], indexes: &ColumnIndexes) -> Option<&'a str> {
        non_empty(&row[indexes.group])
    }

    pub(crate) fn from_row(
        row_number: usize,
        row: &[String],
        trait_name: &str,
        indexes: &ColumnIndexes,
        columns: &ScoreColumns,
        scale: RiskScale,
    ) -> Result<Self, AnalysisError> {
        let outcome_cell = non_empty(&row[indexes.outcome]).ok_or_else(|| {
            AnalysisError::missing_field(&columns.outcome, FieldLocation::Row(row_number))
        })?;
        let outcome = Outcome::parse(outcome_cell).ok_or_else(|| AnalysisError::InvalidValue {
            field: columns.outcome.clone(),
            row: row_number,
            value: outcome_cell.to_owned(),
            reason: "expected 0 or 1",
        })?;

        let score_cell = non_empty(&row[indexes.score]).ok_or_else(|| {
            AnalysisError::missing_field(&columns.score, FieldLocation::Row(row_number))
        })?;
        let invalid_score = |reason| AnalysisError::InvalidValue {
            field: columns.score.clone(),
            row: row_number,
            value: score_cell.to_owned(),
            reason,
        };
        let score = parse_score(score_cell).ok_or_else(|| invalid_score("expected an integer"))?;
        if !scale.contains(score) {
            return Err(invalid_score("outside the risk scale"));
        }

        Ok(Self::new(trait_name, outcome, score))
    }
}

/// Accepts plain integers and integral floats such as `7.0`.
#[expect(clippy::cast_possible_truncation)]
fn parse_score(cell: &str) -> Option<i32> {
    if let Ok(score) = cell.parse::<i32>() {
        return Some(score);
    }
    let value = cell.parse::<f64>().ok()?;
    (value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX)).then_some(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = Dataset::new(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::DatasetShape {
                row: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_missing_header_is_reported() {
        let dataset = Dataset::new(strings(&["race"]), vec![]).unwrap();
        let err = dataset.column_index("decile_score").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingField {
                field: "decile_score".to_owned(),
                location: FieldLocation::Header,
            }
        );
        assert_eq!(
            err.to_string(),
            "Missing field 'decile_score' in dataset header"
        );
    }

    #[test]
    fn test_column_values_are_trimmed() {
        let dataset = Dataset::new(
            strings(&["race"]),
            vec![strings(&[" White "]), strings(&["  "])],
        )
        .unwrap();
        let values = dataset.column("race").unwrap().collect::<Vec<_>>();
        assert_eq!(values, vec![Some("White"), None]);
    }

    #[test]
    fn test_outcome_parse() {
        assert_eq!(Outcome::parse("1"), Some(Outcome::Event));
        assert_eq!(Outcome::parse(" 0 "), Some(Outcome::NoEvent));
        assert_eq!(Outcome::parse("1.0"), Some(Outcome::Event));
        assert_eq!(Outcome::parse("2"), None);
        assert_eq!(Outcome::from(true).as_indicator(), 1);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("7"), Some(7));
        assert_eq!(parse_score("7.0"), Some(7));
        assert_eq!(parse_score("7.5"), None);
        assert_eq!(parse_score("high"), None);
    }

    #[test]
    fn test_record_from_row_errors() {
        let columns = ScoreColumns::new("race", "two_year_recid", "decile_score");
        let dataset = Dataset::new(
            strings(&["race", "two_year_recid", "decile_score"]),
            vec![
                strings(&["A", "1", ""]),
                strings(&["A", "yes", "3"]),
                strings(&["A", "0", "11"]),
                strings(&["A", "0", "4"]),
            ],
        )
        .unwrap();
        let indexes = columns.resolve(&dataset).unwrap();
        let results = dataset
            .numbered_rows()
            .map(|(n, row)| {
                ScoredRecord::from_row(n, row, "A", &indexes, &columns, RiskScale::DECILE)
            })
            .collect::<Vec<_>>();

        assert_eq!(
            results[0],
            Err(AnalysisError::MissingField {
                field: "decile_score".to_owned(),
                location: FieldLocation::Row(1),
            })
        );
        assert!(matches!(
            &results[1],
            Err(AnalysisError::InvalidValue { field, row: 2, .. }) if field == "two_year_recid"
        ));
        assert!(matches!(
            &results[2],
            Err(AnalysisError::InvalidValue { reason: "outside the risk scale", .. })
        ));
        assert_eq!(
            results[3],
            Ok(ScoredRecord::new("A", Outcome::NoEvent, 4))
        );
    }
}
