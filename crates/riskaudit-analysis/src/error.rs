use std::fmt;

/// Where a required field was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// The dataset header row.
    Header,
    /// A data row, numbered from 1 (the header is not counted).
    Row(usize),
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLocation::Header => f.write_str("dataset header"),
            FieldLocation::Row(row) => write!(f, "row {row}"),
        }
    }
}

/// Errors raised while partitioning, estimating or correcting a dataset.
///
/// Every error aborts the whole operation: no partially populated statistics
/// are returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("No members found in group {trait_name}")]
    EmptyGroup { trait_name: String },
    #[display("Missing field '{field}' in {location}")]
    MissingField {
        field: String,
        location: FieldLocation,
    },
    #[display("Invalid value '{value}' for field '{field}' in row {row}: {reason}")]
    InvalidValue {
        field: String,
        row: usize,
        value: String,
        reason: &'static str,
    },
    #[display("Invalid risk scale: {reason}")]
    InvalidScale { reason: String },
    #[display("Row {row} has {found} fields, expected {expected}")]
    DatasetShape {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl AnalysisError {
    pub(crate) fn empty_group(trait_name: impl Into<String>) -> Self {
        AnalysisError::EmptyGroup {
            trait_name: trait_name.into(),
        }
    }

    pub(crate) fn missing_field(field: impl Into<String>, location: FieldLocation) -> Self {
        AnalysisError::MissingField {
            field: field.into(),
            location,
        }
    }
}
