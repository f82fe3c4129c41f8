use riskaudit_stats::frequency::FrequencyTable;

use crate::{dataset::Dataset, error::AnalysisError};

/// Occurrence count of every distinct value of one attribute.
///
/// Rows where the attribute is empty are not counted and do not contribute
/// to the denominator of [`TraitBreakdown::fraction`].
#[derive(Debug, Clone)]
pub struct TraitBreakdown {
    attribute: String,
    table: FrequencyTable<String>,
}

impl TraitBreakdown {
    pub fn from_dataset(dataset: &Dataset, attribute: &str) -> Result<Self, AnalysisError> {
        let table = FrequencyTable::from_values(dataset.column(attribute)?.flatten().map(str::to_owned));
        log::debug!(
            "column {attribute}: {} distinct traits in {} defined rows",
            table.len(),
            table.total()
        );
        Ok(Self {
            attribute: attribute.to_owned(),
            table,
        })
    }

    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Number of rows where the attribute is present.
    #[must_use]
    pub fn total_defined_rows(&self) -> usize {
        self.table.total()
    }

    #[must_use]
    pub fn count(&self, trait_name: &str) -> usize {
        self.table.count(&trait_name.to_owned())
    }

    /// Share of the defined rows carrying `trait_name`.
    #[must_use]
    pub fn fraction(&self, trait_name: &str) -> Option<f64> {
        self.table.fraction(&trait_name.to_owned())
    }

    /// Distinct traits in name order.
    pub fn traits(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// `(trait, count)` pairs, most frequent first.
    #[must_use]
    pub fn sorted_by_count(&self) -> Vec<(&str, usize)> {
        self.table
            .sorted_by_count()
            .into_iter()
            .map(|(name, count)| (name.as_str(), count))
            .collect()
    }
}
