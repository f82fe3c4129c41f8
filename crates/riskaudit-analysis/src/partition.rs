use std::{collections::BTreeMap, fmt};

use crate::{
    dataset::{Dataset, ScoreColumns, ScoredRecord},
    error::AnalysisError,
    scale::RiskScale,
};

/// Keyword selecting every trait found in the data.
pub const ALL_TRAITS: &str = "ALL";

/// Which traits of the grouping attribute to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TraitSelection {
    /// Every distinct non-empty value of the attribute.
    #[default]
    All,
    /// Only the listed traits; each must match at least one row.
    Only(Vec<String>),
}

impl TraitSelection {
    /// Parses a comma-separated trait list, or the `ALL` keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_analysis::partition::TraitSelection;
    /// assert_eq!(TraitSelection::parse("ALL"), TraitSelection::All);
    /// assert_eq!(
    ///     TraitSelection::parse("African-American, Caucasian"),
    ///     TraitSelection::Only(vec!["African-American".into(), "Caucasian".into()])
    /// );
    /// ```
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split(','))
    }

    /// Builds a selection from individual names.
    ///
    /// An empty list, or one whose first name is `ALL`, selects every trait;
    /// the names after a leading `ALL` are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_analysis::partition::TraitSelection;
    /// assert_eq!(TraitSelection::from_names(["ALL", "White"]), TraitSelection::All);
    /// assert_eq!(
    ///     TraitSelection::from_names(["White", "ALL"]),
    ///     TraitSelection::Only(vec!["White".into(), "ALL".into()])
    /// );
    /// ```
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>();
        match names.first() {
            None => TraitSelection::All,
            Some(first) if first == ALL_TRAITS => TraitSelection::All,
            Some(_) => TraitSelection::Only(names),
        }
    }

    fn includes(&self, trait_name: &str) -> bool {
        match self {
            TraitSelection::All => true,
            TraitSelection::Only(names) => names.iter().any(|name| name == trait_name),
        }
    }
}

impl fmt::Display for TraitSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitSelection::All => f.write_str(ALL_TRAITS),
            TraitSelection::Only(names) => f.write_str(&names.join(", ")),
        }
    }
}

/// Records split into disjoint, non-empty groups by trait.
#[derive(Debug, Clone, Default)]
pub struct GroupPartition {
    groups: BTreeMap<String, Vec<ScoredRecord>>,
}

impl GroupPartition {
    /// Partitions the rows of a dataset by `columns.group`.
    ///
    /// Rows with an empty grouping attribute are skipped before their outcome
    /// and score are read, so they cannot fail the partition. Every other
    /// selected row must carry a valid outcome and in-range score.
    pub fn from_dataset(
        dataset: &Dataset,
        columns: &ScoreColumns,
        selection: &TraitSelection,
        scale: RiskScale,
    ) -> Result<Self, AnalysisError> {
        let indexes = columns.resolve(dataset)?;

        let mut records = vec![];
        let mut skipped = 0;
        for (row_number, row) in dataset.numbered_rows() {
            let Some(trait_name) = ScoredRecord::trait_of(row, &indexes) else {
                skipped += 1;
                continue;
            };
            if !selection.includes(trait_name) {
                continue;
            }
            records.push(ScoredRecord::from_row(
                row_number, row, trait_name, &indexes, columns, scale,
            )?);
        }
        if skipped > 0 {
            log::info!("skipped {skipped} rows without a value for '{}'", columns.group);
        }

        Self::from_records(records, selection)
    }

    /// Partitions already-parsed records.
    ///
    /// Records whose trait is not selected are dropped. Fails with
    /// [`AnalysisError::EmptyGroup`] if an explicitly selected trait has no record.
    pub fn from_records<I>(records: I, selection: &TraitSelection) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = ScoredRecord>,
    {
        let mut groups = BTreeMap::<String, Vec<ScoredRecord>>::new();
        for record in records {
            if record.trait_name.is_empty() || !selection.includes(&record.trait_name) {
                continue;
            }
            groups
                .entry(record.trait_name.clone())
                .or_default()
                .push(record);
        }

        if let TraitSelection::Only(names) = selection
            && let Some(missing) = names.iter().find(|name| !groups.contains_key(*name))
        {
            return Err(AnalysisError::empty_group(missing.as_str()));
        }

        log::debug!(
            "partitioned {} records into {} groups",
            groups.values().map(Vec::len).sum::<usize>(),
            groups.len()
        );
        Ok(Self { groups })
    }

    /// Groups keyed by trait, in trait order.
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<String, Vec<ScoredRecord>> {
        &self.groups
    }

    /// Members of one group.
    pub fn group(&self, trait_name: &str) -> Result<&[ScoredRecord], AnalysisError> {
        self.groups
            .get(trait_name)
            .map(Vec::as_slice)
            .ok_or_else(|| AnalysisError::empty_group(trait_name))
    }

    /// Every record of every group.
    pub fn population(&self) -> impl Iterator<Item = &ScoredRecord> {
        self.groups.values().flatten()
    }

    /// Records of the selected traits, concatenated in trait order.
    pub fn select(&self, selection: &TraitSelection) -> Result<Vec<&ScoredRecord>, AnalysisError> {
        match selection {
            TraitSelection::All => Ok(self.population().collect()),
            TraitSelection::Only(names) => {
                let mut records = vec![];
                for name in names {
                    records.extend(self.group(name)?);
                }
                Ok(records)
            }
        }
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Outcome;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|&s| s.to_owned()).collect()
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(
            strings(&["race", "two_year_recid", "decile_score"]),
            vec![
                strings(&["A", "1", "10"]),
                strings(&["A", "0", "1"]),
                strings(&["B", "1", "1"]),
                strings(&["B", "0", "10"]),
                strings(&["", "", ""]),
                strings(&["C", "0", "2"]),
            ],
        )
        .unwrap()
    }

    fn columns() -> ScoreColumns {
        ScoreColumns::new("race", "two_year_recid", "decile_score")
    }

    #[test]
    fn test_partition_all_traits() {
        let partition = GroupPartition::from_dataset(
            &sample_dataset(),
            &columns(),
            &TraitSelection::All,
            RiskScale::DECILE,
        )
        .unwrap();
        assert_eq!(
            partition.groups().keys().collect::<Vec<_>>(),
            vec!["A", "B", "C"]
        );
        assert_eq!(partition.population().count(), 5);
        assert_eq!(
            partition.group("B").unwrap()[0],
            ScoredRecord::new("B", Outcome::Event, 1)
        );
    }

    #[test]
    fn test_partition_selected_traits() {
        let partition = GroupPartition::from_dataset(
            &sample_dataset(),
            &columns(),
            &TraitSelection::parse("A, C"),
            RiskScale::DECILE,
        )
        .unwrap();
        assert_eq!(partition.len(), 2);
        assert!(partition.group("B").is_err());
    }

    #[test]
    fn test_unknown_trait_is_empty_group() {
        let err = GroupPartition::from_dataset(
            &sample_dataset(),
            &columns(),
            &TraitSelection::parse("A, Martian"),
            RiskScale::DECILE,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EmptyGroup {
                trait_name: "Martian".to_owned()
            }
        );
    }

    #[test]
    fn test_missing_score_column() {
        let columns = ScoreColumns::new("race", "two_year_recid", "v_decile_score");
        let err = GroupPartition::from_dataset(
            &sample_dataset(),
            &columns,
            &TraitSelection::All,
            RiskScale::DECILE,
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField { field, .. } if field == "v_decile_score"));
    }

    #[test]
    fn test_selection_parsing() {
        assert_eq!(TraitSelection::parse(""), TraitSelection::All);
        assert_eq!(TraitSelection::parse(" ALL "), TraitSelection::All);
        assert_eq!(TraitSelection::parse("ALL, White"), TraitSelection::All);
        assert_eq!(
            TraitSelection::parse("White, ALL"),
            TraitSelection::Only(vec!["White".to_owned(), "ALL".to_owned()])
        );
        assert_eq!(TraitSelection::parse("a,b").to_string(), "a, b");
    }

    #[test]
    fn test_select_concatenates_groups() {
        let partition = GroupPartition::from_records(
            [
                ScoredRecord::new("x", Outcome::Event, 3),
                ScoredRecord::new("y", Outcome::NoEvent, 4),
                ScoredRecord::new("x", Outcome::NoEvent, 5),
            ],
            &TraitSelection::All,
        )
        .unwrap();
        assert_eq!(partition.select(&TraitSelection::All).unwrap().len(), 3);
        assert_eq!(
            partition
                .select(&TraitSelection::parse("x"))
                .unwrap()
                .len(),
            2
        );
        assert!(partition.select(&TraitSelection::parse("z")).is_err());
    }
}
