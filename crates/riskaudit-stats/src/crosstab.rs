use std::collections::{BTreeMap, BTreeSet};

/// Two-way contingency table counting `(row, column)` co-occurrences.
///
/// Rows and columns are kept in key order. Cells never observed read as zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossTab<R, C> {
    cells: BTreeMap<R, BTreeMap<C, usize>>,
    columns: BTreeSet<C>,
}

impl<R, C> Default for CrossTab<R, C> {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
            columns: BTreeSet::new(),
        }
    }
}

impl<R, C> CrossTab<R, C>
where
    R: Ord,
    C: Ord + Clone,
{
    /// Builds a table from `(row, column)` observations.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
    {
        let mut table = Self::default();
        for (row, column) in pairs {
            table.insert(row, column);
        }
        table
    }

    /// Records one observation.
    pub fn insert(&mut self, row: R, column: C) {
        self.columns.insert(column.clone());
        *self.cells.entry(row).or_default().entry(column).or_default() += 1;
    }

    /// Count of observations in the given cell.
    #[must_use]
    pub fn get(&self, row: &R, column: &C) -> usize {
        self.cells
            .get(row)
            .and_then(|columns| columns.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all cells in one row.
    #[must_use]
    pub fn row_total(&self, row: &R) -> usize {
        self.cells
            .get(row)
            .map_or(0, |columns| columns.values().sum())
    }

    /// Rows in key order.
    pub fn row_keys(&self) -> impl Iterator<Item = &R> {
        self.cells.keys()
    }

    /// Every column seen in any row, in key order.
    pub fn column_keys(&self) -> impl Iterator<Item = &C> {
        self.columns.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cells_read_zero() {
        let table = CrossTab::from_pairs([(3, 0), (3, 0), (7, 1)]);
        assert_eq!(table.get(&3, &0), 2);
        assert_eq!(table.get(&3, &1), 0);
        assert_eq!(table.get(&5, &0), 0);
        assert_eq!(table.row_total(&5), 0);
    }

    #[test]
    fn test_keys_are_sorted() {
        let table = CrossTab::from_pairs([(9, 'b'), (1, 'a'), (4, 'c')]);
        assert_eq!(table.row_keys().copied().collect::<Vec<_>>(), vec![1, 4, 9]);
        assert_eq!(
            table.column_keys().copied().collect::<Vec<_>>(),
            vec!['a', 'b', 'c']
        );
    }
}
