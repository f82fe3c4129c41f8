use std::collections::BTreeMap;

/// Occurrence counts of distinct values.
///
/// Keys are stored in a [`BTreeMap`], so iteration is in key order. Use
/// [`FrequencyTable::sorted_by_count`] for the most-frequent-first listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<K> {
    counts: BTreeMap<K, usize>,
    total: usize,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<K> FrequencyTable<K>
where
    K: Ord,
{
    /// Counts every value produced by the iterator.
    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut table = Self::default();
        for value in values {
            table.insert(value);
        }
        table
    }

    /// Records one occurrence of `value`.
    pub fn insert(&mut self, value: K) {
        *self.counts.entry(value).or_default() += 1;
        self.total += 1;
    }

    /// Number of occurrences of `value` (zero when never seen).
    #[must_use]
    pub fn count(&self, value: &K) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    /// Share of all occurrences taken by `value`, in `[0, 1]`.
    ///
    /// Returns `None` when the table is empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fraction(&self, value: &K) -> Option<f64> {
        (self.total > 0).then(|| self.count(value) as f64 / self.total as f64)
    }

    /// Entries ordered by descending count, ties broken by ascending key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_stats::frequency::FrequencyTable;
    /// let table = FrequencyTable::from_values(["x", "y", "y", "z", "z"]);
    /// let sorted = table.sorted_by_count();
    /// assert_eq!(sorted, vec![(&"y", 2), (&"z", 2), (&"x", 1)]);
    /// ```
    #[must_use]
    pub fn sorted_by_count(&self) -> Vec<(&K, usize)> {
        let mut entries = self
            .counts
            .iter()
            .map(|(key, count)| (key, *count))
            .collect::<Vec<_>>();
        // stable sort keeps key order among equal counts
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<K> FrequencyTable<K> {
    /// Total number of recorded occurrences.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(value, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    /// Iterates the distinct values in key order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.counts.keys()
    }
}
