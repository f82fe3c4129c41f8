/// Running sums over a stream of signed residuals.
///
/// A residual is the signed difference between an observed value and the
/// value that was expected for it. The summary keeps the sums needed to
/// derive the mean residual (bias), the mean absolute residual and the
/// population root-mean-square residual in a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResidualSummary {
    count: usize,
    sum: f64,
    sum_abs: f64,
    sum_sq: f64,
}

impl ResidualSummary {
    /// Creates an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a summary from an iterator of residuals.
    ///
    /// # Examples
    ///
    /// ```
    /// # use riskaudit_stats::residual::ResidualSummary;
    /// let summary = ResidualSummary::from_residuals([1.0, -2.0]);
    /// assert_eq!(summary.sum(), -1.0);
    /// assert_eq!(summary.sum_abs(), 3.0);
    /// assert_eq!(summary.sum_sq(), 5.0);
    /// ```
    #[must_use]
    pub fn from_residuals<I>(residuals: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut summary = Self::new();
        for residual in residuals {
            summary.push(residual);
        }
        summary
    }

    /// Adds one residual.
    pub fn push(&mut self, residual: f64) {
        self.count += 1;
        self.sum += residual;
        self.sum_abs += residual.abs();
        self.sum_sq += residual * residual;
    }

    /// Number of residuals seen so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sum of signed residuals.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Sum of absolute residuals.
    #[must_use]
    pub fn sum_abs(&self) -> f64 {
        self.sum_abs
    }

    /// Sum of squared residuals.
    #[must_use]
    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Mean signed residual, or `None` when no residual was pushed.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Mean absolute residual, or `None` when no residual was pushed.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_absolute(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_abs / self.count as f64)
    }

    /// Population root-mean-square residual (divides by `n`, not `n - 1`).
    ///
    /// Returns `None` when no residual was pushed.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn rms(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.sum_sq / self.count as f64).sqrt())
    }
}

impl Extend<f64> for ResidualSummary {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for residual in iter {
            self.push(residual);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = ResidualSummary::new();
        assert!(summary.is_empty());
        assert_eq!(summary.mean(), None);
        assert_eq!(summary.mean_absolute(), None);
        assert_eq!(summary.rms(), None);
    }

    #[test]
    fn test_rms_of_equal_magnitudes_matches_mean_absolute() {
        let summary = ResidualSummary::from_residuals([2.0, -2.0, 2.0]);
        let mae = summary.mean_absolute().unwrap();
        let rms = summary.rms().unwrap();
        assert!((mae - rms).abs() < 1e-12);
    }

    #[test]
    fn test_rms_dominates_mean_absolute() {
        let summary = ResidualSummary::from_residuals([0.0, 1.0, -5.0]);
        assert!(summary.rms().unwrap() > summary.mean_absolute().unwrap());
    }

    #[test]
    fn test_extend_matches_from_residuals() {
        let mut extended = ResidualSummary::new();
        extended.extend([1.5, -0.5]);
        assert_eq!(extended, ResidualSummary::from_residuals([1.5, -0.5]));
        assert_eq!(extended.mean(), Some(0.5));
    }
}
