//! Chart data handed to a [`RenderSink`](super::RenderSink)
//!
//! Figures are plain labeled series; building them does not touch the terminal.

use riskaudit_analysis::{
    bias::GroupStatistics, correction::CorrectionOutcome, dataset::ScoredRecord,
    error_model::ErrorModel, threshold::ThresholdSweep,
};
use riskaudit_stats::crosstab::CrossTab;

#[derive(Debug, Clone, PartialEq)]
pub enum Figure {
    Bars(BarFigure),
    Scatter(ScatterFigure),
}

impl Figure {
    pub fn title(&self) -> &str {
        match self {
            Figure::Bars(bars) => &bars.title,
            Figure::Scatter(scatter) => &scatter.title,
        }
    }
}

/// Grouped bar chart: one value per series in every group.
#[derive(Debug, Clone, PartialEq)]
pub struct BarFigure {
    pub title: String,
    pub y_label: String,
    /// Name of each bar within a group, in bar order
    pub series: Vec<String>,
    pub groups: Vec<BarGroupData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarGroupData {
    pub label: String,
    /// One value per entry of [`BarFigure::series`]
    pub values: Vec<f64>,
}

impl BarFigure {
    /// Largest value of any bar, used to scale the chart.
    pub fn max_value(&self) -> f64 {
        self.groups
            .iter()
            .flat_map(|group| group.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterFigure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<LabeledPoint>,
    /// Index of the point to emphasize
    pub highlight: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl ScatterFigure {
    /// Axis bounds covering every point, starting at zero.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let x_max = self.points.iter().map(|p| p.x).fold(0.0, f64::max);
        let y_max = self.points.iter().map(|p| p.y).fold(0.0, f64::max);
        ([0.0, x_max.max(1.0)], [0.0, y_max.max(1.0)])
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Outcome counts per score value of one trait.
///
/// One bar group per score; the bars count outcome `0` and outcome `1`.
#[expect(clippy::cast_precision_loss)]
pub fn outcome_counts<'a, I>(
    records: I,
    group_column: &str,
    trait_name: &str,
    score_column: &str,
) -> Figure
where
    I: IntoIterator<Item = &'a ScoredRecord>,
{
    let table = CrossTab::from_pairs(
        records
            .into_iter()
            .map(|record| (record.score, record.outcome.as_indicator())),
    );
    let groups = table
        .row_keys()
        .map(|score| BarGroupData {
            label: format!("{score} ({})", table.row_total(score)),
            values: vec![
                table.get(score, &0) as f64,
                table.get(score, &1) as f64,
            ],
        })
        .collect();

    Figure::Bars(BarFigure {
        title: format!(
            "{}, {} = {}",
            capitalize(score_column),
            capitalize(group_column),
            capitalize(trait_name)
        ),
        y_label: "Count".to_owned(),
        series: vec!["outcome 0".to_owned(), "outcome 1".to_owned()],
        groups,
    })
}

/// Baseline against corrected absolute error of every group.
///
/// Buckets show their total absolute error and the RMS model its RMS error.
/// The linear and threshold models show the mean absolute error, which is the
/// misclassification rate under the threshold model.
pub fn correction_errors(outcome: &CorrectionOutcome) -> Figure {
    let error_of = |stats: &GroupStatistics| match outcome.model {
        ErrorModel::BucketedLinear => stats.total_absolute_error,
        ErrorModel::Rms => stats.rms_error,
        _ => stats.mean_absolute_error(),
    };
    let groups = outcome
        .baseline
        .iter()
        .filter_map(|(key, baseline)| {
            let corrected = outcome.corrected.get(key)?;
            Some(BarGroupData {
                label: key.to_string(),
                values: vec![error_of(baseline), error_of(corrected)],
            })
        })
        .collect();

    Figure::Bars(BarFigure {
        title: format!("Baseline vs corrected error ({})", outcome.model),
        y_label: "Absolute Errors".to_owned(),
        series: vec!["Baseline".to_owned(), "Corrected".to_owned()],
        groups,
    })
}

/// False positives against false negatives at every swept threshold.
#[expect(clippy::cast_precision_loss)]
pub fn threshold_tradeoff(sweep: &ThresholdSweep) -> Figure {
    let best = sweep.best().map(|best| best.threshold);
    let points = sweep
        .points()
        .iter()
        .map(|point| LabeledPoint {
            label: format!("t={}", point.threshold),
            x: point.false_positive_count as f64,
            y: point.false_negative_count as f64,
        })
        .collect();
    let highlight = best.and_then(|best| sweep.points().iter().position(|p| p.threshold == best));

    Figure::Scatter(ScatterFigure {
        title: format!("Threshold trade-off, {}", sweep.population()),
        x_label: "False positives".to_owned(),
        y_label: "False negatives".to_owned(),
        points,
        highlight,
    })
}
