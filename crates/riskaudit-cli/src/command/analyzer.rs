use std::io::{self, Write};

use riskaudit_analysis::{
    breakdown::TraitBreakdown,
    correction::{CorrectionOutcome, Corrector},
    dataset::{Dataset, ScoreColumns},
    error_model::ErrorModel,
    partition::{GroupPartition, TraitSelection},
    scale::RiskScale,
    threshold::ThresholdSweep,
};

use crate::{
    command::{AnalysisOptions, DatasetArg, report},
    ui::{
        RenderSink, TextSink, TuiSink,
        figure::{self, Figure},
    },
    util,
};

/// Options applied to every analysis of a loaded dataset
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub outcome_column: String,
    pub scale: RiskScale,
    pub threshold: i32,
}

impl Settings {
    pub(crate) fn from_options(options: &AnalysisOptions) -> anyhow::Result<Self> {
        Ok(Self {
            outcome_column: options.outcome_column.clone(),
            scale: RiskScale::new(options.low, options.high)?,
            threshold: options.threshold,
        })
    }
}

/// A correction to run on the loaded dataset
#[derive(Debug, Clone)]
pub(crate) struct CorrectionRequest<'a> {
    pub score_column: &'a str,
    pub group_column: &'a str,
    pub selection: TraitSelection,
    pub model: ErrorModel,
    pub plot: bool,
}

/// Loaded dataset plus the settings and chart sink shared by the CLI commands and the shell
pub(crate) struct Analyzer {
    dataset: Dataset,
    settings: Settings,
    sink: Box<dyn RenderSink>,
}

impl Analyzer {
    pub(crate) fn new(dataset: Dataset, settings: Settings, sink: Box<dyn RenderSink>) -> Self {
        Self {
            dataset,
            settings,
            sink,
        }
    }

    pub(crate) fn load(arg: &DatasetArg) -> anyhow::Result<Self> {
        let settings = Settings::from_options(&arg.options)?;

        log::info!("Loading dataset from {}...", arg.dataset.display());
        let dataset = util::read_dataset(&arg.dataset)?;
        log::info!(
            "Loaded {} rows with {} columns",
            dataset.len(),
            dataset.headers().len()
        );

        let sink: Box<dyn RenderSink> = if arg.text {
            Box::new(TextSink::new(io::stdout()))
        } else {
            Box::new(TuiSink)
        };
        Ok(Self::new(dataset, settings, sink))
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    fn columns(&self, group_column: &str, score_column: &str) -> ScoreColumns {
        ScoreColumns::new(group_column, &self.settings.outcome_column, score_column)
    }

    fn partition(
        &self,
        group_column: &str,
        score_column: &str,
        selection: &TraitSelection,
    ) -> anyhow::Result<GroupPartition> {
        let columns = self.columns(group_column, score_column);
        Ok(GroupPartition::from_dataset(
            &self.dataset,
            &columns,
            selection,
            self.settings.scale,
        )?)
    }

    pub(crate) fn trait_breakdown(&self, column: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        let breakdown = TraitBreakdown::from_dataset(&self.dataset, column)?;
        report::print_breakdown(out, &breakdown)?;
        Ok(())
    }

    /// Measures and corrects the bias of every selected group, printing the report to `out`.
    pub(crate) fn correct_for(
        &mut self,
        request: &CorrectionRequest<'_>,
        out: &mut dyn Write,
    ) -> anyhow::Result<CorrectionOutcome> {
        let partition = self.partition(
            request.group_column,
            request.score_column,
            &request.selection,
        )?;
        log::info!(
            "Correcting {} for {} groups of {} with the {} model",
            request.score_column,
            partition.len(),
            request.group_column,
            request.model
        );
        let corrector = Corrector::new(request.model, self.settings.scale);
        let outcome = match (request.model, &request.selection) {
            // population error is reported across all traits, not only the selected ones
            (ErrorModel::Threshold { .. }, TraitSelection::Only(_)) => {
                let everyone = self.partition(
                    request.group_column,
                    request.score_column,
                    &TraitSelection::All,
                )?;
                corrector.correct_against(&partition, &everyone)?
            }
            _ => corrector.correct(&partition)?,
        };
        report::print_correction(out, &outcome)?;
        if request.plot {
            self.render(&figure::correction_errors(&outcome))?;
        }
        Ok(outcome)
    }

    pub(crate) fn plot_recid(
        &mut self,
        group_column: &str,
        trait_name: &str,
        score_column: &str,
    ) -> anyhow::Result<()> {
        let selection = TraitSelection::Only(vec![trait_name.to_owned()]);
        let partition = self.partition(group_column, score_column, &selection)?;
        let records = partition.select(&selection)?;
        let figure = figure::outcome_counts(records, group_column, trait_name, score_column);
        self.render(&figure)
    }

    /// Sweeps every threshold of the scale over the selected traits.
    pub(crate) fn sweep_threshold(
        &self,
        group_column: &str,
        selection: &TraitSelection,
        score_column: &str,
    ) -> anyhow::Result<ThresholdSweep> {
        let partition = self.partition(group_column, score_column, selection)?;
        let records = partition.select(selection)?;
        let scale = self.settings.scale;
        Ok(ThresholdSweep::run(
            &selection.to_string(),
            records,
            scale,
            scale.default_thresholds(),
        )?)
    }

    pub(crate) fn plot_threshold(
        &mut self,
        group_column: &str,
        selection: &TraitSelection,
        score_column: &str,
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let sweep = self.sweep_threshold(group_column, selection, score_column)?;
        report::print_sweep(out, &sweep)?;
        self.render(&figure::threshold_tradeoff(&sweep))
    }

    fn render(&mut self, figure: &Figure) -> anyhow::Result<()> {
        self.sink.render(figure)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use riskaudit_analysis::{AnalysisError, correction::GroupKey};

    use super::*;

    /// Keeps the titles of rendered figures.
    #[derive(Debug, Clone, Default)]
    struct RecordingSink(Rc<RefCell<Vec<String>>>);

    impl RenderSink for RecordingSink {
        fn render(&mut self, figure: &Figure) -> anyhow::Result<()> {
            self.0.borrow_mut().push(figure.title().to_owned());
            Ok(())
        }
    }

    fn analyzer() -> (Analyzer, RecordingSink) {
        let row = |cells: [&str; 3]| cells.map(str::to_owned).to_vec();
        let dataset = Dataset::new(
            row(["race", "two_year_recid", "decile_score"]),
            vec![
                row(["Caucasian", "1", "8"]),
                row(["Caucasian", "0", "2"]),
                row(["African-American", "0", "7"]),
                row(["African-American", "1", "9"]),
                row(["", "1", "not a score"]),
            ],
        )
        .unwrap();
        let settings = Settings {
            outcome_column: "two_year_recid".to_owned(),
            scale: RiskScale::DECILE,
            threshold: 4,
        };
        let sink = RecordingSink::default();
        (Analyzer::new(dataset, settings, Box::new(sink.clone())), sink)
    }

    #[test]
    fn test_correct_for_skips_rows_without_trait() {
        let (mut analyzer, sink) = analyzer();
        let request = CorrectionRequest {
            score_column: "decile_score",
            group_column: "race",
            selection: TraitSelection::All,
            model: ErrorModel::Linear,
            plot: true,
        };
        let mut out = vec![];
        let outcome = analyzer.correct_for(&request, &mut out).unwrap();

        assert_eq!(outcome.baseline.len(), 2);
        let caucasian = &outcome.baseline[&GroupKey::Trait("Caucasian".to_owned())];
        assert_eq!(caucasian.count, 2);
        assert!(String::from_utf8(out).unwrap().contains("For group Caucasian"));
        assert_eq!(sink.0.borrow().len(), 1);
    }

    #[test]
    fn test_unknown_trait_is_empty_group() {
        let (mut analyzer, _) = analyzer();
        let request = CorrectionRequest {
            score_column: "decile_score",
            group_column: "race",
            selection: TraitSelection::parse("Hispanic"),
            model: ErrorModel::Rms,
            plot: false,
        };
        let err = analyzer.correct_for(&request, &mut io::sink()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::EmptyGroup {
                trait_name: "Hispanic".to_owned()
            })
        );
    }

    #[test]
    fn test_plot_recid_renders_one_trait() {
        let (mut analyzer, sink) = analyzer();
        analyzer
            .plot_recid("race", "Caucasian", "decile_score")
            .unwrap();
        assert_eq!(
            sink.0.borrow().as_slice(),
            ["Decile_score, Race = Caucasian"]
        );
    }

    #[test]
    fn test_threshold_population_spans_all_traits() {
        let (mut analyzer, _) = analyzer();
        let request = CorrectionRequest {
            score_column: "decile_score",
            group_column: "race",
            selection: TraitSelection::parse("Caucasian"),
            model: ErrorModel::Threshold { threshold: 4 },
            plot: false,
        };
        let mut out = vec![];
        let outcome = analyzer.correct_for(&request, &mut out).unwrap();

        assert_eq!(outcome.baseline.len(), 1);
        // four rows carry a race; the fifth is skipped
        let population = outcome.population.unwrap();
        assert_eq!(population.count, 4);
        assert_eq!(population.mean_absolute_error(), 0.25);
        assert!(
            String::from_utf8(out)
                .unwrap()
                .starts_with("Normalized error across all groups: 0.250\n")
        );
    }

    #[test]
    fn test_plot_recid_takes_all_as_a_trait_name() {
        let (mut analyzer, sink) = analyzer();
        let err = analyzer
            .plot_recid("race", "ALL", "decile_score")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::EmptyGroup {
                trait_name: "ALL".to_owned()
            })
        );
        assert!(sink.0.borrow().is_empty());
    }

    #[test]
    fn test_plot_threshold_prints_sweep() {
        let (mut analyzer, sink) = analyzer();
        let mut out = vec![];
        analyzer
            .plot_threshold("race", &TraitSelection::All, "decile_score", &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Threshold sweep for ALL\n"));
        assert!(text.contains("Best threshold: 7 "));
        assert_eq!(sink.0.borrow().len(), 1);
    }
}
