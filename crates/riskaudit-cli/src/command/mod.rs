use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use riskaudit_analysis::{
    dataset::DEFAULT_OUTCOME_COLUMN,
    error_model::{DEFAULT_THRESHOLD, ErrorModel},
    partition::{ALL_TRAITS, TraitSelection},
    scale::RiskScale,
};

use self::{
    correct_for::CorrectForArg,
    plot::{PlotRecidArg, PlotThresholdArg, SweepThresholdArg},
    trait_breakdown::TraitBreakdownArg,
};

mod analyzer;
mod correct_for;
mod plot;
mod report;
mod shell;
mod trait_breakdown;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Count the rows carrying each value of a column
    TraitBreakdown(#[clap(flatten)] TraitBreakdownArg),
    /// Measure per-group bias of a score and correct it
    CorrectFor(#[clap(flatten)] CorrectForArg),
    /// Same as `correct-for --model rms`
    CorrectForRms(#[clap(flatten)] CorrectionArg),
    /// Count misclassifications at every decision threshold
    SweepThreshold(#[clap(flatten)] SweepThresholdArg),
    /// Chart outcome counts per score value of one trait
    PlotRecid(#[clap(flatten)] PlotRecidArg),
    /// Chart false positives against false negatives per threshold
    PlotThreshold(#[clap(flatten)] PlotThresholdArg),
    /// Interactive analyzer shell
    Shell(#[clap(flatten)] DatasetArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::TraitBreakdown(arg) => trait_breakdown::run(&arg)?,
        Mode::CorrectFor(arg) => correct_for::run(&arg.correction, arg.model)?,
        Mode::CorrectForRms(arg) => correct_for::run(&arg, ModelKind::Rms)?,
        Mode::SweepThreshold(arg) => plot::run_sweep(&arg)?,
        Mode::PlotRecid(arg) => plot::run_recid(&arg)?,
        Mode::PlotThreshold(arg) => plot::run_threshold(&arg)?,
        Mode::Shell(arg) => shell::run(&arg)?,
    }
    Ok(())
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DatasetArg {
    /// Path to the CSV dataset (first row is the header)
    pub dataset: PathBuf,

    #[clap(flatten)]
    pub options: AnalysisOptions,

    /// Print charts as text instead of opening a terminal view
    #[arg(long)]
    pub text: bool,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalysisOptions {
    /// Column holding the binary outcome
    #[arg(long, default_value = DEFAULT_OUTCOME_COLUMN)]
    pub outcome_column: String,

    /// Lowest score of the risk scale
    #[arg(long, default_value_t = RiskScale::DECILE.low(), allow_negative_numbers = true)]
    pub low: i32,

    /// Highest score of the risk scale
    #[arg(long, default_value_t = RiskScale::DECILE.high(), allow_negative_numbers = true)]
    pub high: i32,

    /// Decision threshold; scores above it are high risk
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i32,
}

/// Arguments shared by the correction commands
#[derive(Debug, Clone, Args)]
pub(crate) struct CorrectionArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,

    /// Score column to audit
    #[arg(long)]
    pub score: String,

    /// Attribute to group records by
    #[arg(long)]
    pub group: String,

    /// Traits to analyze (comma-separated), or ALL
    #[arg(long, value_delimiter = ',', default_value = ALL_TRAITS)]
    pub traits: Vec<String>,

    /// Chart baseline against corrected error
    #[arg(long)]
    pub plot: bool,

    /// Write a JSON report to this path (`-` writes it to stdout instead of the text report)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl CorrectionArg {
    pub(crate) fn selection(&self) -> TraitSelection {
        TraitSelection::from_names(&self.traits)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModelKind {
    /// Signed distance to the ideal score, averaged per trait
    #[default]
    Linear,
    /// Linear error aggregated as root mean square
    Rms,
    /// Linear error per trait and raw score
    Bucketed,
    /// Misclassifications at the decision threshold
    Threshold,
}

impl ModelKind {
    pub(crate) fn error_model(self, threshold: i32) -> ErrorModel {
        match self {
            ModelKind::Linear => ErrorModel::Linear,
            ModelKind::Rms => ErrorModel::Rms,
            ModelKind::Bucketed => ErrorModel::BucketedLinear,
            ModelKind::Threshold => ErrorModel::Threshold { threshold },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_correct_for() {
        let args = CommandArgs::try_parse_from([
            "riskaudit",
            "correct-for",
            "compas.csv",
            "--score",
            "decile_score",
            "--group",
            "race",
            "--traits",
            "African-American,Caucasian",
            "--model",
            "threshold",
            "--threshold",
            "5",
        ])
        .unwrap();
        let Mode::CorrectFor(arg) = args.mode else {
            panic!("expected correct-for");
        };
        assert_eq!(arg.model, ModelKind::Threshold);
        assert_eq!(
            arg.correction.selection(),
            TraitSelection::Only(vec!["African-American".into(), "Caucasian".into()])
        );
        let options = &arg.correction.dataset.options;
        assert_eq!(options.outcome_column, "two_year_recid");
        assert_eq!((options.low, options.high), (1, 10));
        assert_eq!(
            arg.model.error_model(options.threshold),
            ErrorModel::Threshold { threshold: 5 }
        );
    }

    #[test]
    fn test_traits_default_to_all() {
        let args = CommandArgs::try_parse_from([
            "riskaudit",
            "correct-for-rms",
            "compas.csv",
            "--score",
            "decile_score",
            "--group",
            "sex",
        ])
        .unwrap();
        let Mode::CorrectForRms(arg) = args.mode else {
            panic!("expected correct-for-rms");
        };
        assert_eq!(arg.selection(), TraitSelection::All);
        assert!(arg.output.is_none());
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory as _;
        CommandArgs::command().debug_assert();
    }
}
