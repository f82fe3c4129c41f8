use std::{io, path::PathBuf};

use clap::Args;
use riskaudit_analysis::partition::{ALL_TRAITS, TraitSelection};

use crate::{
    command::{DatasetArg, analyzer::Analyzer, report},
    schema::report::ThresholdReport,
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct PlotRecidArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,

    /// Attribute to group records by
    #[arg(long)]
    pub group: String,

    /// Trait whose records are charted
    #[arg(long = "trait")]
    pub trait_name: String,

    /// Score column to chart
    #[arg(long)]
    pub score: String,
}

/// Records selection shared by the threshold commands
#[derive(Debug, Clone, Args)]
pub(crate) struct ThresholdTargetArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,

    /// Attribute to group records by
    #[arg(long)]
    pub group: String,

    /// Traits whose records are pooled (comma-separated), or ALL
    #[arg(long, value_delimiter = ',', default_value = ALL_TRAITS)]
    pub traits: Vec<String>,

    /// Score column to classify
    #[arg(long)]
    pub score: String,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct SweepThresholdArg {
    #[clap(flatten)]
    pub target: ThresholdTargetArg,

    /// Write a JSON report to this path (`-` writes it to stdout instead of the table)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct PlotThresholdArg {
    #[clap(flatten)]
    pub target: ThresholdTargetArg,
}

pub(crate) fn run_recid(arg: &PlotRecidArg) -> anyhow::Result<()> {
    let mut analyzer = Analyzer::load(&arg.dataset)?;
    analyzer.plot_recid(&arg.group, &arg.trait_name, &arg.score)
}

pub(crate) fn run_sweep(arg: &SweepThresholdArg) -> anyhow::Result<()> {
    let ThresholdTargetArg {
        dataset,
        group,
        traits,
        score,
    } = &arg.target;
    let analyzer = Analyzer::load(dataset)?;
    let sweep = analyzer.sweep_threshold(group, &TraitSelection::from_names(traits), score)?;

    if !util::is_stdout(arg.output.as_deref()) {
        report::print_sweep(&mut io::stdout().lock(), &sweep)?;
    }
    if let Some(output_path) = &arg.output {
        util::save_json(&ThresholdReport::new(&sweep), output_path)?;
        log::info!("Threshold report saved to {}", output_path.display());
    }
    Ok(())
}

pub(crate) fn run_threshold(arg: &PlotThresholdArg) -> anyhow::Result<()> {
    let ThresholdTargetArg {
        dataset,
        group,
        traits,
        score,
    } = &arg.target;
    let mut analyzer = Analyzer::load(dataset)?;
    analyzer.plot_threshold(
        group,
        &TraitSelection::from_names(traits),
        score,
        &mut io::stdout().lock(),
    )
}
