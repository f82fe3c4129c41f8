use std::io;

use clap::Args;

use crate::{
    command::{
        CorrectionArg, ModelKind,
        analyzer::{Analyzer, CorrectionRequest},
    },
    schema::report::CorrectionReport,
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CorrectForArg {
    #[clap(flatten)]
    pub correction: CorrectionArg,

    /// Error model used to measure and correct bias
    #[arg(long, value_enum, default_value_t)]
    pub model: ModelKind,
}

pub(crate) fn run(arg: &CorrectionArg, model: ModelKind) -> anyhow::Result<()> {
    let mut analyzer = Analyzer::load(&arg.dataset)?;
    let request = CorrectionRequest {
        score_column: &arg.score,
        group_column: &arg.group,
        selection: arg.selection(),
        model: model.error_model(analyzer.settings().threshold),
        plot: arg.plot,
    };

    let outcome = if util::is_stdout(arg.output.as_deref()) {
        analyzer.correct_for(&request, &mut io::sink())?
    } else {
        analyzer.correct_for(&request, &mut io::stdout().lock())?
    };

    if let Some(output_path) = &arg.output {
        let report =
            CorrectionReport::new(&arg.score, &arg.group, analyzer.settings().scale, &outcome);
        util::save_json(&report, output_path)?;
        log::info!("Correction report saved to {}", output_path.display());
    }
    Ok(())
}
