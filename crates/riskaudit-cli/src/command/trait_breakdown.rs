use clap::Args;

use crate::command::{DatasetArg, analyzer::Analyzer};

#[derive(Debug, Clone, Args)]
pub(crate) struct TraitBreakdownArg {
    #[clap(flatten)]
    pub dataset: DatasetArg,

    /// Column to break down
    #[arg(long)]
    pub column: String,
}

pub(crate) fn run(arg: &TraitBreakdownArg) -> anyhow::Result<()> {
    let analyzer = Analyzer::load(&arg.dataset)?;
    analyzer.trait_breakdown(&arg.column, &mut std::io::stdout().lock())
}
