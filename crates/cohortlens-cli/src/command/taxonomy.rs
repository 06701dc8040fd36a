use std::path::PathBuf;

use clap::Args;
use cohortlens_analysis::taxonomy::CategoryTaxonomy;

use crate::util::Output;

#[derive(Debug, Clone, Args)]
pub(crate) struct TaxonomyArg {
    /// Output file path (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TaxonomyArg) -> anyhow::Result<()> {
    Output::save_json(
        &CategoryTaxonomy::default_improvements(),
        arg.output.as_deref(),
    )
}
