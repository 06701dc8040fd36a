use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use cohortlens_analysis::report::SurveyReport;

use crate::util::{InputArg, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Output file path (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ReportArg) -> anyhow::Result<()> {
    let (config, store) = arg.input.load()?;
    let report =
        SurveyReport::assemble(&store, &config).context("Failed to assemble survey report")?;
    Output::save_json(&report, arg.output.as_deref())
}
