use clap::{Parser, Subcommand};

use self::{
    feedback::FeedbackArg, improvements::ImprovementsArg, report::ReportArg, scores::ScoresArg,
    sessions::SessionsArg, taxonomy::TaxonomyArg,
};

mod feedback;
mod improvements;
mod report;
mod scores;
mod sessions;
mod taxonomy;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug events, including skipped rows
    #[arg(short, long, global = true)]
    verbose: bool,

    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Assemble the full survey report as JSON
    Report(#[clap(flatten)] ReportArg),
    /// Print satisfaction scores overall and per cohort
    Scores(#[clap(flatten)] ScoresArg),
    /// Print improvement categories overall and per cohort
    Improvements(#[clap(flatten)] ImprovementsArg),
    /// Print favorite session rankings per cohort
    Sessions(#[clap(flatten)] SessionsArg),
    /// Print verbatim feedback from the lowest scorers
    Feedback(#[clap(flatten)] FeedbackArg),
    /// Write the default improvement taxonomy as JSON
    Taxonomy(#[clap(flatten)] TaxonomyArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.quiet, args.verbose)?;
    match args.mode {
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Scores(arg) => scores::run(&arg)?,
        Mode::Improvements(arg) => improvements::run(&arg)?,
        Mode::Sessions(arg) => sessions::run(&arg)?,
        Mode::Feedback(arg) => feedback::run(&arg)?,
        Mode::Taxonomy(arg) => taxonomy::run(&arg)?,
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("COHORTLENS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
