//! Improvement category tables

use clap::Args;
use cohortlens_analysis::{
    categorize::CategoryTally, response::ParticipantResponse, taxonomy::category_label,
};

use crate::util::InputArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct ImprovementsArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Only categorize suggestions from detractors (scores 0-6)
    #[arg(long)]
    pub detractors_only: bool,
}

pub(crate) fn run(arg: &ImprovementsArg) -> anyhow::Result<()> {
    let (config, store) = arg.input.load()?;
    let categorizer = config.categorizer();
    let field = &config.improvement_field;
    let included = |r: &&ParticipantResponse| !arg.detractors_only || is_detractor(r);

    let scope = if arg.detractors_only {
        "detractors"
    } else {
        "all respondents"
    };
    println!("Improvement Suggestions ({scope}, field: {field})");
    println!("==========================================\n");

    let overall =
        categorizer.categorize_responses(store.all_responses().iter().filter(included), field);
    print_tally("All", &overall);
    for cohort in store.known_cohorts() {
        let tally =
            categorizer.categorize_responses(store.responses_for_cohort(cohort).filter(included), field);
        print_tally(cohort.as_str(), &tally);
    }
    Ok(())
}

fn is_detractor(response: &ParticipantResponse) -> bool {
    response.band().is_some_and(|band| band.is_detractor())
}

fn print_tally(label: &str, tally: &CategoryTally) {
    println!("{label} ({} mentions)", tally.total_mentions());
    if tally.is_empty() {
        println!("  (no categorized suggestions)");
    }
    for (name, count) in tally.ranked() {
        println!("  {:<24} {count:>6}", category_label(name));
    }
    println!();
}
