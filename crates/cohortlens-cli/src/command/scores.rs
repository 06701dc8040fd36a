//! Satisfaction score tables

use anyhow::Context;
use clap::Args;
use cohortlens_analysis::score;
use cohortlens_stats::nps::BandDistribution;

use crate::util::InputArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct ScoresArg {
    #[command(flatten)]
    pub input: InputArg,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let (_config, store) = arg.input.load()?;
    let overall = score::overall_distribution(&store)
        .context("No response carries a recommendation score")?;
    let by_cohort = score::distribution_by_cohort(&store);

    println!("Satisfaction Scores ({} respondents)", store.len());
    println!("==========================================\n");

    print_header();
    print_row("All", Some(&overall));
    for cohort in store.known_cohorts() {
        print_row(cohort.as_str(), by_cohort.get(cohort));
    }

    if let Some(summary) = score::score_summary(&store) {
        println!();
        println!(
            "  Recommendation: mean {:.2}, median {:.1}, std dev {:.2} (min {}, max {})",
            summary.mean, summary.median, summary.std_dev, summary.min, summary.max
        );
    }
    Ok(())
}

fn print_header() {
    println!(
        "  {:<16} {:>7} {:>10} {:>10} {:>10} {:>8}",
        "Cohort", "Scored", "Promoter%", "Passive%", "Detract%", "Score"
    );
    println!("  {}", "-".repeat(66));
}

fn print_row(label: &str, distribution: Option<&BandDistribution>) {
    let Some(d) = distribution else {
        println!("  {label:<16} {:>7} {:>10} {:>10} {:>10} {:>8}", 0, "-", "-", "-", "N/A");
        return;
    };
    println!(
        "  {:<16} {:>7} {:>9.1}% {:>9.1}% {:>9.1}% {:>8.1}",
        label,
        d.counts.total(),
        d.promoter_pct,
        d.passive_pct,
        d.detractor_pct,
        d.satisfaction_score(),
    );
}
