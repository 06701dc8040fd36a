//! Verbatim feedback from the lowest scorers

use clap::Args;
use cohortlens_analysis::feedback::{self, ScoredFeedback};

use crate::util::InputArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct FeedbackArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Number of responses to show (defaults to the configured count)
    #[arg(long)]
    pub count: Option<usize>,

    /// List every detractor (scores 0-6) in input order instead
    #[arg(long, conflicts_with = "count")]
    pub detractors: bool,
}

pub(crate) fn run(arg: &FeedbackArg) -> anyhow::Result<()> {
    let (config, store) = arg.input.load()?;

    if arg.detractors {
        let detractors = feedback::detractor_feedback(&store);
        println!("What Detractors Are Saying ({} responses)", detractors.len());
        println!("==========================================\n");
        print_feedback(&detractors);
    } else {
        let count = arg.count.unwrap_or(config.lowest_score_count);
        let lowest = feedback::lowest_scores(&store, count);
        println!("Lowest Scores ({} of {count} requested)", lowest.len());
        println!("==========================================\n");
        print_feedback(&lowest);
    }
    Ok(())
}

fn print_feedback(entries: &[ScoredFeedback]) {
    println!("  {:>5} {:<12} {:<12} Suggestion", "Score", "Cohort", "ID");
    println!("  {}", "-".repeat(60));
    for entry in entries {
        println!(
            "  {:>5} {:<12} {:<12} {}",
            entry.score,
            entry.cohort,
            entry.id,
            entry.improvement_text.as_deref().unwrap_or("-"),
        );
    }
}
