//! Favorite session tables

use clap::Args;
use cohortlens_analysis::ranking::{self, MentionSatisfaction, SessionRanking};

use crate::util::InputArg;

#[derive(Debug, Clone, Args)]
pub(crate) struct SessionsArg {
    #[command(flatten)]
    pub input: InputArg,

    /// Only show the N highest-ranked sessions per cohort
    #[arg(long)]
    pub top: Option<usize>,
}

pub(crate) fn run(arg: &SessionsArg) -> anyhow::Result<()> {
    let (config, store) = arg.input.load()?;
    let ranker = config.ranker();
    let rankings = ranker.rank_all_cohorts(&store);
    let shown = arg.top.unwrap_or(usize::MAX);

    println!("Favorite Sessions (1 point per mention)");
    println!("==========================================\n");

    for cohort in store.known_cohorts() {
        let Some(ranking) = rankings.get(cohort) else {
            continue;
        };
        println!(
            "{cohort} ({} points, {} sessions)",
            ranking.total_points(),
            ranking.unique_session_count()
        );
        print_ranking(ranking, shown);
        println!();
    }

    println!("Satisfaction of Respondents per Session");
    println!("==========================================\n");

    println!(
        "  {:<40} {:<12} {:>8} {:>6} {:>6} {:>6} {:>8}",
        "Session", "Cohort", "Mentions", "Prom", "Pass", "Detr", "Score"
    );
    println!("  {}", "-".repeat(94));
    for session in ranking::session_satisfaction(&store, &ranker)
        .iter()
        .take(shown)
    {
        print_satisfaction_row(&session.title, "All", &session.overall);
        for (cohort, satisfaction) in &session.by_cohort {
            print_satisfaction_row("", cohort.as_str(), satisfaction);
        }
    }
    Ok(())
}

fn print_ranking(ranking: &SessionRanking, shown: usize) {
    if ranking.is_empty() {
        println!("  (no session preferences recorded)");
        return;
    }
    for (rank, entry) in ranking.entries().iter().take(shown).enumerate() {
        println!("  {:>3}. {:<48} {:>6}", rank + 1, entry.title, entry.points);
    }
    let hidden = ranking.unique_session_count().saturating_sub(shown);
    if hidden > 0 {
        println!("  ... {hidden} more");
    }
}

fn print_satisfaction_row(title: &str, cohort: &str, satisfaction: &MentionSatisfaction) {
    let score = satisfaction
        .score
        .map_or_else(|| "N/A".to_owned(), |s| format!("{s:.1}"));
    println!(
        "  {:<40} {:<12} {:>8} {:>6} {:>6} {:>6} {:>8}",
        title,
        cohort,
        satisfaction.mentions,
        satisfaction.bands.promoters,
        satisfaction.bands.passives,
        satisfaction.bands.detractors,
        score,
    );
}
