//! Report assembly
//!
//! Packages every analytic output for one response store into a single
//! [`SurveyReport`]. The assembler adds no logic of its own beyond running the
//! components and collecting their results.
//!
//! Per-cohort work runs on the rayon thread pool. Cohorts do not interact and
//! results are collected into ordered maps, so the report is identical to one
//! computed sequentially.
//!
//! # Configuration
//!
//! [`ReportConfig`] deserializes from JSON; every field is optional:
//!
//! ```json
//! {
//!   "improvement_field": "improvement",
//!   "favorite_field": "favorite_session",
//!   "second_favorite_field": { "answer": "Runner-up session" },
//!   "taxonomy": [{ "name": "hands_on", "keywords": ["hands on", "labs"] }],
//!   "lowest_score_count": 5,
//!   "longest_feedback_count": 3
//! }
//! ```

use std::collections::BTreeMap;

use cohortlens_stats::{
    descriptive::DescriptiveStats,
    nps::{BandDistribution, InsufficientDataError},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    categorize::{CategoryTally, TextCategorizer},
    feedback::{self, ScoredFeedback},
    ranking::{self, CohortRankings, SessionRanker, SessionRanking, SessionSatisfaction},
    response::{Cohort, ResponseField},
    score,
    store::{ColumnMapping, ResponseStore},
    taxonomy::CategoryTaxonomy,
};

/// Settings for [`SurveyReport::assemble`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Input column names, used when loading the store
    pub columns: ColumnMapping,
    /// Free-text field to categorize
    pub improvement_field: ResponseField,
    /// Field holding the first session preference
    pub favorite_field: ResponseField,
    /// Field holding the second session preference
    pub second_favorite_field: ResponseField,
    /// Improvement categories and their keywords
    pub taxonomy: CategoryTaxonomy,
    /// Number of lowest-scoring responses to quote
    pub lowest_score_count: usize,
    /// Number of long detractor suggestions to quote per cohort
    pub longest_feedback_count: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            improvement_field: ResponseField::Improvement,
            favorite_field: ResponseField::FavoriteSession,
            second_favorite_field: ResponseField::SecondFavoriteSession,
            taxonomy: CategoryTaxonomy::default_improvements(),
            lowest_score_count: 5,
            longest_feedback_count: 3,
        }
    }
}

impl ReportConfig {
    #[must_use]
    pub fn categorizer(&self) -> TextCategorizer {
        TextCategorizer::new(self.taxonomy.clone())
    }

    #[must_use]
    pub fn ranker(&self) -> SessionRanker {
        SessionRanker::new(
            self.favorite_field.clone(),
            self.second_favorite_field.clone(),
        )
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ReportError {
    #[display("cannot compute the overall satisfaction score: {_0}")]
    OverallScore(InsufficientDataError),
}

/// Every analytic output for one response store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyReport {
    pub respondents: usize,
    pub overall_score: f64,
    pub score_by_cohort: BTreeMap<Cohort, f64>,
    pub distribution: BandDistribution,
    pub distribution_by_cohort: BTreeMap<Cohort, BandDistribution>,
    pub score_summary: DescriptiveStats,
    pub score_summary_by_cohort: BTreeMap<Cohort, DescriptiveStats>,
    pub category_tally_overall: CategoryTally,
    pub category_tally_by_cohort: BTreeMap<Cohort, CategoryTally>,
    pub session_ranking_by_cohort: CohortRankings,
    pub session_satisfaction: Vec<SessionSatisfaction>,
    pub lowest_scores: Vec<ScoredFeedback>,
    pub longest_detractor_feedback: BTreeMap<Cohort, Vec<ScoredFeedback>>,
}

struct CohortSection {
    cohort: Cohort,
    score: Option<f64>,
    distribution: Option<BandDistribution>,
    summary: Option<DescriptiveStats>,
    tally: CategoryTally,
    ranking: SessionRanking,
}

impl SurveyReport {
    /// Runs every component over `store`.
    ///
    /// Fails when no response carries a recommendation score, since the
    /// report is meaningless without the overall score.
    pub fn assemble(store: &ResponseStore, config: &ReportConfig) -> Result<Self, ReportError> {
        let overall_score = score::overall_score(store)?;
        let distribution = score::overall_distribution(store)?;
        let score_summary = score::score_summary(store).ok_or(InsufficientDataError)?;

        let categorizer = config.categorizer();
        let ranker = config.ranker();
        let category_tally_overall =
            categorizer.categorize_overall(store, &config.improvement_field);

        let sections = store
            .known_cohorts()
            .par_iter()
            .map(|cohort| {
                let responses = store.responses_for_cohort(cohort).collect::<Vec<_>>();
                // cohorts without scores are omitted, as in `score::score_by_cohort`
                CohortSection {
                    cohort: cohort.clone(),
                    score: score::score(responses.iter().copied()).ok(),
                    distribution: score::distribution(responses.iter().copied()).ok(),
                    summary: DescriptiveStats::new(
                        responses
                            .iter()
                            .filter_map(|r| r.recommendation_score)
                            .map(f64::from),
                    ),
                    tally: categorizer
                        .categorize_responses(responses.iter().copied(), &config.improvement_field),
                    ranking: ranker.rank(responses.iter().copied()),
                }
            })
            .collect::<Vec<_>>();

        let mut score_by_cohort = BTreeMap::new();
        let mut distribution_by_cohort = BTreeMap::new();
        let mut score_summary_by_cohort = BTreeMap::new();
        let mut category_tally_by_cohort = BTreeMap::new();
        let mut rankings = Vec::with_capacity(sections.len());
        for section in sections {
            if let Some(score) = section.score {
                score_by_cohort.insert(section.cohort.clone(), score);
            }
            if let Some(distribution) = section.distribution {
                distribution_by_cohort.insert(section.cohort.clone(), distribution);
            }
            if let Some(summary) = section.summary {
                score_summary_by_cohort.insert(section.cohort.clone(), summary);
            }
            category_tally_by_cohort.insert(section.cohort.clone(), section.tally);
            rankings.push((section.cohort, section.ranking));
        }

        tracing::debug!(
            respondents = store.len(),
            cohorts = store.known_cohorts().len(),
            "survey report assembled"
        );

        Ok(Self {
            respondents: store.len(),
            overall_score,
            score_by_cohort,
            distribution,
            distribution_by_cohort,
            score_summary,
            score_summary_by_cohort,
            category_tally_overall,
            category_tally_by_cohort,
            session_ranking_by_cohort: rankings.into_iter().collect(),
            session_satisfaction: ranking::session_satisfaction(store, &ranker),
            lowest_scores: feedback::lowest_scores(store, config.lowest_score_count),
            longest_detractor_feedback: feedback::longest_detractor_feedback(
                store,
                config.longest_feedback_count,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RawRow;

    fn store(entries: &[(&str, Option<&str>, Option<&str>, Option<&str>)]) -> ResponseStore {
        let columns = ColumnMapping::default();
        let rows = entries
            .iter()
            .enumerate()
            .map(|(id, (cohort, score, text, session))| {
                RawRow::from([
                    (columns.id.clone(), Some(id.to_string())),
                    (columns.cohort.clone(), Some((*cohort).to_owned())),
                    (columns.recommendation.clone(), score.map(str::to_owned)),
                    (columns.improvement.clone(), text.map(str::to_owned)),
                    (columns.favorite_session.clone(), session.map(str::to_owned)),
                ])
            });
        ResponseStore::load(rows, &columns).unwrap()
    }

    fn sample() -> ResponseStore {
        store(&[
            ("DEV", Some("10"), Some("more coding exercises"), Some("Agents")),
            ("DEV", Some("6"), Some("fix the wifi"), Some("Agents")),
            ("EXEC", None, None, None),
            ("PROD", Some("9 (very likely)"), Some("clearer agenda"), Some("Roadmaps")),
            ("PROD", Some("8"), None, Some("Agents")),
        ])
    }

    #[test]
    fn test_assemble_matches_components() {
        let s = sample();
        let config = ReportConfig::default();
        let report = SurveyReport::assemble(&s, &config).unwrap();

        assert_eq!(report.respondents, 5);
        assert_eq!(report.overall_score, score::overall_score(&s).unwrap());
        assert_eq!(report.score_by_cohort, score::score_by_cohort(&s));
        assert_eq!(report.distribution_by_cohort, score::distribution_by_cohort(&s));
        assert_eq!(
            report.score_summary_by_cohort,
            score::score_summary_by_cohort(&s)
        );
        assert_eq!(
            report.session_satisfaction,
            ranking::session_satisfaction(&s, &config.ranker())
        );
        assert_eq!(
            report.longest_detractor_feedback,
            feedback::longest_detractor_feedback(&s, config.longest_feedback_count)
        );
        assert_eq!(
            report.category_tally_by_cohort,
            config
                .categorizer()
                .categorize_by_cohort(&s, &config.improvement_field)
        );
        assert_eq!(
            report.session_ranking_by_cohort,
            config.ranker().rank_all_cohorts(&s)
        );
    }

    #[test]
    fn test_assemble_contents() {
        let report = SurveyReport::assemble(&sample(), &ReportConfig::default()).unwrap();

        assert_eq!(report.overall_score, 25.0);
        assert!(!report.score_by_cohort.contains_key(&Cohort::from("EXEC")));
        assert!(report.category_tally_by_cohort[&Cohort::from("EXEC")].is_empty());
        assert_eq!(report.category_tally_overall.get("hands_on"), Some(2));
        assert_eq!(report.category_tally_overall.get("logistics"), Some(1));
        assert_eq!(report.category_tally_overall.get("structure"), Some(1));
        assert_eq!(report.score_summary.count, 4);
        assert_eq!(report.lowest_scores.len(), 4);
        assert_eq!(report.score_summary_by_cohort.len(), 2);
        assert_eq!(report.score_summary_by_cohort[&Cohort::from("DEV")].mean, 8.0);
        let agents = &report.session_satisfaction[0];
        assert_eq!((agents.title.as_str(), agents.overall.mentions), ("Agents", 3));
        assert_eq!(agents.overall.score, Some(0.0));
        assert_eq!(report.longest_detractor_feedback.len(), 3);
        assert!(report.longest_detractor_feedback.values().all(Vec::is_empty));
        assert_eq!(report.lowest_scores[0].score, 6);
        let dev = report
            .session_ranking_by_cohort
            .top_session(&Cohort::from("DEV"))
            .unwrap();
        assert_eq!((dev.title.as_str(), dev.points), ("Agents", 2));
    }

    #[test]
    fn test_assemble_without_scores_fails() {
        let s = store(&[("DEV", None, Some("agenda"), Some("Agents"))]);
        let err = SurveyReport::assemble(&s, &ReportConfig::default()).unwrap_err();
        assert!(matches!(err, ReportError::OverallScore(InsufficientDataError)));
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: ReportConfig = serde_json::from_str(
            r#"{
                "second_favorite_field": {"answer": "Runner-up"},
                "taxonomy": [{"name": "labs", "keywords": ["Lab"]}],
                "lowest_score_count": 2
            }"#,
        )
        .unwrap();
        assert_eq!(config.improvement_field, ResponseField::Improvement);
        assert_eq!(
            config.second_favorite_field,
            ResponseField::Answer("Runner-up".to_owned())
        );
        assert_eq!(config.taxonomy.categories()[0].keywords, ["lab"]);
        assert_eq!(config.columns, ColumnMapping::default());
        assert_eq!(config.lowest_score_count, 2);
        assert_eq!(config.longest_feedback_count, 3);
    }
}
