//! Verbatim feedback from low scorers
//!
//! Aggregates say what is wrong on average; this module pulls out what the
//! unhappiest respondents actually wrote.

use std::collections::BTreeMap;

use cohortlens_stats::nps::NpsBand;
use serde::Serialize;

use crate::{response::Cohort, store::ResponseStore};

/// A scored response together with its improvement suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredFeedback {
    pub id: String,
    pub cohort: Cohort,
    pub score: u8,
    pub improvement_text: Option<String>,
}

/// The `n` lowest-scoring responses, lowest first.
///
/// Equal scores keep ingestion order. Unscored responses are never included.
#[must_use]
pub fn lowest_scores(store: &ResponseStore, n: usize) -> Vec<ScoredFeedback> {
    let mut scored = scored_feedback(store).collect::<Vec<_>>();
    scored.sort_by_key(|f| f.score);
    scored.truncate(n);
    scored
}

/// Every detractor response, in ingestion order.
#[must_use]
pub fn detractor_feedback(store: &ResponseStore) -> Vec<ScoredFeedback> {
    scored_feedback(store)
        .filter(|f| NpsBand::from_score(f.score).is_detractor())
        .collect()
}

/// Suggestions of at most this many characters are too short to quote.
pub const SUBSTANTIAL_FEEDBACK_CHARS: usize = 50;

/// The `n` longest detractor suggestions of each cohort, longest first.
///
/// Only suggestions longer than [`SUBSTANTIAL_FEEDBACK_CHARS`] characters
/// qualify. Every known cohort is present; equal lengths keep ingestion order.
#[must_use]
pub fn longest_detractor_feedback(
    store: &ResponseStore,
    n: usize,
) -> BTreeMap<Cohort, Vec<ScoredFeedback>> {
    let mut by_cohort = store
        .known_cohorts()
        .iter()
        .map(|cohort| (cohort.clone(), vec![]))
        .collect::<BTreeMap<_, Vec<_>>>();

    for feedback in detractor_feedback(store) {
        let Some(length) = feedback.improvement_text.as_deref().map(|t| t.chars().count())
        else {
            continue;
        };
        if length > SUBSTANTIAL_FEEDBACK_CHARS {
            by_cohort
                .entry(feedback.cohort.clone())
                .or_default()
                .push(feedback);
        }
    }

    for entries in by_cohort.values_mut() {
        entries.sort_by_key(|f| {
            std::cmp::Reverse(f.improvement_text.as_deref().map_or(0, |t| t.chars().count()))
        });
        entries.truncate(n);
    }
    by_cohort
}

fn scored_feedback(store: &ResponseStore) -> impl Iterator<Item = ScoredFeedback> {
    store.all_responses().iter().filter_map(|r| {
        Some(ScoredFeedback {
            id: r.id.clone(),
            cohort: r.cohort.clone(),
            score: r.recommendation_score?,
            improvement_text: r.improvement_text.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ColumnMapping, RawRow};

    fn store() -> ResponseStore {
        let columns = ColumnMapping::default();
        let entries = [
            ("EXEC", Some("7"), Some("More breaks")),
            ("DEV", Some("3"), Some("Agenda was chaotic")),
            ("PROD", None, Some("Unscored")),
            ("DEV", Some("10"), None),
            ("EXEC", Some("3"), None),
            ("PROD", Some("6"), Some("Too much unstructured time")),
        ];
        let rows = entries
            .iter()
            .enumerate()
            .map(|(id, (cohort, score, text))| {
                RawRow::from([
                    (columns.id.clone(), Some(id.to_string())),
                    (columns.cohort.clone(), Some((*cohort).to_owned())),
                    (columns.recommendation.clone(), score.map(str::to_owned)),
                    (columns.improvement.clone(), text.map(str::to_owned)),
                ])
            });
        ResponseStore::load(rows, &columns).unwrap()
    }

    #[test]
    fn test_lowest_scores() {
        let lowest = lowest_scores(&store(), 3);
        let ids = lowest.iter().map(|f| f.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["1", "4", "5"]);
        assert_eq!(
            lowest[0].improvement_text.as_deref(),
            Some("Agenda was chaotic")
        );
    }

    #[test]
    fn test_lowest_scores_more_than_available() {
        let lowest = lowest_scores(&store(), 100);
        assert_eq!(lowest.len(), 5);
        assert!(lowest.iter().all(|f| f.id != "2"));
        assert!(lowest_scores(&store(), 0).is_empty());
    }

    #[test]
    fn test_detractor_feedback() {
        let detractors = detractor_feedback(&store());
        let ids = detractors
            .iter()
            .map(|f| (f.id.as_str(), f.score))
            .collect::<Vec<_>>();
        assert_eq!(ids, [("1", 3), ("4", 3), ("5", 6)]);
    }

    #[test]
    fn test_longest_detractor_feedback() {
        let columns = ColumnMapping::default();
        let long_a = "The agenda changed every morning and nobody told us where to go next";
        let long_b = "Labs assumed a setup most of us did not have, so we lost the first hour";
        let long_c = "Sessions ran over and the breaks disappeared; it was hard to stay focused";
        let entries = [
            ("DEV", "2", long_a),
            ("DEV", "10", long_c),
            ("DEV", "5", "Too short to matter"),
            ("DEV", "0", long_c),
            ("DEV", "6", long_b),
            ("EXEC", "9", long_a),
        ];
        let rows = entries
            .iter()
            .enumerate()
            .map(|(id, (cohort, score, text))| {
                RawRow::from([
                    (columns.id.clone(), Some(id.to_string())),
                    (columns.cohort.clone(), Some((*cohort).to_owned())),
                    (columns.recommendation.clone(), Some((*score).to_owned())),
                    (columns.improvement.clone(), Some((*text).to_owned())),
                ])
            });
        let s = ResponseStore::load(rows, &columns).unwrap();

        let longest = longest_detractor_feedback(&s, 2);
        let dev = longest[&Cohort::from("DEV")]
            .iter()
            .map(|f| f.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(dev, ["3", "4"]);
        assert!(longest[&Cohort::from("EXEC")].is_empty());

        let all = longest_detractor_feedback(&s, 10);
        assert_eq!(all[&Cohort::from("DEV")].len(), 3);
    }
}
