//! Satisfaction scores over a response store
//!
//! Wraps the arithmetic of [`cohortlens_stats::nps`] with the store-level
//! scopes a report needs: the whole program and each cohort.
//!
//! # Strict Totals, Tolerant Breakdowns
//!
//! The two scopes treat missing data differently:
//!
//! - [`overall_score`] fails with [`InsufficientDataError`] when no response
//!   carries a score.
//! - [`score_by_cohort`] leaves a cohort without scores out of the mapping so
//!   one empty cohort does not abort the whole breakdown.
//!
//! Callers that need the strict behavior per cohort use
//! [`score_by_cohort_with`] and [`EmptyCohortPolicy::Fail`].

use std::collections::BTreeMap;

use cohortlens_stats::{
    descriptive::DescriptiveStats,
    nps::{self, BandDistribution, InsufficientDataError},
};

use crate::{
    response::{Cohort, ParticipantResponse},
    store::ResponseStore,
};

/// What a per-cohort computation does with a cohort that has no scores.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EmptyCohortPolicy {
    /// Leave the cohort out of the result.
    #[default]
    Omit,
    /// Fail the whole computation.
    Fail,
}

fn scores<'a, I>(responses: I) -> impl Iterator<Item = u8>
where
    I: IntoIterator<Item = &'a ParticipantResponse>,
{
    responses
        .into_iter()
        .filter_map(|r| r.recommendation_score)
}

/// Satisfaction score of a set of responses; unscored responses are ignored.
pub fn score<'a, I>(responses: I) -> Result<f64, InsufficientDataError>
where
    I: IntoIterator<Item = &'a ParticipantResponse>,
{
    nps::satisfaction_score(scores(responses))
}

/// Band shares of a set of responses; unscored responses are ignored.
pub fn distribution<'a, I>(responses: I) -> Result<BandDistribution, InsufficientDataError>
where
    I: IntoIterator<Item = &'a ParticipantResponse>,
{
    BandDistribution::from_scores(scores(responses))
}

/// Satisfaction score of the whole program.
pub fn overall_score(store: &ResponseStore) -> Result<f64, InsufficientDataError> {
    score(store.all_responses())
}

/// Band shares of the whole program.
pub fn overall_distribution(
    store: &ResponseStore,
) -> Result<BandDistribution, InsufficientDataError> {
    distribution(store.all_responses())
}

/// Satisfaction score of each cohort, omitting cohorts without scores.
#[must_use]
pub fn score_by_cohort(store: &ResponseStore) -> BTreeMap<Cohort, f64> {
    collect_by_cohort(store, EmptyCohortPolicy::Omit, |responses| score(responses))
        .unwrap_or_default()
}

/// Satisfaction score of each cohort under an explicit empty-cohort policy.
pub fn score_by_cohort_with(
    store: &ResponseStore,
    policy: EmptyCohortPolicy,
) -> Result<BTreeMap<Cohort, f64>, InsufficientDataError> {
    collect_by_cohort(store, policy, |responses| score(responses))
}

/// Band shares of each cohort, omitting cohorts without scores.
#[must_use]
pub fn distribution_by_cohort(store: &ResponseStore) -> BTreeMap<Cohort, BandDistribution> {
    collect_by_cohort(store, EmptyCohortPolicy::Omit, |responses| {
        distribution(responses)
    })
    .unwrap_or_default()
}

/// Min, max, mean and median of all recommendation scores.
///
/// Returns `None` when no response carries a score.
#[must_use]
pub fn score_summary(store: &ResponseStore) -> Option<DescriptiveStats> {
    DescriptiveStats::new(scores(store.all_responses()).map(f64::from))
}

/// Score summary of each cohort, omitting cohorts without scores.
#[must_use]
pub fn score_summary_by_cohort(store: &ResponseStore) -> BTreeMap<Cohort, DescriptiveStats> {
    collect_by_cohort(store, EmptyCohortPolicy::Omit, |responses| {
        DescriptiveStats::new(scores(responses).map(f64::from)).ok_or(InsufficientDataError)
    })
    .unwrap_or_default()
}

fn collect_by_cohort<T, F>(
    store: &ResponseStore,
    policy: EmptyCohortPolicy,
    mut f: F,
) -> Result<BTreeMap<Cohort, T>, InsufficientDataError>
where
    F: FnMut(Vec<&ParticipantResponse>) -> Result<T, InsufficientDataError>,
{
    let mut map = BTreeMap::new();
    for cohort in store.known_cohorts() {
        match f(store.responses_for_cohort(cohort).collect()) {
            Ok(value) => {
                map.insert(cohort.clone(), value);
            }
            Err(e) => match policy {
                EmptyCohortPolicy::Omit => {}
                EmptyCohortPolicy::Fail => return Err(e),
            },
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ColumnMapping, RawRow};

    fn response(id: usize, cohort: &str, score: Option<u8>) -> ParticipantResponse {
        ParticipantResponse {
            id: id.to_string(),
            cohort: Cohort::from(cohort),
            recommendation_score: score,
            improvement_text: None,
            favorite_session: None,
            second_favorite_session: None,
            answers: BTreeMap::new(),
        }
    }

    fn store(entries: &[(&str, Option<u8>)]) -> ResponseStore {
        let columns = ColumnMapping::default();
        let rows = entries.iter().enumerate().map(|(id, (cohort, score))| {
            RawRow::from([
                (columns.id.clone(), Some(id.to_string())),
                (columns.cohort.clone(), Some((*cohort).to_owned())),
                (columns.recommendation.clone(), score.map(|s| s.to_string())),
            ])
        });
        ResponseStore::load(rows, &columns).unwrap()
    }

    #[test]
    fn test_score_ignores_unscored_responses() {
        let responses = [
            response(0, "DEV", Some(10)),
            response(1, "DEV", None),
            response(2, "DEV", Some(0)),
        ];
        assert_eq!(score(&responses), Ok(0.0));
    }

    #[test]
    fn test_overall_score_scenario() {
        let s = store(&[
            ("DEV", Some(10)),
            ("DEV", Some(10)),
            ("PROD", Some(9)),
            ("PROD", Some(8)),
            ("EXEC", Some(7)),
            ("EXEC", Some(6)),
            ("EXEC", Some(0)),
        ]);
        let overall = overall_score(&s).unwrap();
        assert!((overall - 14.285_714_285_714_286).abs() < 1e-9);
        assert_eq!((overall * 10.0).round() / 10.0, 14.3);
    }

    #[test]
    fn test_overall_score_without_scores_fails() {
        let s = store(&[("DEV", None), ("PROD", None)]);
        assert_eq!(overall_score(&s), Err(InsufficientDataError));
        assert_eq!(overall_score(&ResponseStore::default()), Err(InsufficientDataError));
    }

    #[test]
    fn test_score_by_cohort_omits_empty_cohort() {
        let s = store(&[
            ("DEV", Some(10)),
            ("EXEC", None),
            ("PROD", Some(3)),
            ("DEV", Some(8)),
        ]);
        let scores = score_by_cohort(&s);
        assert_eq!(
            scores,
            BTreeMap::from([(Cohort::from("DEV"), 50.0), (Cohort::from("PROD"), -100.0)])
        );
        assert!(!scores.contains_key(&Cohort::from("EXEC")));
    }

    #[test]
    fn test_score_by_cohort_with_fail_policy() {
        let s = store(&[("DEV", Some(10)), ("EXEC", None)]);
        assert_eq!(
            score_by_cohort_with(&s, EmptyCohortPolicy::Fail),
            Err(InsufficientDataError)
        );
        assert_eq!(
            score_by_cohort_with(&s, EmptyCohortPolicy::Omit).unwrap(),
            score_by_cohort(&s)
        );
    }

    #[test]
    fn test_distribution_by_cohort() {
        let s = store(&[("DEV", Some(10)), ("DEV", Some(7)), ("EXEC", None)]);
        let dists = distribution_by_cohort(&s);
        assert_eq!(dists.len(), 1);
        let dev = &dists[&Cohort::from("DEV")];
        assert_eq!(dev.promoter_pct, 50.0);
        assert_eq!(dev.passive_pct, 50.0);
        assert_eq!(dev.detractor_pct, 0.0);
    }

    #[test]
    fn test_score_summary() {
        let s = store(&[("DEV", Some(10)), ("DEV", Some(4)), ("EXEC", None)]);
        let summary = score_summary(&s).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.min, 4.0);
        assert_eq!(summary.max, 10.0);
        assert_eq!(summary.mean, 7.0);
        assert!(score_summary(&store(&[("DEV", None)])).is_none());
    }

    #[test]
    fn test_score_summary_by_cohort() {
        let s = store(&[
            ("DEV", Some(10)),
            ("EXEC", None),
            ("DEV", Some(5)),
            ("PROD", Some(8)),
        ]);
        let summaries = score_summary_by_cohort(&s);
        assert_eq!(
            summaries.keys().map(Cohort::as_str).collect::<Vec<_>>(),
            ["DEV", "PROD"]
        );
        assert_eq!(summaries[&Cohort::from("DEV")].mean, 7.5);
        assert_eq!(summaries[&Cohort::from("PROD")].count, 1);
    }
}
