//! Point-based ranking of favorite sessions
//!
//! Each respondent names up to two favorite sessions. Every mention is worth
//! one point, whether it was the first or the second choice.
//!
//! # Algorithm
//!
//! ```text
//! favorites         second favorites
//!     │                    │
//!     └──── +1 per non-empty, trimmed title ────┐
//!                                               ▼
//!                                     title → points table
//!                                               │
//!                     stable sort by points (descending)
//! ```
//!
//! All favorites are scanned before any second favorite, and the sort is
//! stable, so sessions with equal points keep the order in which they were
//! first seen.
//!
//! Titles are compared exactly after trimming. `"Keynote"` and `"keynote"` are
//! different sessions; near-duplicate titles split their points.
//!
//! [`session_satisfaction`] walks the same mentions but keeps the
//! recommendation band of whoever made each one, overall and per cohort.

use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use cohortlens_stats::nps::{BandCounts, InsufficientDataError};
use serde::Serialize;

use crate::{
    response::{Cohort, ParticipantResponse, ResponseField},
    store::ResponseStore,
};

/// Returned when the top session of a ranking without entries is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no session preferences recorded")]
pub struct EmptyRankingError;

/// Accumulated points of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionPoints {
    pub title: String,
    pub points: usize,
}

/// Sessions ordered by descending points.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SessionRanking {
    entries: Vec<SessionPoints>,
}

impl SessionRanking {
    #[must_use]
    pub fn entries(&self) -> &[SessionPoints] {
        &self.entries
    }

    /// Sum of all points; equals the number of non-empty preference answers.
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.entries.iter().map(|e| e.points).sum()
    }

    #[must_use]
    pub fn unique_session_count(&self) -> usize {
        self.entries.len()
    }

    /// Highest-ranked session.
    ///
    /// Check [`is_empty`](Self::is_empty) first when a cohort may have no
    /// preferences at all.
    pub fn top_session(&self) -> Result<&SessionPoints, EmptyRankingError> {
        self.entries.first().ok_or(EmptyRankingError)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session ranking of every cohort.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CohortRankings {
    rankings: BTreeMap<Cohort, SessionRanking>,
}

impl CohortRankings {
    #[must_use]
    pub fn get(&self, cohort: &Cohort) -> Option<&SessionRanking> {
        self.rankings.get(cohort)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Cohort, &SessionRanking)> {
        self.rankings.iter()
    }

    /// Total points of a cohort; zero for an unknown cohort.
    #[must_use]
    pub fn total_points(&self, cohort: &Cohort) -> usize {
        self.get(cohort).map_or(0, SessionRanking::total_points)
    }

    /// Number of distinct sessions named by a cohort; zero for an unknown cohort.
    #[must_use]
    pub fn unique_session_count(&self, cohort: &Cohort) -> usize {
        self.get(cohort)
            .map_or(0, SessionRanking::unique_session_count)
    }

    /// Highest-ranked session of a cohort.
    ///
    /// Fails for a cohort without preferences and for an unknown cohort.
    pub fn top_session(&self, cohort: &Cohort) -> Result<&SessionPoints, EmptyRankingError> {
        self.get(cohort).ok_or(EmptyRankingError)?.top_session()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rankings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}

impl FromIterator<(Cohort, SessionRanking)> for CohortRankings {
    fn from_iter<T: IntoIterator<Item = (Cohort, SessionRanking)>>(iter: T) -> Self {
        Self {
            rankings: iter.into_iter().collect(),
        }
    }
}

/// Builds session rankings from two preference fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRanker {
    favorite_field: ResponseField,
    second_favorite_field: ResponseField,
}

impl Default for SessionRanker {
    fn default() -> Self {
        Self::new(
            ResponseField::FavoriteSession,
            ResponseField::SecondFavoriteSession,
        )
    }
}

impl SessionRanker {
    #[must_use]
    pub fn new(favorite_field: ResponseField, second_favorite_field: ResponseField) -> Self {
        Self {
            favorite_field,
            second_favorite_field,
        }
    }

    /// Ranks the sessions named in `responses`.
    ///
    /// ```
    /// # use std::collections::BTreeMap;
    /// # use cohortlens_analysis::{
    /// #     ranking::SessionRanker,
    /// #     response::{Cohort, ParticipantResponse},
    /// # };
    /// let vote = |first: &str, second: Option<&str>| ParticipantResponse {
    ///     id: first.to_owned(),
    ///     cohort: Cohort::from("DEV"),
    ///     recommendation_score: None,
    ///     improvement_text: None,
    ///     favorite_session: Some(first.to_owned()),
    ///     second_favorite_session: second.map(str::to_owned),
    ///     answers: BTreeMap::new(),
    /// };
    /// let responses = [vote("X", Some("Y")), vote("Y", Some("Y")), vote("X", None)];
    ///
    /// let ranking = SessionRanker::default().rank(&responses);
    /// let top = ranking.top_session().unwrap();
    /// assert_eq!((top.title.as_str(), top.points), ("Y", 3));
    /// assert_eq!(ranking.total_points(), 5);
    /// ```
    pub fn rank<'a, I>(&self, responses: I) -> SessionRanking
    where
        I: IntoIterator<Item = &'a ParticipantResponse>,
    {
        let responses = responses.into_iter().collect::<Vec<_>>();
        let mut entries = Vec::<SessionPoints>::new();
        let mut index = HashMap::<&str, usize>::new();

        for (title, _) in self.mentions(&responses) {
            match index.entry(title) {
                Entry::Occupied(e) => entries[*e.get()].points += 1,
                Entry::Vacant(e) => {
                    e.insert(entries.len());
                    entries.push(SessionPoints {
                        title: title.to_owned(),
                        points: 1,
                    });
                }
            }
        }

        entries.sort_by(|a, b| b.points.cmp(&a.points));
        SessionRanking { entries }
    }

    /// Every non-empty, trimmed title with the response that named it.
    ///
    /// Favorites come first, then second favorites, each in input order.
    fn mentions<'r>(
        &'r self,
        responses: &'r [&'r ParticipantResponse],
    ) -> impl Iterator<Item = (&'r str, &'r ParticipantResponse)> {
        [&self.favorite_field, &self.second_favorite_field]
            .into_iter()
            .flat_map(move |field| {
                responses.iter().filter_map(move |&response| {
                    let title = response.text(field)?.trim();
                    (!title.is_empty()).then_some((title, response))
                })
            })
    }

    /// Ranks the sessions of every known cohort.
    ///
    /// Cohorts without preferences map to an empty ranking.
    #[must_use]
    pub fn rank_all_cohorts(&self, store: &ResponseStore) -> CohortRankings {
        store
            .known_cohorts()
            .iter()
            .map(|cohort| (cohort.clone(), self.rank(store.responses_for_cohort(cohort))))
            .collect()
    }
}

/// Recommendation bands of the respondents behind a set of mentions.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MentionSatisfaction {
    /// Number of mentions, scored or not
    pub mentions: usize,
    #[serde(flatten)]
    pub bands: BandCounts,
    /// Satisfaction score over the scored mentions; `None` when none are scored
    pub score: Option<f64>,
}

impl MentionSatisfaction {
    fn push(&mut self, score: Option<u8>) {
        self.mentions += 1;
        if let Some(score) = score {
            self.bands.push(score);
        }
    }

    fn finish(&mut self) {
        self.score = self.bands.satisfaction_score().ok();
    }

    /// Satisfaction score over the scored mentions.
    pub fn satisfaction_score(&self) -> Result<f64, InsufficientDataError> {
        self.bands.satisfaction_score()
    }
}

/// How satisfied the respondents who named one session were.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSatisfaction {
    pub title: String,
    #[serde(flatten)]
    pub overall: MentionSatisfaction,
    pub by_cohort: BTreeMap<Cohort, MentionSatisfaction>,
}

/// Satisfaction of the respondents behind each session's mentions.
///
/// A respondent naming a session as both favorite and second favorite counts
/// twice, as in the ranking. Sessions are ordered by descending mentions, ties
/// in first-seen order; cohorts that never named a session are absent from
/// its `by_cohort`.
///
/// ```
/// # use std::collections::BTreeMap;
/// # use cohortlens_analysis::{
/// #     ranking::{SessionRanker, session_satisfaction},
/// #     store::{ColumnMapping, RawRow, ResponseStore},
/// # };
/// let columns = ColumnMapping::default();
/// let row = |id: &str, score: &str, session: &str| -> RawRow {
///     BTreeMap::from([
///         (columns.id.clone(), Some(id.to_owned())),
///         (columns.cohort.clone(), Some("DEV".to_owned())),
///         (columns.recommendation.clone(), Some(score.to_owned())),
///         (columns.favorite_session.clone(), Some(session.to_owned())),
///     ])
/// };
/// let store = ResponseStore::load(
///     [row("1", "10", "Agents"), row("2", "3", "Agents"), row("3", "9", "Evals")],
///     &columns,
/// )?;
///
/// let sessions = session_satisfaction(&store, &SessionRanker::default());
/// assert_eq!(sessions[0].title, "Agents");
/// assert_eq!(sessions[0].overall.mentions, 2);
/// assert_eq!(sessions[0].overall.score, Some(0.0));
/// assert_eq!(sessions[1].overall.score, Some(100.0));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn session_satisfaction(
    store: &ResponseStore,
    ranker: &SessionRanker,
) -> Vec<SessionSatisfaction> {
    let responses = store.all_responses().iter().collect::<Vec<_>>();
    let mut entries = Vec::<SessionSatisfaction>::new();
    let mut index = HashMap::<&str, usize>::new();

    for (title, response) in ranker.mentions(&responses) {
        let i = *index.entry(title).or_insert_with(|| {
            entries.push(SessionSatisfaction {
                title: title.to_owned(),
                overall: MentionSatisfaction::default(),
                by_cohort: BTreeMap::new(),
            });
            entries.len() - 1
        });
        let entry = &mut entries[i];
        entry.overall.push(response.recommendation_score);
        entry
            .by_cohort
            .entry(response.cohort.clone())
            .or_default()
            .push(response.recommendation_score);
    }

    for entry in &mut entries {
        entry.overall.finish();
        entry
            .by_cohort
            .values_mut()
            .for_each(MentionSatisfaction::finish);
    }
    entries.sort_by(|a, b| b.overall.mentions.cmp(&a.overall.mentions));
    entries
}
