//! Response store built from raw tabular rows
//!
//! The ingestion collaborator hands over rows as column-name to value maps. This
//! module turns them into validated [`ParticipantResponse`] values and keeps
//! them in an immutable [`ResponseStore`] indexed by cohort.
//!
//! # Ingestion Rules
//!
//! - `id` and `cohort` columns are required; a blank value counts as missing
//! - the recommendation answer is often a sentence such as
//!   `"10 (Extremely likely)"`, so the first run of digits is taken as the score
//! - an answer with no digits leaves the score absent
//! - a score above 10 rejects the row rather than being clamped
//! - ids must be unique across the store
//!
//! # Skip or Abort
//!
//! What to do with a malformed row is the caller's decision:
//!
//! - [`ResponseStore::load`] stops at the first malformed row
//! - [`ResponseStore::load_lenient`] skips malformed rows and returns them
//!   alongside the store
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use cohortlens_analysis::{
//!     response::Cohort,
//!     store::{ColumnMapping, RawRow, ResponseStore},
//! };
//!
//! let columns = ColumnMapping::default();
//! let row: RawRow = BTreeMap::from([
//!     (columns.id.clone(), Some("42".to_owned())),
//!     (columns.cohort.clone(), Some("DEV".to_owned())),
//!     (columns.recommendation.clone(), Some("9 - very likely".to_owned())),
//! ]);
//!
//! let store = ResponseStore::load([row], &columns).unwrap();
//! assert_eq!(store.len(), 1);
//! assert_eq!(store.known_cohorts(), [Cohort::from("DEV")]);
//! assert_eq!(store.all_responses()[0].recommendation_score, Some(9));
//! ```

use std::collections::{BTreeMap, HashMap};

use cohortlens_stats::nps::MAX_SCORE;
use serde::{Deserialize, Serialize};

use crate::response::{Cohort, ParticipantResponse};

/// One row of tabular input: column name to cell value.
///
/// `None` and empty strings both mean the cell was not answered.
pub type RawRow = BTreeMap<String, Option<String>>;

/// Names of the input columns that feed the fixed response fields.
///
/// Defaults match the column headers of the program survey export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub id: String,
    pub cohort: String,
    pub recommendation: String,
    pub improvement: String,
    pub favorite_session: String,
    pub second_favorite_session: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            id: "ID".to_owned(),
            cohort: "TRACK".to_owned(),
            recommendation: "On a scale from 0 to 10. How likely are you to recommend this program to a friend or colleague?".to_owned(),
            improvement: "What should we improve?".to_owned(),
            favorite_session: "What session did you enjoy the most?".to_owned(),
            second_favorite_session: "What is the second session you enjoyed the most?".to_owned(),
        }
    }
}

/// A raw row that cannot become a [`ParticipantResponse`].
///
/// `row` is the zero-based position of the row in the input.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedRowError {
    #[display("row {row}: missing required column '{column}'")]
    MissingField { row: usize, column: String },
    #[display("row {row} (id '{id}'): recommendation score {score} is outside 0-10")]
    ScoreOutOfRange { row: usize, id: String, score: u32 },
    #[display("row {row}: duplicate id '{id}'")]
    DuplicateId { row: usize, id: String },
}

impl MalformedRowError {
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            MalformedRowError::MissingField { row, .. }
            | MalformedRowError::ScoreOutOfRange { row, .. }
            | MalformedRowError::DuplicateId { row, .. } => *row,
        }
    }
}

/// Extracts the first contiguous run of decimal digits in `text`.
///
/// ASCII and full-width digits (`０`-`９`) are recognized and may be mixed
/// within one run. Returns `None` when `text` contains no digit. A run too
/// long for `u32` saturates to `u32::MAX`, which is out of range for any
/// score.
///
/// ```
/// # use cohortlens_analysis::store::extract_first_integer;
/// assert_eq!(extract_first_integer("10 (Extremely likely)"), Some(10));
/// assert_eq!(extract_first_integer("I'd say 7, maybe 8"), Some(7));
/// assert_eq!(extract_first_integer("１０点"), Some(10));
/// assert_eq!(extract_first_integer("Not sure"), None);
/// ```
#[must_use]
pub fn extract_first_integer(text: &str) -> Option<u32> {
    let mut digits = text
        .chars()
        .skip_while(|&c| decimal_digit(c).is_none())
        .map_while(decimal_digit)
        .peekable();
    digits.peek()?;
    let value = digits.try_fold(0_u32, |acc, digit| acc.checked_mul(10)?.checked_add(digit));
    Some(value.unwrap_or(u32::MAX))
}

fn decimal_digit(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '０'..='９' => Some(u32::from(c) - u32::from('０')),
        _ => None,
    }
}

/// Immutable collection of parsed participant responses.
#[derive(Debug, Clone, Default)]
pub struct ResponseStore {
    responses: Vec<ParticipantResponse>,
    cohorts: Vec<Cohort>,
    by_cohort: HashMap<Cohort, Vec<usize>>,
    by_id: HashMap<String, usize>,
}

impl ResponseStore {
    /// Builds a store, failing on the first malformed row.
    pub fn load<I>(rows: I, columns: &ColumnMapping) -> Result<Self, MalformedRowError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut store = Self::default();
        for (row, raw) in rows.into_iter().enumerate() {
            store.insert(row, raw, columns)?;
        }
        tracing::debug!(
            responses = store.len(),
            cohorts = store.cohorts.len(),
            "response store loaded"
        );
        Ok(store)
    }

    /// Builds a store from every well-formed row and returns the rejected ones.
    pub fn load_lenient<I>(rows: I, columns: &ColumnMapping) -> (Self, Vec<MalformedRowError>)
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut store = Self::default();
        let mut rejected = vec![];
        for (row, raw) in rows.into_iter().enumerate() {
            if let Err(e) = store.insert(row, raw, columns) {
                tracing::debug!(row, error = %e, "skipping malformed row");
                rejected.push(e);
            }
        }
        tracing::debug!(
            responses = store.len(),
            rejected = rejected.len(),
            cohorts = store.cohorts.len(),
            "response store loaded"
        );
        (store, rejected)
    }

    fn insert(
        &mut self,
        row: usize,
        raw: RawRow,
        columns: &ColumnMapping,
    ) -> Result<(), MalformedRowError> {
        let response = parse_row(row, raw, columns)?;
        if self.by_id.contains_key(&response.id) {
            return Err(MalformedRowError::DuplicateId {
                row,
                id: response.id,
            });
        }

        let index = self.responses.len();
        self.by_id.insert(response.id.clone(), index);
        let members = self
            .by_cohort
            .entry(response.cohort.clone())
            .or_insert_with(|| {
                self.cohorts.push(response.cohort.clone());
                vec![]
            });
        members.push(index);
        self.responses.push(response);
        Ok(())
    }

    /// All responses in ingestion order.
    #[must_use]
    pub fn all_responses(&self) -> &[ParticipantResponse] {
        &self.responses
    }

    /// Responses of one cohort in ingestion order.
    ///
    /// Yields nothing for a cohort absent from the data.
    pub fn responses_for_cohort(
        &self,
        cohort: &Cohort,
    ) -> impl Iterator<Item = &ParticipantResponse> {
        self.by_cohort
            .get(cohort)
            .into_iter()
            .flatten()
            .map(|&index| &self.responses[index])
    }

    /// Distinct cohorts in the order they were first seen.
    #[must_use]
    pub fn known_cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ParticipantResponse> {
        self.by_id.get(id).map(|&index| &self.responses[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

fn parse_row(
    row: usize,
    raw: RawRow,
    columns: &ColumnMapping,
) -> Result<ParticipantResponse, MalformedRowError> {
    let take = |column: &str| {
        raw.get(column)
            .and_then(Option::as_deref)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
    };

    let id = take(&columns.id).ok_or_else(|| MalformedRowError::MissingField {
        row,
        column: columns.id.clone(),
    })?;
    let cohort = take(&columns.cohort).ok_or_else(|| MalformedRowError::MissingField {
        row,
        column: columns.cohort.clone(),
    })?;

    let recommendation_score = match take(&columns.recommendation)
        .as_deref()
        .and_then(extract_first_integer)
    {
        Some(score) => Some(
            u8::try_from(score)
                .ok()
                .filter(|s| *s <= MAX_SCORE)
                .ok_or_else(|| MalformedRowError::ScoreOutOfRange {
                    row,
                    id: id.clone(),
                    score,
                })?,
        ),
        None => None,
    };

    let improvement_text = take(&columns.improvement);
    let favorite_session = take(&columns.favorite_session);
    let second_favorite_session = take(&columns.second_favorite_session);

    let answers = raw
        .into_iter()
        .filter_map(|(column, value)| {
            let value = value?;
            let value = value.trim();
            (!value.is_empty()).then(|| (column, value.to_owned()))
        })
        .collect();

    Ok(ParticipantResponse {
        id,
        cohort: Cohort::new(cohort),
        recommendation_score,
        improvement_text,
        favorite_session,
        second_favorite_session,
        answers,
    })
}
