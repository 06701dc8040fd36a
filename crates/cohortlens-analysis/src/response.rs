//! Participant response data structures
//!
//! This module provides the in-memory representation of a single survey
//! submission and the selectors used to read its free-text fields.
//!
//! # Data Structure
//!
//! ```text
//! ParticipantResponse
//! ├─ id                       (unique within a store)
//! ├─ cohort                   (open-ended track identifier)
//! ├─ recommendation_score     (0-10, optional)
//! ├─ improvement_text         (optional)
//! ├─ favorite_session         (optional, trimmed)
//! ├─ second_favorite_session  (optional, trimmed)
//! └─ answers                  (every non-empty column, mapped ones included)
//! ```
//!
//! Responses are built once by [`ResponseStore`](crate::store::ResponseStore)
//! and never mutated afterwards.

use std::{collections::BTreeMap, fmt};

use cohortlens_stats::nps::NpsBand;
use serde::{Deserialize, Serialize};

/// Named sub-population of participants, such as a program track.
///
/// The set of cohorts is open-ended: any value found in the cohort column of
/// the input becomes a cohort.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cohort(String);

impl Cohort {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for Cohort {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// One survey submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantResponse {
    /// Identifier, unique across the store
    pub id: String,
    /// Cohort this participant belongs to
    pub cohort: Cohort,
    /// Answer to the 0-10 recommendation question, if given
    pub recommendation_score: Option<u8>,
    /// Free-text improvement suggestion, if given
    pub improvement_text: Option<String>,
    /// Title of the favorite session, trimmed
    pub favorite_session: Option<String>,
    /// Title of the second favorite session, trimmed
    pub second_favorite_session: Option<String>,
    /// Every non-empty answer keyed by column name, trimmed
    ///
    /// Mapped columns appear here too, so `ResponseField::Answer` can name any
    /// input column.
    pub answers: BTreeMap<String, String>,
}

impl ParticipantResponse {
    /// Recommendation band of this response, if it was scored.
    #[must_use]
    pub fn band(&self) -> Option<NpsBand> {
        self.recommendation_score.map(NpsBand::from_score)
    }

    /// Reads the free-text field selected by `field`.
    ///
    /// Returns `None` when the field was not answered.
    #[must_use]
    pub fn text(&self, field: &ResponseField) -> Option<&str> {
        match field {
            ResponseField::Improvement => self.improvement_text.as_deref(),
            ResponseField::FavoriteSession => self.favorite_session.as_deref(),
            ResponseField::SecondFavoriteSession => self.second_favorite_session.as_deref(),
            ResponseField::Answer(column) => self.answers.get(column).map(String::as_str),
        }
    }
}

/// Selects a free-text field of a [`ParticipantResponse`].
///
/// In JSON, the fixed fields are plain strings (`"improvement"`) and other
/// columns are objects (`{"answer": "What motivated your choice?"}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseField {
    Improvement,
    FavoriteSession,
    SecondFavoriteSession,
    Answer(String),
}

impl fmt::Display for ResponseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseField::Improvement => f.write_str("improvement"),
            ResponseField::FavoriteSession => f.write_str("favorite session"),
            ResponseField::SecondFavoriteSession => f.write_str("second favorite session"),
            ResponseField::Answer(column) => write!(f, "answer '{column}'"),
        }
    }
}
