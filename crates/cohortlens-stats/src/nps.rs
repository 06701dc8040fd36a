//! Net-Promoter-style banding and scoring
//!
//! Recommendation answers on a 0-10 scale fall into three bands:
//!
//! ```text
//!  0  1  2  3  4  5  6 | 7  8 | 9  10
//! ---- detractors ----- passive promoters
//! ```
//!
//! The satisfaction score is the promoter percentage minus the detractor
//! percentage, so it always lies in `[-100, 100]`. Passive answers count toward
//! the denominator only.

use serde::Serialize;

/// Highest valid answer on the recommendation scale.
pub const MAX_SCORE: u8 = 10;

/// Lowest answer counted as a promoter.
pub const PROMOTER_MIN: u8 = 9;

/// Highest answer counted as a detractor.
pub const DETRACTOR_MAX: u8 = 6;

/// Returned when a strict aggregate is asked to work over zero scores.
///
/// An empty input has no score at all, which is different from a genuinely
/// neutral score of `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no recommendation scores to aggregate")]
pub struct InsufficientDataError;

/// Response band of a single recommendation answer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum NpsBand {
    #[display("Promoter")]
    Promoter,
    #[display("Passive")]
    Passive,
    #[display("Detractor")]
    Detractor,
}

impl NpsBand {
    /// Classifies a recommendation answer.
    ///
    /// ```
    /// # use cohortlens_stats::nps::NpsBand;
    /// assert_eq!(NpsBand::from_score(9), NpsBand::Promoter);
    /// assert_eq!(NpsBand::from_score(7), NpsBand::Passive);
    /// assert_eq!(NpsBand::from_score(6), NpsBand::Detractor);
    /// ```
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score >= PROMOTER_MIN {
            NpsBand::Promoter
        } else if score > DETRACTOR_MAX {
            NpsBand::Passive
        } else {
            NpsBand::Detractor
        }
    }
}

/// Number of answers in each band.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BandCounts {
    pub promoters: usize,
    pub passives: usize,
    pub detractors: usize,
}

impl BandCounts {
    #[must_use]
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let mut counts = Self::default();
        for score in scores {
            counts.push(score);
        }
        counts
    }

    pub fn push(&mut self, score: u8) {
        match NpsBand::from_score(score) {
            NpsBand::Promoter => self.promoters += 1,
            NpsBand::Passive => self.passives += 1,
            NpsBand::Detractor => self.detractors += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.promoters + self.passives + self.detractors
    }

    /// Promoter percentage minus detractor percentage.
    #[expect(clippy::cast_precision_loss)]
    pub fn satisfaction_score(&self) -> Result<f64, InsufficientDataError> {
        let total = self.total();
        if total == 0 {
            return Err(InsufficientDataError);
        }
        let n = total as f64;
        let promoters_pct = self.promoters as f64 / n * 100.0;
        let detractors_pct = self.detractors as f64 / n * 100.0;
        Ok(promoters_pct - detractors_pct)
    }
}

/// Computes the satisfaction score of a set of recommendation answers.
///
/// Fails with [`InsufficientDataError`] when `scores` is empty.
///
/// ```
/// # use cohortlens_stats::nps;
/// assert_eq!(nps::satisfaction_score([9, 10]), Ok(100.0));
/// assert_eq!(nps::satisfaction_score([0, 6]), Ok(-100.0));
/// assert!(nps::satisfaction_score(std::iter::empty()).is_err());
/// ```
pub fn satisfaction_score<I>(scores: I) -> Result<f64, InsufficientDataError>
where
    I: IntoIterator<Item = u8>,
{
    BandCounts::from_scores(scores).satisfaction_score()
}

/// Percentage share of each band, for descriptive reporting.
///
/// The three percentages sum to 100 up to floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandDistribution {
    #[serde(flatten)]
    pub counts: BandCounts,
    pub promoter_pct: f64,
    pub passive_pct: f64,
    pub detractor_pct: f64,
}

impl BandDistribution {
    pub fn from_scores<I>(scores: I) -> Result<Self, InsufficientDataError>
    where
        I: IntoIterator<Item = u8>,
    {
        Self::from_counts(BandCounts::from_scores(scores))
    }

    #[expect(clippy::cast_precision_loss)]
    pub fn from_counts(counts: BandCounts) -> Result<Self, InsufficientDataError> {
        let total = counts.total();
        if total == 0 {
            return Err(InsufficientDataError);
        }
        let pct = |count: usize| count as f64 / total as f64 * 100.0;
        Ok(Self {
            counts,
            promoter_pct: pct(counts.promoters),
            passive_pct: pct(counts.passives),
            detractor_pct: pct(counts.detractors),
        })
    }

    #[must_use]
    pub fn satisfaction_score(&self) -> f64 {
        self.promoter_pct - self.detractor_pct
    }
}
