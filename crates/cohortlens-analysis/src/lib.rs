//! Survey analytics for multi-track training programs
//!
//! This crate turns parsed survey rows into the metrics of a program report:
//! satisfaction scores, categorized improvement suggestions and ranked
//! favorite sessions, overall and per cohort.
//!
//! # Overview
//!
//! ```text
//! raw rows ──► ResponseStore ──┬─► score       (satisfaction, band shares)
//!                              ├─► categorize  (improvement categories)
//!                              ├─► ranking     (favorite sessions)
//!                              ├─► feedback    (lowest scorers, verbatim)
//!                              └─► report      (everything above, packaged)
//! ```
//!
//! 1. **Load Responses** ([`store::ResponseStore`]): Validate raw rows into
//!    immutable [`response::ParticipantResponse`] values
//! 2. **Score** ([`score`]): Promoter-minus-detractor satisfaction score
//! 3. **Categorize** ([`categorize::TextCategorizer`]): Keyword tallies against
//!    a [`taxonomy::CategoryTaxonomy`]
//! 4. **Rank** ([`ranking::SessionRanker`]): One point per session mention
//! 5. **Assemble** ([`report::SurveyReport`]): Combine all outputs
//!
//! Every component is a pure function of an immutable store; nothing here
//! performs I/O.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use cohortlens_analysis::{
//!     report::{ReportConfig, SurveyReport},
//!     response::Cohort,
//!     store::{RawRow, ResponseStore},
//! };
//!
//! let config = ReportConfig::default();
//! let columns = &config.columns;
//! let row = |id: &str, track: &str, score: &str, improve: &str| -> RawRow {
//!     BTreeMap::from([
//!         (columns.id.clone(), Some(id.to_owned())),
//!         (columns.cohort.clone(), Some(track.to_owned())),
//!         (columns.recommendation.clone(), Some(score.to_owned())),
//!         (columns.improvement.clone(), Some(improve.to_owned())),
//!     ])
//! };
//!
//! let store = ResponseStore::load(
//!     [
//!         row("1", "DEV", "10 (Extremely likely)", "More hands-on labs"),
//!         row("2", "EXEC", "6", "Tighter agenda"),
//!     ],
//!     columns,
//! )?;
//!
//! let report = SurveyReport::assemble(&store, &config)?;
//! assert_eq!(report.overall_score, 0.0);
//! assert_eq!(report.score_by_cohort[&Cohort::from("DEV")], 100.0);
//! assert_eq!(report.category_tally_overall.get("structure"), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod categorize;
pub mod feedback;
pub mod ranking;
pub mod report;
pub mod response;
pub mod score;
pub mod store;
pub mod taxonomy;
