//! Numeric helpers for survey analytics.
//!
//! This crate holds the arithmetic behind the survey reports. It knows nothing
//! about participants, cohorts or free text; it only turns recommendation
//! scores and plain numbers into aggregate figures.
//!
//! - **Recommendation bands**: Classify 0-10 answers as promoter, passive or detractor
//! - **Satisfaction score**: Promoter percentage minus detractor percentage
//! - **Band distribution**: Percentage share of each band
//! - **Descriptive statistics**: Min, max, mean, median and spread of a dataset
//!
//! # Modules
//!
//! - [`nps`]: Net-Promoter-style banding and scoring
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//!
//! # Examples
//!
//! ## Computing a satisfaction score
//!
//! ```
//! use cohortlens_stats::nps;
//!
//! let score = nps::satisfaction_score([10, 10, 9, 8, 7, 6, 0]).unwrap();
//! assert!((score - 100.0 / 7.0).abs() < 1e-9);
//! ```
//!
//! ## Computing the band distribution
//!
//! ```
//! use cohortlens_stats::nps::BandDistribution;
//!
//! let dist = BandDistribution::from_scores([10, 8, 3, 9]).unwrap();
//! assert_eq!(dist.promoter_pct, 50.0);
//! assert_eq!(dist.passive_pct, 25.0);
//! assert_eq!(dist.detractor_pct, 25.0);
//! ```
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use cohortlens_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub mod descriptive;
pub mod nps;
