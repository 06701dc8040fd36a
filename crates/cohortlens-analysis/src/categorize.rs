//! Keyword categorization of free-text answers
//!
//! Maps free-text answers onto a [`CategoryTaxonomy`] by substring matching.
//!
//! # Matching Rules
//!
//! For every non-empty text, the text is lowercased and each keyword of each
//! category is checked once with a substring test:
//!
//! - a hit adds exactly one mention to the keyword's category
//! - two different keywords of one category in the same text add two mentions
//! - a keyword repeated inside one text still adds one mention
//! - keywords are not word-bounded: `"room"` matches `"classroom"`
//! - multi-word keywords must appear verbatim, including the whitespace
//!
//! Absent and blank texts are skipped entirely.
//!
//! # Examples
//!
//! ```
//! use cohortlens_analysis::{categorize::TextCategorizer, taxonomy::CategoryTaxonomy};
//!
//! let taxonomy = CategoryTaxonomy::new([
//!     ("hands_on", vec!["hands on"]),
//!     ("structure", vec!["structure", "agenda"]),
//! ])
//! .unwrap();
//! let categorizer = TextCategorizer::new(taxonomy);
//!
//! let tally = categorizer.categorize([
//!     "need more hands on practice",
//!     "better structure and agenda",
//! ]);
//! assert_eq!(tally.get("hands_on"), Some(1));
//! assert_eq!(tally.get("structure"), Some(2));
//! ```

use std::collections::BTreeMap;

use serde::{Serialize, ser::SerializeMap as _};

use crate::{
    response::{Cohort, ParticipantResponse, ResponseField},
    store::ResponseStore,
    taxonomy::CategoryTaxonomy,
};

/// Mention count per category for one scope.
///
/// Only categories with at least one mention are present. Entries are kept in
/// taxonomy definition order, which is also the order they serialize in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryTally {
    entries: Vec<(String, usize)>,
}

impl CategoryTally {
    #[must_use]
    pub fn get(&self, category: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, count)| *count)
    }

    /// Entries in taxonomy definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    /// Entries by descending count.
    ///
    /// Ties keep taxonomy definition order, so the first-defined category wins.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked = self.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    #[must_use]
    pub fn total_mentions(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CategoryTally {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Categorizes free text against a fixed taxonomy.
#[derive(Debug, Clone)]
pub struct TextCategorizer {
    taxonomy: CategoryTaxonomy,
}

impl TextCategorizer {
    #[must_use]
    pub fn new(taxonomy: CategoryTaxonomy) -> Self {
        Self { taxonomy }
    }

    #[must_use]
    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    /// Tallies keyword hits over `texts`.
    pub fn categorize<I, S>(&self, texts: I) -> CategoryTally
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let categories = self.taxonomy.categories();
        let mut counts = vec![0_usize; categories.len()];

        for text in texts {
            let text = text.as_ref();
            if text.trim().is_empty() {
                continue;
            }
            let lower = text.to_lowercase();
            for (count, category) in counts.iter_mut().zip(categories) {
                *count += category
                    .keywords
                    .iter()
                    .filter(|keyword| lower.contains(keyword.as_str()))
                    .count();
            }
        }

        let entries = categories
            .iter()
            .zip(counts)
            .filter(|(_, count)| *count > 0)
            .map(|(category, count)| (category.name.clone(), count))
            .collect();
        CategoryTally { entries }
    }

    /// Tallies the selected field over an arbitrary set of responses.
    pub fn categorize_responses<'a, I>(&self, responses: I, field: &ResponseField) -> CategoryTally
    where
        I: IntoIterator<Item = &'a ParticipantResponse>,
    {
        self.categorize(responses.into_iter().filter_map(|r| r.text(field)))
    }

    /// Tallies the selected field over every response in the store.
    #[must_use]
    pub fn categorize_overall(&self, store: &ResponseStore, field: &ResponseField) -> CategoryTally {
        self.categorize_responses(store.all_responses(), field)
    }

    /// Tallies the selected field per cohort.
    ///
    /// Every known cohort is present. A cohort without text or without hits
    /// maps to an empty tally, which tells it apart from a cohort absent from
    /// the data.
    #[must_use]
    pub fn categorize_by_cohort(
        &self,
        store: &ResponseStore,
        field: &ResponseField,
    ) -> BTreeMap<Cohort, CategoryTally> {
        store
            .known_cohorts()
            .iter()
            .map(|cohort| {
                let tally = self.categorize_responses(store.responses_for_cohort(cohort), field);
                (cohort.clone(), tally)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ColumnMapping, RawRow};

    fn categorizer() -> TextCategorizer {
        TextCategorizer::new(
            CategoryTaxonomy::new([
                ("hands_on", vec!["hands on"]),
                ("structure", vec!["structure", "agenda"]),
                ("logistics", vec!["room", "food"]),
            ])
            .unwrap(),
        )
    }

    fn store(entries: &[(&str, Option<&str>)]) -> ResponseStore {
        let columns = ColumnMapping::default();
        let rows = entries.iter().enumerate().map(|(id, (cohort, text))| {
            RawRow::from([
                (columns.id.clone(), Some(id.to_string())),
                (columns.cohort.clone(), Some((*cohort).to_owned())),
                (columns.improvement.clone(), text.map(str::to_owned)),
            ])
        });
        ResponseStore::load(rows, &columns).unwrap()
    }

    #[test]
    fn test_two_keywords_same_category() {
        let tally = categorizer().categorize([
            "need more hands on practice",
            "better structure and agenda",
        ]);
        assert_eq!(tally.get("hands_on"), Some(1));
        assert_eq!(tally.get("structure"), Some(2));
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn test_zero_count_categories_are_omitted() {
        let tally = categorizer().categorize(["the agenda was fine"]);
        assert_eq!(tally.get("logistics"), None);
        assert_eq!(tally.iter().collect::<Vec<_>>(), [("structure", 1)]);
    }

    #[test]
    fn test_repeated_keyword_counts_once_per_text() {
        let tally = categorizer().categorize(["agenda agenda AGENDA"]);
        assert_eq!(tally.get("structure"), Some(1));
    }

    #[test]
    fn test_case_insensitive_substring_match() {
        let tally = categorizer().categorize(["The CLASSROOM was cold", "Hands On labs"]);
        assert_eq!(tally.get("logistics"), Some(1));
        assert_eq!(tally.get("hands_on"), Some(1));
    }

    #[test]
    fn test_phrase_must_match_verbatim() {
        let tally = categorizer().categorize(["hands-on labs", "hands  on labs"]);
        assert!(tally.is_empty());
    }

    #[test]
    fn test_blank_texts_are_skipped() {
        let tally = categorizer().categorize(["", "   "]);
        assert!(tally.is_empty());
        assert_eq!(tally.total_mentions(), 0);
    }

    #[test]
    fn test_categorize_is_idempotent() {
        let c = categorizer();
        let texts = ["food and room", "agenda", "hands on"];
        assert_eq!(c.categorize(texts), c.categorize(texts));
    }

    #[test]
    fn test_ranked_breaks_ties_by_definition_order() {
        // logistics is found first in the text but is defined last
        let tally = categorizer().categorize(["room and agenda and hands on"]);
        assert_eq!(
            tally.ranked(),
            [("hands_on", 1), ("structure", 1), ("logistics", 1)]
        );

        let tally = categorizer().categorize(["room, food", "agenda", "hands on"]);
        assert_eq!(
            tally.ranked(),
            [("logistics", 2), ("hands_on", 1), ("structure", 1)]
        );
    }

    #[test]
    fn test_serializes_in_taxonomy_order() {
        let tally = categorizer().categorize(["food", "agenda", "food"]);
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"structure":1,"logistics":2}"#);
    }

    #[test]
    fn test_overall_and_by_cohort() {
        let s = store(&[
            ("DEV", Some("more hands on")),
            ("EXEC", Some("nothing to add")),
            ("DEV", Some("fix the agenda")),
            ("PROD", None),
            ("EXEC", Some("better food")),
        ]);
        let c = categorizer();
        let overall = c.categorize_overall(&s, &ResponseField::Improvement);
        assert_eq!(overall.total_mentions(), 3);

        let by_cohort = c.categorize_by_cohort(&s, &ResponseField::Improvement);
        assert_eq!(by_cohort.len(), 3);
        assert_eq!(by_cohort[&Cohort::from("DEV")].len(), 2);
        assert_eq!(by_cohort[&Cohort::from("EXEC")].get("logistics"), Some(1));
        assert!(by_cohort[&Cohort::from("PROD")].is_empty());
        assert!(!by_cohort.contains_key(&Cohort::from("OPS")));
    }

    #[test]
    fn test_mapped_column_selected_as_answer() {
        let s = store(&[("DEV", Some("Bigger room")), ("EXEC", Some("Clear agenda"))]);
        let fixed = categorizer().categorize_overall(&s, &ResponseField::Improvement);
        let by_column = categorizer().categorize_overall(
            &s,
            &ResponseField::Answer(ColumnMapping::default().improvement),
        );
        assert_eq!(by_column, fixed);
        assert_eq!(by_column.get("logistics"), Some(1));
    }
}
