//! Improvement category taxonomy
//!
//! A taxonomy is an ordered list of categories, each with an ordered list of
//! keyword phrases. The order is part of the contract: it fixes the iteration
//! order of the categorizer and breaks ties when tallies are ranked.
//!
//! # Serialization
//!
//! Taxonomies are stored as a JSON array so the definition order survives a
//! round trip through a file:
//!
//! ```json
//! [
//!   { "name": "hands_on", "keywords": ["hands on", "hands-on", "practical"] },
//!   { "name": "structure", "keywords": ["schedule", "agenda", "structure"] }
//! ]
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TaxonomyError {
    #[display("category '{name}' is defined more than once")]
    DuplicateCategory { name: String },
    #[display("category '{name}' has an empty keyword")]
    EmptyKeyword { name: String },
}

/// One improvement category and the phrases that signal it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Immutable, ordered set of improvement categories.
///
/// Keywords are lowercased on construction so they can be matched against
/// lowercased text directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategoryTaxonomy {
    categories: Vec<Category>,
}

impl CategoryTaxonomy {
    /// Builds a taxonomy from `(name, keywords)` pairs in definition order.
    ///
    /// ```
    /// # use cohortlens_analysis::taxonomy::CategoryTaxonomy;
    /// let taxonomy = CategoryTaxonomy::new([
    ///     ("hands_on", vec!["Hands On"]),
    ///     ("structure", vec!["structure", "agenda"]),
    /// ])
    /// .unwrap();
    /// assert_eq!(taxonomy.categories()[0].keywords, ["hands on"]);
    /// ```
    pub fn new<I, N, K>(categories: I) -> Result<Self, TaxonomyError>
    where
        I: IntoIterator<Item = (N, Vec<K>)>,
        N: Into<String>,
        K: AsRef<str>,
    {
        let categories = categories
            .into_iter()
            .map(|(name, keywords)| Category {
                name: name.into(),
                keywords: keywords
                    .iter()
                    .map(|k| k.as_ref().to_owned())
                    .collect(),
            })
            .collect::<Vec<_>>();
        Self::try_from(categories)
    }

    /// Improvement categories for training program feedback.
    #[must_use]
    pub fn default_improvements() -> Self {
        let categories: [(&str, Vec<&str>); 8] = [
            (
                "hands_on",
                vec![
                    "hands on",
                    "hands-on",
                    "practical",
                    "demos",
                    "tutorials",
                    "exercises",
                    "projects",
                    "coding",
                ],
            ),
            (
                "structure",
                vec![
                    "schedule",
                    "agenda",
                    "structure",
                    "organization",
                    "planning",
                    "logistics",
                ],
            ),
            (
                "content",
                vec![
                    "content",
                    "basics",
                    "fundamentals",
                    "technical",
                    "insights",
                    "learning",
                ],
            ),
            (
                "communication",
                vec![
                    "communication",
                    "emails",
                    "reminders",
                    "guidelines",
                    "instructions",
                ],
            ),
            (
                "logistics",
                vec![
                    "room",
                    "food",
                    "wifi",
                    "outlets",
                    "setup",
                    "prep work",
                    "materials",
                ],
            ),
            (
                "interactive",
                vec!["interactive", "discussions", "team projects", "workflows"],
            ),
            (
                "time",
                vec![
                    "time management",
                    "longer sessions",
                    "more time",
                    "unstructured time",
                ],
            ),
            (
                "track_specific",
                vec![
                    "tracks",
                    "career path",
                    "developer",
                    "productivity",
                    "executive",
                ],
            ),
        ];
        Self {
            categories: categories
                .into_iter()
                .map(|(name, keywords)| Category {
                    name: name.to_owned(),
                    keywords: keywords.into_iter().map(str::to_owned).collect(),
                })
                .collect(),
        }
    }

    /// Categories in definition order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Definition position of a category, used as the ranking tie-break.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::default_improvements()
    }
}

impl TryFrom<Vec<Category>> for CategoryTaxonomy {
    type Error = TaxonomyError;

    fn try_from(mut categories: Vec<Category>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for category in &mut categories {
            if !seen.insert(category.name.clone()) {
                return Err(TaxonomyError::DuplicateCategory {
                    name: category.name.clone(),
                });
            }
            for keyword in &mut category.keywords {
                if keyword.is_empty() {
                    return Err(TaxonomyError::EmptyKeyword {
                        name: category.name.clone(),
                    });
                }
                *keyword = keyword.to_lowercase();
            }
        }
        Ok(Self { categories })
    }
}

impl From<CategoryTaxonomy> for Vec<Category> {
    fn from(taxonomy: CategoryTaxonomy) -> Self {
        taxonomy.categories
    }
}

/// Renders a category name for display: `hands_on` becomes `Hands On`.
///
/// ```
/// # use cohortlens_analysis::taxonomy::category_label;
/// assert_eq!(category_label("track_specific"), "Track Specific");
/// ```
#[must_use]
pub fn category_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_order() {
        let taxonomy = CategoryTaxonomy::default_improvements();
        let names = taxonomy
            .categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [
                "hands_on",
                "structure",
                "content",
                "communication",
                "logistics",
                "interactive",
                "time",
                "track_specific",
            ]
        );
        assert_eq!(taxonomy.position("time"), Some(6));
        assert_eq!(taxonomy.position("missing"), None);
    }

    #[test]
    fn test_default_taxonomy_passes_validation() {
        let taxonomy = CategoryTaxonomy::default_improvements();
        let rebuilt = CategoryTaxonomy::try_from(Vec::<Category>::from(taxonomy.clone())).unwrap();
        assert_eq!(rebuilt, taxonomy);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let err = CategoryTaxonomy::new([("a", vec!["x"]), ("a", vec!["y"])]).unwrap_err();
        assert_eq!(
            err,
            TaxonomyError::DuplicateCategory {
                name: "a".to_owned()
            }
        );
    }

    #[test]
    fn test_empty_keyword_rejected() {
        let err = CategoryTaxonomy::new([("a", vec!["x", ""])]).unwrap_err();
        assert_eq!(
            err,
            TaxonomyError::EmptyKeyword {
                name: "a".to_owned()
            }
        );
    }

    #[test]
    fn test_json_keeps_definition_order() {
        let json = r#"[
            {"name": "zeta", "keywords": ["Z"]},
            {"name": "alpha", "keywords": ["A", "Prep Work"]}
        ]"#;
        let taxonomy: CategoryTaxonomy = serde_json::from_str(json).unwrap();
        assert_eq!(taxonomy.categories()[0].name, "zeta");
        assert_eq!(taxonomy.categories()[1].keywords, ["a", "prep work"]);

        let err = serde_json::from_str::<CategoryTaxonomy>(
            r#"[{"name": "a", "keywords": []}, {"name": "a", "keywords": []}]"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("hands_on"), "Hands On");
        assert_eq!(category_label("time"), "Time");
        assert_eq!(category_label("already Upper"), "Already upper");
        assert_eq!(category_label(""), "");
    }
}
