//! Free-text search over display text, tags and category.
//!
//! This is plain substring containment: no tokenizing, no ranking.

use crate::filter_spec::FilterSpec;
use crate::traits::Filter;
use catalog::ImageRecord;
use std::sync::Arc;

/// Keeps images whose display text, any tag, or category contains the query.
///
/// ## Algorithm
/// 1. Skip entirely when the query is blank after trimming
/// 2. Lowercase the query once
/// 3. Keep an image if its lowercased alt text, one of its lowercased tags,
///    or its lowercased category contains the query
///
/// The query is matched as given (only lowercased). Trimming happens where
/// form input becomes a `FilterSpec`.
pub struct QueryFilter;

impl QueryFilter {
    fn matches(image: &ImageRecord, needle: &str) -> bool {
        image.alt.to_lowercase().contains(needle)
            || image.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
            || image.category.to_lowercase().contains(needle)
    }
}

impl Filter for QueryFilter {
    fn name(&self) -> &str {
        "QueryFilter"
    }

    fn apply(&self, images: Vec<Arc<ImageRecord>>, spec: &FilterSpec) -> Vec<Arc<ImageRecord>> {
        if spec.query.trim().is_empty() {
            return images;
        }
        let needle = spec.query.to_lowercase();

        images
            .into_iter()
            .filter(|image| Self::matches(image, &needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{ids, image};

    fn images() -> Vec<Arc<ImageRecord>> {
        vec![
            image("1", "nature", "Misty Forest at dawn", &["fog", "trees"]),
            image("2", "urban", "Night skyline", &["city", "Lights"]),
            image("3", "food", "Fresh bread", &["bakery"]),
            image("4", "nature", "Quiet lake", &["water"]),
        ]
    }

    #[test]
    fn test_matches_display_text_case_insensitively() {
        let spec = FilterSpec::new().with_query("FOREST");
        let filtered = QueryFilter.apply(images(), &spec);
        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn test_matches_tags_and_category() {
        let by_tag = QueryFilter.apply(images(), &FilterSpec::new().with_query("light"));
        assert_eq!(ids(&by_tag), vec!["2"]);

        let by_category = QueryFilter.apply(images(), &FilterSpec::new().with_query("natu"));
        assert_eq!(ids(&by_category), vec!["1", "4"]);
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        let filtered = QueryFilter.apply(images(), &FilterSpec::new().with_query("  \t"));
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_no_match() {
        let filtered = QueryFilter.apply(images(), &FilterSpec::new().with_query("volcano"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_query_spanning_words() {
        let filtered = QueryFilter.apply(images(), &FilterSpec::new().with_query("night sky"));
        assert_eq!(ids(&filtered), vec!["2"]);
    }
}
