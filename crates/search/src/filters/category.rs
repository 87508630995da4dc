//! Filter to keep only the selected themes.

use crate::filter_spec::FilterSpec;
use crate::traits::Filter;
use catalog::ImageRecord;
use std::sync::Arc;

/// Keeps images whose category is one of the selected categories.
///
/// No selection means no narrowing.
pub struct CategoryFilter;

impl Filter for CategoryFilter {
    fn name(&self) -> &str {
        "CategoryFilter"
    }

    fn apply(&self, images: Vec<Arc<ImageRecord>>, spec: &FilterSpec) -> Vec<Arc<ImageRecord>> {
        if spec.categories.is_empty() {
            return images;
        }

        images
            .into_iter()
            .filter(|image| spec.categories.contains(&image.category))
            .collect()
    }
}
