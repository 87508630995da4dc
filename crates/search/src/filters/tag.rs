//! Filter on selected tags (logical OR).

use crate::filter_spec::FilterSpec;
use crate::traits::Filter;
use catalog::ImageRecord;
use std::sync::Arc;

/// Keeps images carrying at least one of the selected tags.
///
/// ## Algorithm
/// Selected tags live in a BTreeSet, so each image costs one lookup per tag
/// it carries.
pub struct TagFilter;

impl Filter for TagFilter {
    fn name(&self) -> &str {
        "TagFilter"
    }

    fn apply(&self, images: Vec<Arc<ImageRecord>>, spec: &FilterSpec) -> Vec<Arc<ImageRecord>> {
        if spec.tags.is_empty() {
            return images;
        }

        images
            .into_iter()
            .filter(|image| image.tags.iter().any(|tag| spec.tags.contains(tag)))
            .collect()
    }
}
