//! Filter to show only freshly added images.

use crate::filter_spec::FilterSpec;
use crate::traits::Filter;
use catalog::ImageRecord;
use std::sync::Arc;

/// Keeps images flagged new when the filter asks for new-only.
pub struct NewOnlyFilter;

impl Filter for NewOnlyFilter {
    fn name(&self) -> &str {
        "NewOnlyFilter"
    }

    fn apply(&self, images: Vec<Arc<ImageRecord>>, spec: &FilterSpec) -> Vec<Arc<ImageRecord>> {
        if !spec.new_only {
            return images;
        }

        images.into_iter().filter(|image| image.is_new).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_only_filter() {
        let images = vec![
            Arc::new(ImageRecord::new("old", "s", "a")),
            Arc::new(ImageRecord::new("fresh", "s", "b").with_new(true)),
        ];

        let kept = NewOnlyFilter.apply(images.clone(), &FilterSpec::new().with_new_only(true));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "fresh");

        let all = NewOnlyFilter.apply(images, &FilterSpec::new());
        assert_eq!(all.len(), 2);
    }
}
