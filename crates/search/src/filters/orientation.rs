//! Filter on image orientation.

use crate::filter_spec::FilterSpec;
use crate::traits::Filter;
use catalog::ImageRecord;
use std::sync::Arc;

/// Keeps images with the requested orientation.
///
/// Images with no orientation attribute are dropped whenever a constraint
/// is set.
pub struct OrientationFilter;

impl Filter for OrientationFilter {
    fn name(&self) -> &str {
        "OrientationFilter"
    }

    fn apply(&self, images: Vec<Arc<ImageRecord>>, spec: &FilterSpec) -> Vec<Arc<ImageRecord>> {
        let Some(wanted) = spec.orientation else {
            return images;
        };

        images
            .into_iter()
            .filter(|image| image.orientation == Some(wanted))
            .collect()
    }
}
