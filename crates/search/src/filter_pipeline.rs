//! Narrowing of the image collection, one criterion at a time.

use crate::filter_spec::FilterSpec;
use crate::filters::{CategoryFilter, NewOnlyFilter, OrientationFilter, QueryFilter, TagFilter};
use crate::traits::Filter;
use catalog::ImageRecord;
use std::sync::Arc;
use tracing::debug;

/// Ordered list of filters run over the full collection.
///
/// Each filter sees the survivors of the one before it.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(QueryFilter)
///     .add_filter(CategoryFilter);
///
/// let filtered = pipeline.apply(catalog.images().to_vec(), &spec);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// A pipeline that keeps everything
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The gallery's pipeline: query, categories, tags, orientation, new-only.
    pub fn standard() -> Self {
        Self::new()
            .add_filter(QueryFilter)
            .add_filter(CategoryFilter)
            .add_filter(TagFilter)
            .add_filter(OrientationFilter)
            .add_filter(NewOnlyFilter)
    }

    /// Append `filter` after the ones already added
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run every filter in order. Survivors keep their input order.
    pub fn apply(&self, images: Vec<Arc<ImageRecord>>, spec: &FilterSpec) -> Vec<Arc<ImageRecord>> {
        self.filters.iter().fold(images, |kept, filter| {
            let before = kept.len();
            let kept = filter.apply(kept, spec);
            debug!("{}: {} -> {} images", filter.name(), before, kept.len());
            kept
        })
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
