//! Core traits for the search pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to the image collection.

use catalog::ImageRecord;
use std::sync::Arc;

use crate::filter_spec::FilterSpec;

/// Core trait for narrowing the image collection.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` lets a pipeline move into a background task
/// - Filters take ownership of the Vec and return the kept subset, in order
/// - A filter whose criterion is unset in the `FilterSpec` returns its input untouched
/// - Filtering never fails; odd input just narrows or widens the result
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of images.
    ///
    /// # Arguments
    /// * `images` - The images to filter (takes ownership)
    /// * `spec` - The current filter specification
    fn apply(&self, images: Vec<Arc<ImageRecord>>, spec: &FilterSpec) -> Vec<Arc<ImageRecord>>;
}
