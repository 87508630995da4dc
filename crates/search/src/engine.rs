//! Filter, sort, paginate: the whole evaluation in one call.

use crate::filter_pipeline::FilterPipeline;
use crate::filter_spec::FilterSpec;
use crate::page::{ResultPage, paginate};
use crate::sort::sort_images;
use catalog::ImageRecord;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Evaluates filter specifications against an image collection.
///
/// Holds the filter pipeline and the session nonce mixed into the random
/// sort's seed. Evaluation is a pure function of its inputs and the nonce.
pub struct SearchEngine {
    pipeline: FilterPipeline,
    nonce: u64,
}

impl SearchEngine {
    /// Standard pipeline, nonce 0
    pub fn new() -> Self {
        Self {
            pipeline: FilterPipeline::standard(),
            nonce: 0,
        }
    }

    /// Configure the nonce used to seed random ordering (default: 0)
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Replace the filter pipeline (default: `FilterPipeline::standard()`)
    pub fn with_pipeline(mut self, pipeline: FilterPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Produce the visible result for `filter` at `page`.
    ///
    /// ## Algorithm
    /// 1. Run the filter pipeline over the full collection
    /// 2. Sort the survivors by `filter.sort_by`
    /// 3. Keep the first `page * page_size` of them
    #[instrument(skip(self, images, filter), fields(sort = %filter.sort_by))]
    pub fn evaluate(
        &self,
        images: &[Arc<ImageRecord>],
        filter: &FilterSpec,
        page: usize,
        page_size: usize,
    ) -> ResultPage {
        let mut matched = self.pipeline.apply(images.to_vec(), filter);
        sort_images(&mut matched, filter.sort_by, filter.shuffle_seed(self.nonce));

        let result = paginate(matched, page, page_size);
        debug!(
            "Evaluated: {} of {} visible (of {} in collection), has_more={}",
            result.len(),
            result.total_count,
            images.len(),
            result.has_more
        );
        result
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off evaluation with the standard pipeline and nonce 0.
pub fn evaluate(
    images: &[Arc<ImageRecord>],
    filter: &FilterSpec,
    page: usize,
    page_size: usize,
) -> ResultPage {
    SearchEngine::new().evaluate(images, filter, page, page_size)
}
