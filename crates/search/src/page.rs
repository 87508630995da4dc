//! Progressive pagination and the result page handed to the grid.

use catalog::ImageRecord;
use std::sync::Arc;

/// Images per "page" when the caller does not say otherwise
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// One evaluation's output.
///
/// `images` is always a prefix of the full filtered-and-sorted sequence:
/// page N holds everything page N-1 held, plus up to one more page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    pub images: Vec<Arc<ImageRecord>>,
    /// Size of the filtered set before slicing
    pub total_count: usize,
    pub has_more: bool,
    /// Page counter this result was computed for (1-based)
    pub page: usize,
    pub page_size: usize,
}

impl ResultPage {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.images.iter().map(|image| image.id.as_str()).collect()
    }
}

/// Slice the first `page * page_size` images off a sorted set.
///
/// Page 0 counts as page 1 and a page size of 0 falls back to
/// [`DEFAULT_PAGE_SIZE`].
pub fn paginate(mut sorted: Vec<Arc<ImageRecord>>, page: usize, page_size: usize) -> ResultPage {
    let page = page.max(1);
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };

    let total_count = sorted.len();
    let visible = page.saturating_mul(page_size).min(total_count);
    sorted.truncate(visible);

    ResultPage {
        images: sorted,
        total_count,
        has_more: visible < total_count,
        page,
        page_size,
    }
}
