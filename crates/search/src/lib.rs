//! Search pipeline for the theme gallery.
//!
//! This crate provides:
//! - `FilterSpec`, the value object describing what the user asked for
//! - Filter trait and implementations for narrowing the collection
//! - FilterPipeline for composing filters
//! - Sorting (relevance, newest, popular, seeded random)
//! - Progressive pagination into a `ResultPage`
//!
//! ## Architecture
//! An evaluation runs in stages:
//! 1. Filters remove images that miss a criterion (query, category, tag, ...)
//! 2. The survivors are ordered by the filter's sort mode
//! 3. The first `page * page_size` images become the visible result
//!
//! Every evaluation starts again from the full collection; nothing is
//! patched incrementally.
//!
//! ## Example Usage
//! ```ignore
//! use search::{FilterSpec, SearchEngine, SortMode};
//!
//! let engine = SearchEngine::new().with_nonce(session_nonce);
//! let spec = FilterSpec::new()
//!     .with_query("forest")
//!     .with_category("nature")
//!     .sorted_by(SortMode::Popular);
//!
//! let page = engine.evaluate(catalog.images(), &spec, 1, 24);
//! println!("{} of {} shown", page.len(), page.total_count);
//! ```

pub mod error;
pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod filter_spec;
pub mod sort;
pub mod page;
pub mod engine;

// Re-export main types
pub use engine::{SearchEngine, evaluate};
pub use error::SpecError;
pub use filter_pipeline::FilterPipeline;
pub use filter_spec::{FilterForm, FilterSpec, SortMode};
pub use page::{DEFAULT_PAGE_SIZE, ResultPage};
pub use traits::Filter;
