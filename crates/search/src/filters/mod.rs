//! Filter implementations for the search pipeline.
//!
//! One filter per criterion of a `FilterSpec`, in the order the standard
//! pipeline runs them.

pub mod query;
pub mod category;
pub mod tag;
pub mod orientation;
pub mod new_only;

// Re-export for convenience
pub use category::CategoryFilter;
pub use new_only::NewOnlyFilter;
pub use orientation::OrientationFilter;
pub use query::QueryFilter;
pub use tag::TagFilter;
