//! # Catalog Crate
//!
//! Loads the themed image collections the gallery searches over.
//!
//! ## Main Components
//!
//! - **types**: `ImageRecord`, `Orientation` and the `Catalog` store
//! - **parser**: read `themes.json` bundles and per-theme `*.json` files
//! - **index**: build and validate a `Catalog` from a data directory
//! - **error**: error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_dir(Path::new("data/themes"))?;
//!
//! println!("{} images in {} themes", catalog.len(), catalog.categories().len());
//! for tag in catalog.available_tags() {
//!     println!("tag: {tag}");
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{parse_date_added, Catalog, ImageId, ImageRecord, Orientation};
