//! Error types for the catalog crate.
//!
//! Everything that can go wrong while reading theme files lands here;
//! once a `Catalog` is built, lookups are infallible.

use thiserror::Error;

use crate::types::ImageId;

/// Errors that can occur while loading and validating a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The data directory does not exist or is not a directory
    #[error("Data directory not found: {path}")]
    DataDirNotFound { path: String },

    /// I/O error occurred while reading a theme file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A theme file is not valid JSON or does not match the image schema
    ///
    /// Keeps the file name so the user knows which theme to fix.
    #[error("Parse error in {file}: {source}")]
    ParseError {
        file: String,
        source: serde_json::Error,
    },

    /// A date-added value is neither RFC 3339 nor `YYYY-MM-DD`
    #[error("Invalid date-added value: {value}")]
    InvalidDate { value: String },

    /// Two images share the same identifier
    #[error("Duplicate image id: {id}")]
    DuplicateImage { id: ImageId },

    /// The directory held no theme files at all
    #[error("No themes found in {path}")]
    EmptyCatalog { path: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
