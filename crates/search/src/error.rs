//! Errors raised when UI form input is turned into a `FilterSpec`.
//!
//! The pipeline itself never fails; only the boundary does.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("Unknown sort mode: {0:?} (expected relevance, newest, popular or random)")]
    UnknownSortMode(String),

    #[error("Unknown orientation: {0:?} (expected landscape, portrait or square)")]
    UnknownOrientation(String),
}

pub type Result<T> = std::result::Result<T, SpecError>;
