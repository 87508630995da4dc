//! The filter specification value object and the form it is built from.
//!
//! UI controls produce a loosely-typed `FilterForm` (strings for dropdowns,
//! lists for toggles). `FilterSpec::try_from(form)` is the one place that
//! input gets validated; everything downstream works with the strict type.

use crate::error::{Result, SpecError};
use catalog::Orientation;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// How the filtered set is ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Source order, untouched
    #[default]
    Relevance,
    /// Descending by date added
    Newest,
    /// Descending by likes
    Popular,
    /// Seeded shuffle
    Random,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Relevance,
        SortMode::Newest,
        SortMode::Popular,
        SortMode::Random,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Newest => "newest",
            SortMode::Popular => "popular",
            SortMode::Random => "random",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's current query/category/tag/orientation/sort/new-only selection.
///
/// Replaced wholesale on every change. Sets are ordered so two specs that
/// select the same things compare and hash equal regardless of click order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSpec {
    /// Free-text query, matched as a case-insensitive substring
    pub query: String,
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub orientation: Option<Orientation>,
    pub sort_by: SortMode,
    #[serde(rename = "isNew")]
    pub new_only: bool,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn sorted_by(mut self, mode: SortMode) -> Self {
        self.sort_by = mode;
        self
    }

    pub fn with_new_only(mut self, new_only: bool) -> Self {
        self.new_only = new_only;
        self
    }

    /// True when no criterion narrows the collection (sorting aside)
    pub fn is_unfiltered(&self) -> bool {
        self.query.trim().is_empty()
            && self.categories.is_empty()
            && self.tags.is_empty()
            && self.orientation.is_none()
            && !self.new_only
    }

    /// Number of active criteria, counting a non-default sort as one.
    /// This is the badge count shown next to the filter toggle.
    pub fn active_count(&self) -> usize {
        self.categories.len()
            + self.tags.len()
            + usize::from(self.orientation.is_some())
            + usize::from(self.new_only)
            + usize::from(self.sort_by != SortMode::Relevance)
    }

    /// Seed for the random sort.
    ///
    /// Identical specs in the same session always shuffle the same way, so
    /// loading more pages never reorders what is already on screen.
    pub fn shuffle_seed(&self, session_nonce: u64) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        session_nonce.hash(&mut hasher);
        hasher.finish()
    }
}

/// Raw filter input as form controls produce it.
///
/// Empty strings mean "not set" for the dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterForm {
    pub query: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub orientation: String,
    pub sort_by: String,
    pub is_new: bool,
}

impl TryFrom<FilterForm> for FilterSpec {
    type Error = SpecError;

    fn try_from(form: FilterForm) -> Result<Self> {
        let orientation = match form.orientation.trim() {
            "" => None,
            name => Some(
                Orientation::from_name(name)
                    .ok_or_else(|| SpecError::UnknownOrientation(name.to_string()))?,
            ),
        };

        let sort_by = match form.sort_by.trim() {
            "" => SortMode::default(),
            name => SortMode::from_name(name)
                .ok_or_else(|| SpecError::UnknownSortMode(name.to_string()))?,
        };

        Ok(FilterSpec {
            query: form.query.trim().to_string(),
            categories: clean_selection(form.categories),
            tags: clean_selection(form.tags),
            orientation,
            sort_by,
            new_only: form.is_new,
        })
    }
}

/// Drop blank entries and collapse duplicates
fn clean_selection(values: Vec<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
