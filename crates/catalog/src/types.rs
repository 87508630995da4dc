//! Core domain types for the theme gallery.
//!
//! An `ImageRecord` is one photo; a `Catalog` holds every record grouped by
//! the theme it came from, plus the flattened view the search pipeline scans.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::error::{CatalogError, Result};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for an image (e.g. "nature_unsplash_3")
pub type ImageId = String;

// =============================================================================
// Image-related Types
// =============================================================================

/// Aspect class of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Landscape,
        Orientation::Portrait,
        Orientation::Square,
    ];

    /// Lowercase name as used in data files and form controls
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }

    /// Case-insensitive lookup by name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single photo in the gallery.
///
/// Records are immutable once loaded. The catalog hands them out as
/// `Arc<ImageRecord>` so the search pipeline can select and reorder them
/// without copying strings around.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: ImageId,
    /// Source URL of the full image
    pub src: String,
    /// Display text, searched by free-text queries
    pub alt: String,
    /// Owning theme. Overwritten with the theme name when loaded into a catalog.
    #[serde(default)]
    pub category: String,
    /// Ordered tag list; duplicates carry no meaning
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    /// Popularity counter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default, with = "date_added", skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,

    // Descriptive metadata, carried for display only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    /// Upload date as given by the source, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    /// Dominant colors, usually hex strings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<String>,
}

impl ImageRecord {
    /// Create a bare record with no tags and no optional attributes
    pub fn new(id: impl Into<ImageId>, src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            alt: alt.into(),
            category: String::new(),
            tags: Vec::new(),
            orientation: None,
            likes: None,
            is_new: false,
            date_added: None,
            resolution: None,
            file_size: None,
            license: None,
            photographer: None,
            source: None,
            download_count: None,
            views: None,
            upload_date: None,
            colors: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_likes(mut self, likes: u32) -> Self {
        self.likes = Some(likes);
        self
    }

    pub fn with_new(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    pub fn with_date_added(mut self, date_added: DateTime<Utc>) -> Self {
        self.date_added = Some(date_added);
        self
    }

    /// Popularity used for ranking; a missing counter counts as 0
    pub fn popularity(&self) -> u32 {
        self.likes.unwrap_or(0)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Parse a date-added value.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps and
/// plain `YYYY-MM-DD` dates. Values without an offset are taken as UTC.
pub fn parse_date_added(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CatalogError::InvalidDate {
            value: value.to_string(),
        })
}

mod date_added {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(stamp) => serializer.serialize_some(&stamp.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|value| super::parse_date_added(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// =============================================================================
// Catalog - The In-Memory Image Store
// =============================================================================

/// Every loaded image, grouped by theme and flattened.
///
/// The flattened list walks themes in lexicographic order and keeps each
/// theme's images in file order. That order is what "relevance" sorting
/// preserves.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Images per theme, in file order
    pub(crate) themes: BTreeMap<String, Vec<Arc<ImageRecord>>>,
    /// All images, theme by theme
    pub(crate) images: Vec<Arc<ImageRecord>>,
    pub(crate) by_id: HashMap<ImageId, Arc<ImageRecord>>,
    /// Ids seen more than once during insertion; reported by `validate`
    pub(crate) duplicate_ids: Vec<ImageId>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an image by id
    pub fn get_image(&self, id: &str) -> Option<&ImageRecord> {
        self.by_id.get(id).map(|image| image.as_ref())
    }

    /// The full flattened collection, ready for the search pipeline
    pub fn images(&self) -> &[Arc<ImageRecord>] {
        &self.images
    }

    /// Images of one theme, or an empty slice for an unknown theme
    pub fn theme_images(&self, theme: &str) -> &[Arc<ImageRecord>] {
        self.themes
            .get(theme)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Theme names, sorted. These are the category values a filter can select.
    pub fn categories(&self) -> Vec<&str> {
        self.themes.keys().map(String::as_str).collect()
    }

    /// Every distinct tag across the catalog, sorted
    pub fn available_tags(&self) -> Vec<&str> {
        self.images
            .iter()
            .flat_map(|image| image.tags.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Add a theme's images.
    ///
    /// Each record's category is set to `theme`, whatever the file said.
    /// Appends when the theme already exists.
    pub fn insert_theme(&mut self, theme: impl Into<String>, images: Vec<ImageRecord>) {
        self.insert_theme_unindexed(theme, images);
        self.rebuild_flattened();
    }

    /// `insert_theme` without refreshing the flattened list. Callers inserting
    /// several themes must call `rebuild_flattened` once afterwards.
    pub(crate) fn insert_theme_unindexed(&mut self, theme: impl Into<String>, images: Vec<ImageRecord>) {
        let theme = theme.into();
        let bucket = self.themes.entry(theme.clone()).or_default();

        for mut image in images {
            image.category = theme.clone();
            let image = Arc::new(image);

            if self.by_id.contains_key(&image.id) {
                self.duplicate_ids.push(image.id.clone());
            } else {
                self.by_id.insert(image.id.clone(), image.clone());
            }
            bucket.push(image);
        }
    }

    pub(crate) fn rebuild_flattened(&mut self) {
        self.images = self.themes.values().flatten().cloned().collect();
    }

    /// (theme count, image count)
    pub fn counts(&self) -> (usize, usize) {
        (self.themes.len(), self.images.len())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
