//! Gallery configuration.
//!
//! Defaults match the gallery front end: 24 images per page, a 300ms quiet
//! period on filter input, and a 100px scroll-proximity threshold. Every value
//! can be overridden from the environment.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use search::DEFAULT_PAGE_SIZE;
use tracing::{info, warn};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 100.0;
pub const DEFAULT_DATA_DIR: &str = "data/themes";

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    /// Directory holding the theme files
    pub data_dir: PathBuf,
    pub page_size: usize,
    /// Quiet period before a filter change is evaluated
    pub debounce: Duration,
    /// Distance from the bottom (px) at which scrolling loads more
    pub scroll_threshold: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

impl GalleryConfig {
    /// Read `GALLERY_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; missing or invalid values keep
    /// their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let page_size: usize = try_load(&lookup, "GALLERY_PAGE_SIZE", defaults.page_size);
        let debounce_ms: u64 = try_load(
            &lookup,
            "GALLERY_DEBOUNCE_MS",
            defaults.debounce.as_millis() as u64,
        );
        let scroll_threshold: f64 = try_load(
            &lookup,
            "GALLERY_SCROLL_THRESHOLD",
            defaults.scroll_threshold,
        );
        let data_dir = lookup("GALLERY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        Self {
            data_dir,
            page_size: if page_size == 0 {
                warn!("GALLERY_PAGE_SIZE must be positive, using {DEFAULT_PAGE_SIZE}");
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            debounce: Duration::from_millis(debounce_ms),
            scroll_threshold,
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_scroll_threshold(mut self, threshold: f64) -> Self {
        self.scroll_threshold = threshold;
        self
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}
