//! The gallery session: page counter, load-more bookkeeping and the current
//! result for one user's browsing.

use crate::config::GalleryConfig;
use anyhow::{Context, Result};
use catalog::Catalog;
use search::{FilterForm, FilterSpec, ResultPage, SearchEngine, SpecError};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Handle for one outstanding "load more" request.
///
/// Only the most recently issued ticket can be resolved; any filter change
/// invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    id: u64,
    generation: u64,
    page: usize,
}

impl LoadTicket {
    /// The page this ticket will load once resolved
    pub fn page(&self) -> usize {
        self.page
    }

    /// Filter generation the ticket was issued under
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Viewport measurements reported by the grid's scroll container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollPosition {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollPosition {
    pub fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Whether the bottom of the viewport is within `threshold` of the end
    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - threshold
    }
}

/// Counters reported when a session is closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub evaluations: u64,
    pub filter_changes: u64,
    pub pages_loaded: u64,
    /// Load tickets that arrived after their filter was replaced
    pub stale_discarded: u64,
    /// Load requests ignored because nothing more was available or a load
    /// was already pending
    pub ignored_load_requests: u64,
}

/// One user's view of the gallery.
///
/// Owns the filter, the page counter and the latest result. Every change
/// re-evaluates against the full catalog.
pub struct GallerySession {
    catalog: Arc<Catalog>,
    engine: SearchEngine,
    page_size: usize,
    scroll_threshold: f64,
    filter: FilterSpec,
    page: usize,
    generation: u64,
    next_ticket: u64,
    pending: Option<LoadTicket>,
    /// `scroll_height` reported when scrolling last triggered a load
    scroll_loaded_at: Option<f64>,
    current: ResultPage,
    stats: SessionStats,
}

impl GallerySession {
    /// Start a session with a fresh random shuffle nonce
    pub fn new(catalog: Arc<Catalog>, config: &GalleryConfig) -> Self {
        Self::with_nonce(catalog, config, rand::random())
    }

    /// Start a session with a fixed shuffle nonce
    pub fn with_nonce(catalog: Arc<Catalog>, config: &GalleryConfig, nonce: u64) -> Self {
        let mut session = Self {
            catalog,
            engine: SearchEngine::new().with_nonce(nonce),
            page_size: config.page_size,
            scroll_threshold: config.scroll_threshold,
            filter: FilterSpec::default(),
            page: 1,
            generation: 0,
            next_ticket: 0,
            pending: None,
            scroll_loaded_at: None,
            current: ResultPage::default(),
            stats: SessionStats::default(),
        };
        session.refresh();

        info!(
            "Session opened over {} images (page size {}, nonce {nonce})",
            session.catalog.len(),
            session.page_size
        );
        session
    }

    /// Load the catalog from `config.data_dir` and start a session over it
    pub fn open(config: &GalleryConfig) -> Result<Self> {
        let catalog = Catalog::load_from_dir(&config.data_dir)
            .with_context(|| format!("Failed to load catalog from {}", config.data_dir.display()))?;
        Ok(Self::new(Arc::new(catalog), config))
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Incremented on every filter change or reset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &ResultPage {
        &self.current
    }

    pub fn nonce(&self) -> u64 {
        self.engine.nonce()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// True while a load ticket is outstanding
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the filter.
    ///
    /// A filter different from the current one resets the page to 1 and
    /// invalidates any pending load. An identical filter changes nothing.
    #[instrument(skip(self, filter))]
    pub fn apply_filter(&mut self, filter: FilterSpec) -> &ResultPage {
        if filter == self.filter {
            debug!("Filter unchanged, keeping page {}", self.page);
            return &self.current;
        }

        self.filter = filter;
        self.stats.filter_changes += 1;
        self.restart();
        &self.current
    }

    /// Validate raw form input, then apply it
    pub fn apply_form(&mut self, form: FilterForm) -> Result<&ResultPage, SpecError> {
        let filter = FilterSpec::try_from(form)?;
        Ok(self.apply_filter(filter))
    }

    /// Replace just the query text
    pub fn set_query(&mut self, query: impl Into<String>) -> &ResultPage {
        let filter = FilterSpec {
            query: query.into(),
            ..self.filter.clone()
        };
        self.apply_filter(filter)
    }

    /// Back to page 1 under the current filter
    pub fn reset(&mut self) -> &ResultPage {
        self.restart();
        &self.current
    }

    /// Issue a ticket for the next page.
    ///
    /// Returns `None` when nothing more is available or a load is already
    /// pending.
    pub fn request_load_more(&mut self) -> Option<LoadTicket> {
        if let Some(pending) = self.pending {
            debug!("Load for page {} already pending", pending.page);
            self.stats.ignored_load_requests += 1;
            return None;
        }
        if !self.current.has_more {
            debug!("Nothing more to load ({} shown)", self.current.len());
            self.stats.ignored_load_requests += 1;
            return None;
        }

        let ticket = LoadTicket {
            id: self.next_ticket,
            generation: self.generation,
            page: self.page + 1,
        };
        self.next_ticket += 1;
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Complete a load. Tickets other than the pending one are discarded.
    pub fn resolve(&mut self, ticket: LoadTicket) -> Option<&ResultPage> {
        if self.pending != Some(ticket) {
            warn!(
                "Discarding stale load for page {} (generation {}, current {})",
                ticket.page, ticket.generation, self.generation
            );
            self.stats.stale_discarded += 1;
            return None;
        }

        self.page = ticket.page;
        self.refresh();
        self.pending = None;
        self.stats.pages_loaded += 1;
        Some(&self.current)
    }

    /// Request and resolve the next page in one step
    pub fn load_more(&mut self) -> Option<&ResultPage> {
        let ticket = self.request_load_more()?;
        self.resolve(ticket)
    }

    /// Load the next page if the viewport is near the bottom
    ///
    /// One gesture loads at most one page: after a scroll-triggered load,
    /// further positions are ignored until the grid reports a taller
    /// `scroll_height`.
    pub fn on_scroll(&mut self, position: ScrollPosition) -> Option<&ResultPage> {
        if !position.near_bottom(self.scroll_threshold) {
            return None;
        }
        if let Some(height) = self.scroll_loaded_at {
            if position.scroll_height <= height {
                debug!("Grid has not grown past {height}px since the last load");
                self.stats.ignored_load_requests += 1;
                return None;
            }
        }

        let ticket = self.request_load_more()?;
        self.scroll_loaded_at = Some(position.scroll_height);
        self.resolve(ticket)
    }

    /// End the session and report its counters
    pub fn close(self) -> SessionStats {
        info!(
            "Session closed: {} evaluations, {} filter changes, {} pages loaded, {} stale loads discarded",
            self.stats.evaluations,
            self.stats.filter_changes,
            self.stats.pages_loaded,
            self.stats.stale_discarded
        );
        self.stats
    }

    fn restart(&mut self) {
        self.generation += 1;
        self.page = 1;
        self.scroll_loaded_at = None;
        if let Some(ticket) = self.pending.take() {
            debug!("Invalidated pending load for page {}", ticket.page);
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        self.current = self.engine.evaluate(
            self.catalog.images(),
            &self.filter,
            self.page,
            self.page_size,
        );
        self.stats.evaluations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::ImageRecord;
    use search::SortMode;

    fn catalog(count: usize) -> Arc<Catalog> {
        let mut catalog = Catalog::new();
        catalog.insert_theme(
            "nature",
            (0..count)
                .map(|i| {
                    ImageRecord::new(format!("n{i}"), "s", format!("Forest {i}"))
                        .with_likes(i as u32)
                })
                .collect(),
        );
        catalog.insert_theme(
            "urban",
            vec![ImageRecord::new("u0", "s", "Street at night").with_new(true)],
        );
        Arc::new(catalog)
    }

    fn session(count: usize, page_size: usize) -> GallerySession {
        let config = GalleryConfig::default().with_page_size(page_size);
        GallerySession::with_nonce(catalog(count), &config, 5)
    }

    #[test]
    fn test_opens_on_first_page() {
        let session = session(5, 2);
        assert_eq!(session.page(), 1);
        assert_eq!(session.result().len(), 2);
        assert_eq!(session.result().total_count, 6);
        assert!(!session.is_loading());
        assert_eq!(session.stats().evaluations, 1);
    }

    #[test]
    fn test_load_more_grows_prefix() {
        let mut session = session(5, 2);
        let first = session.result().images.clone();

        let second = session.load_more().unwrap().images.clone();
        assert_eq!(second.len(), 4);
        assert_eq!(&second[..2], &first[..]);
        assert_eq!(session.page(), 2);
    }

    #[test]
    fn test_load_more_noop_when_exhausted() {
        let mut session = session(1, 24);
        assert!(!session.result().has_more);

        assert!(session.request_load_more().is_none());
        assert_eq!(session.page(), 1);
        assert_eq!(session.stats().ignored_load_requests, 1);
    }

    #[test]
    fn test_only_one_pending_load() {
        let mut session = session(10, 2);

        let ticket = session.request_load_more().unwrap();
        assert!(session.is_loading());
        assert!(session.request_load_more().is_none());

        assert!(session.resolve(ticket).is_some());
        assert!(!session.is_loading());
        assert_eq!(session.page(), 2);
    }

    #[test]
    fn test_filter_change_resets_page_and_discards_ticket() {
        let mut session = session(10, 2);
        session.load_more();
        assert_eq!(session.page(), 2);

        let ticket = session.request_load_more().unwrap();
        session.apply_filter(FilterSpec::new().sorted_by(SortMode::Popular));

        assert_eq!(session.page(), 1);
        assert!(!session.is_loading());
        assert!(session.resolve(ticket).is_none());
        assert_eq!(session.page(), 1);
        assert_eq!(session.stats().stale_discarded, 1);
        assert_eq!(session.result().images[0].id, "n9");
    }

    #[test]
    fn test_identical_filter_keeps_page() {
        let mut session = session(10, 2);
        session.load_more();

        session.apply_filter(FilterSpec::default());
        assert_eq!(session.page(), 2);
        assert_eq!(session.stats().filter_changes, 0);
    }

    #[test]
    fn test_every_field_change_resets() {
        let changes = [
            FilterSpec::new().with_query("forest"),
            FilterSpec::new().with_category("nature"),
            FilterSpec::new().with_tag("x"),
            FilterSpec::new().with_orientation(catalog::Orientation::Square),
            FilterSpec::new().sorted_by(SortMode::Newest),
            FilterSpec::new().with_new_only(true),
        ];

        for change in changes {
            let mut session = session(10, 2);
            session.load_more();
            session.apply_filter(change.clone());
            assert_eq!(session.page(), 1, "{change:?}");
        }
    }

    #[test]
    fn test_set_query_keeps_other_fields() {
        let mut session = session(10, 24);
        session.apply_filter(FilterSpec::new().with_category("nature"));
        session.set_query("night");

        assert_eq!(session.filter().query, "night");
        assert!(session.filter().categories.contains("nature"));
        assert!(session.result().is_empty());
    }

    #[test]
    fn test_apply_form_rejects_unknown_sort() {
        let mut session = session(3, 24);
        let form = FilterForm {
            sort_by: "alphabetical".into(),
            ..FilterForm::default()
        };

        assert!(session.apply_form(form).is_err());
        assert_eq!(session.filter(), &FilterSpec::default());
    }

    #[test]
    fn test_scroll_threshold() {
        let mut session = session(10, 2);

        // 1000 - (300 + 500) = 200px from the bottom
        assert!(session.on_scroll(ScrollPosition::new(300.0, 500.0, 1000.0)).is_none());
        assert_eq!(session.page(), 1);

        // exactly 100px from the bottom
        assert!(session.on_scroll(ScrollPosition::new(400.0, 500.0, 1000.0)).is_some());
        assert_eq!(session.page(), 2);
    }

    #[test]
    fn test_scroll_burst_advances_one_page() {
        let mut session = session(20, 2);
        let bottom = ScrollPosition::new(950.0, 800.0, 1800.0);

        for _ in 0..5 {
            session.on_scroll(bottom);
        }
        assert_eq!(session.page(), 2);
        assert_eq!(session.stats().ignored_load_requests, 4);

        // the grid grew, so the next gesture loads again
        assert!(session.on_scroll(ScrollPosition::new(1700.0, 800.0, 2600.0)).is_some());
        assert_eq!(session.page(), 3);
    }

    #[test]
    fn test_filter_change_clears_scroll_guard() {
        let mut session = session(20, 2);
        let bottom = ScrollPosition::new(950.0, 800.0, 1800.0);

        session.on_scroll(bottom);
        session.set_query("forest");
        assert!(session.on_scroll(bottom).is_some());
        assert_eq!(session.page(), 2);
    }

    #[test]
    fn test_reset() {
        let mut session = session(10, 2);
        session.load_more();
        session.load_more();

        session.reset();
        assert_eq!(session.page(), 1);
        assert_eq!(session.result().len(), 2);
    }

    #[test]
    fn test_open_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("sky.json"),
            r#"[{"id": "s1", "src": "s", "alt": "Clouds", "category": "weather"}]"#,
        )
        .unwrap();

        let config = GalleryConfig::default().with_data_dir(dir.path());
        let session = GallerySession::open(&config).unwrap();

        assert_eq!(session.result().ids(), vec!["s1"]);
        assert_eq!(session.result().images[0].category, "sky");
    }

    #[test]
    fn test_open_missing_dir() {
        let config = GalleryConfig::default().with_data_dir("/no/such/gallery");
        let Err(err) = GallerySession::open(&config) else {
            panic!("loading a missing directory should fail");
        };
        assert!(err.to_string().contains("Failed to load catalog"));
    }

    #[test]
    fn test_close_reports_stats() {
        let mut session = session(10, 2);
        session.load_more();
        session.set_query("forest");
        let stale = session.request_load_more().unwrap();
        session.set_query("street");
        session.resolve(stale);

        let stats = session.close();
        assert_eq!(stats.pages_loaded, 1);
        assert_eq!(stats.filter_changes, 2);
        assert_eq!(stats.stale_discarded, 1);
        assert_eq!(stats.evaluations, 4);
    }
}
