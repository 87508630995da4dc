//! Catalog building and validation.
//!
//! Loading goes in three steps:
//! - find the theme files in the data directory
//! - parse them in parallel with Rayon
//! - insert every theme, then validate the result

use crate::error::{CatalogError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

impl Catalog {
    /// Load every theme found in `data_dir`.
    ///
    /// Steps:
    /// 1. Discover `themes.json` and per-theme `*.json` files
    /// 2. Parse the bundle and the per-theme files in parallel
    /// 3. Insert themes (bundle first, then per-theme files)
    /// 4. Validate: no duplicate ids, at least one theme
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        if !data_dir.is_dir() {
            return Err(CatalogError::DataDirNotFound {
                path: data_dir.display().to_string(),
            });
        }
        info!("Loading theme catalog from {:?}", data_dir);

        let files = parser::discover_theme_files(data_dir)?;
        debug!(
            "Found bundle={} and {} theme files",
            files.bundle.is_some(),
            files.themes.len()
        );

        // The bundle and the per-theme files are independent, so parse both
        // sides at once; per-theme files fan out further with par_iter
        let (bundle, themes) = rayon::join(
            || {
                files
                    .bundle
                    .as_deref()
                    .map(parser::parse_theme_bundle)
                    .transpose()
            },
            || {
                files
                    .themes
                    .par_iter()
                    .filter_map(|path| {
                        let name = parser::theme_name_from_path(path)?;
                        Some(parser::parse_theme_file(path).map(|images| (name, images)))
                    })
                    .collect::<Result<Vec<_>>>()
            },
        );
        let bundle = bundle?.unwrap_or_default();
        let themes = themes?;

        if bundle.is_empty() && themes.is_empty() {
            return Err(CatalogError::EmptyCatalog {
                path: data_dir.display().to_string(),
            });
        }

        let mut catalog = Catalog::new();
        for (name, images) in bundle.into_iter().chain(themes) {
            catalog.insert_theme_unindexed(name, images);
        }
        catalog.rebuild_flattened();

        catalog.validate()?;

        let (theme_count, image_count) = catalog.counts();
        info!(
            "Catalog ready: {} themes, {} images, {} tags",
            theme_count,
            image_count,
            catalog.available_tags().len()
        );
        Ok(catalog)
    }

    /// Build a catalog from an in-memory theme map
    pub fn from_themes(themes: BTreeMap<String, Vec<ImageRecord>>) -> Self {
        let mut catalog = Catalog::new();
        for (name, images) in themes {
            catalog.insert_theme_unindexed(name, images);
        }
        catalog.rebuild_flattened();
        catalog
    }

    /// Validate catalog integrity.
    ///
    /// Check that:
    /// - no image id was inserted twice
    ///
    /// Returns Ok(()) if valid, Err with the first offending id otherwise
    pub fn validate(&self) -> Result<()> {
        if let Some(id) = self.duplicate_ids.first() {
            return Err(CatalogError::DuplicateImage { id: id.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_load_per_theme_files() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "nature.json",
            r#"[{"id": "n1", "src": "s", "alt": "Lake", "category": "wrong"}]"#,
        );
        write(
            dir.path(),
            "urban.json",
            r#"[{"id": "u1", "src": "s", "alt": "Bridge"}, {"id": "u2", "src": "s", "alt": "Metro"}]"#,
        );

        let catalog = Catalog::load_from_dir(dir.path()).unwrap();

        assert_eq!(catalog.counts(), (2, 3));
        assert_eq!(catalog.get_image("n1").unwrap().category, "nature");
        assert_eq!(catalog.categories(), vec!["nature", "urban"]);
    }

    #[test]
    fn test_load_bundle_and_theme_files_merge() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            parser::THEME_BUNDLE_FILE,
            r#"{"food": [{"id": "f1", "src": "s", "alt": "Soup"}]}"#,
        );
        write(
            dir.path(),
            "food.json",
            r#"[{"id": "f2", "src": "s", "alt": "Bread"}]"#,
        );

        let catalog = Catalog::load_from_dir(dir.path()).unwrap();

        let ids: Vec<&str> = catalog
            .theme_images("food")
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[test]
    fn test_from_themes_flattens_every_theme() {
        let mut themes = BTreeMap::new();
        for theme in ["space", "food", "nature"] {
            let images = (0..3)
                .map(|i| ImageRecord::new(format!("{theme}{i}"), "s", "a"))
                .collect();
            themes.insert(theme.to_string(), images);
        }

        let catalog = Catalog::from_themes(themes);

        let flattened: Vec<&str> = catalog.images().iter().map(|i| i.id.as_str()).collect();
        let by_theme: Vec<&str> = catalog
            .categories()
            .into_iter()
            .flat_map(|theme| catalog.theme_images(theme))
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(flattened.len(), 9);
        assert_eq!(flattened, by_theme);
        assert_eq!(flattened[0], "food0");
    }

    #[test]
    fn test_missing_dir() {
        let err = Catalog::load_from_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, CatalogError::DataDirNotFound { .. }));
    }

    #[test]
    fn test_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCatalog { .. }));
    }

    #[test]
    fn test_duplicate_id_across_themes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"[{"id": "x", "src": "s", "alt": "a"}]"#);
        write(dir.path(), "b.json", r#"[{"id": "x", "src": "s", "alt": "b"}]"#);

        let err = Catalog::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateImage { id } if id == "x"));
    }

    #[test]
    fn test_bad_date_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "space.json",
            r#"[{"id": "s1", "src": "s", "alt": "Nebula", "dateAdded": "yesterday"}]"#,
        );

        let err = Catalog::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, CatalogError::ParseError { .. }));
    }
}
